//! Step executor - maps each step to concrete commands

use crate::core::{RunContext, StepFailure, StepKind, Workflow};
use crate::invoke::{CommandOutput, CommandRequest, CommandRunner};
use tracing::{debug, info};

/// Executes a single pipeline step by invoking external commands
/// through a [`CommandRunner`].
///
/// Every command inherits the frozen run environment and the workspace
/// working directory; a non-zero exit maps to the failure variant of
/// the step that spawned it.
pub struct StepExecutor<R> {
    runner: R,
}

impl<R: CommandRunner> StepExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Execute a step, returning its captured output on success
    pub async fn execute(
        &self,
        workflow: &Workflow,
        kind: StepKind,
        context: &RunContext,
    ) -> Result<String, StepFailure> {
        info!("Executing step: {}", kind);

        match kind {
            StepKind::Checkout => self.checkout(workflow, context).await,
            StepKind::ToolInstall => self.tool_install(workflow, context).await,
            StepKind::ToolchainConfigure => self.toolchain_configure(workflow, context).await,
            StepKind::BuildTest => self
                .recipes(workflow, context, &workflow.runner.build_test)
                .await
                .map_err(StepFailure::BuildOrTestFailed),
            StepKind::Lint => self
                .recipes(workflow, context, &workflow.runner.lint)
                .await
                .map_err(StepFailure::LintFailed),
        }
    }

    fn request(
        &self,
        workflow: &Workflow,
        context: &RunContext,
        program: &str,
        args: &[&str],
    ) -> CommandRequest {
        CommandRequest::new(program, args)
            .with_env(context.env().clone())
            .with_cwd(context.workspace().to_path_buf())
            .with_timeout(workflow.step_timeout_secs)
    }

    /// Run a command, turning invocation errors and non-zero exits into
    /// a diagnostic string
    async fn run_checked(&self, request: CommandRequest) -> Result<CommandOutput, String> {
        debug!("Running: {}", request.display_line());

        let output = self.runner.run(&request).await.map_err(|e| e.to_string())?;
        if !output.success() {
            return Err(output.diagnostic());
        }
        Ok(output)
    }

    /// Fetch the repository state for the triggering event
    async fn checkout(
        &self,
        workflow: &Workflow,
        context: &RunContext,
    ) -> Result<String, StepFailure> {
        let mut last = if let Some(repository) = &workflow.checkout.repository {
            self.run_checked(self.request(
                workflow,
                context,
                "git",
                &["clone", "--depth", "1", repository, "."],
            ))
            .await
            .map_err(StepFailure::SourceUnavailable)?
            .stdout
        } else {
            // No repository configured: the workdir must already hold a checkout
            self.run_checked(self.request(
                workflow,
                context,
                "git",
                &["rev-parse", "--is-inside-work-tree"],
            ))
            .await
            .map_err(StepFailure::SourceUnavailable)?
            .stdout
        };

        let commit = context.trigger().commit().to_string();
        if !commit.is_empty() {
            last = self
                .run_checked(self.request(workflow, context, "git", &["checkout", &commit]))
                .await
                .map_err(StepFailure::SourceUnavailable)?
                .stdout;
        }

        Ok(last)
    }

    /// Make the task-runner utility available: probe for it first,
    /// install it only when the probe fails
    async fn tool_install(
        &self,
        workflow: &Workflow,
        context: &RunContext,
    ) -> Result<String, StepFailure> {
        let program = workflow.runner.program.clone();
        let probe = self.request(workflow, context, &program, &["--version"]);

        match self.run_checked(probe).await {
            Ok(output) => {
                debug!("Task runner already present: {}", output.stdout.trim());
                Ok(output.stdout)
            }
            Err(_) => {
                info!("Task runner '{}' not found, installing", program);
                self.run_checked(self.request(
                    workflow,
                    context,
                    "cargo",
                    &["install", &program, "--locked"],
                ))
                .await
                .map(|output| output.stdout)
                .map_err(StepFailure::ToolInstallFailed)
            }
        }
    }

    /// Pin the toolchain: disable manager self-update, then install the
    /// configured channel. Re-running installs the same pinned channel.
    async fn toolchain_configure(
        &self,
        workflow: &Workflow,
        context: &RunContext,
    ) -> Result<String, StepFailure> {
        if workflow.toolchain.disable_self_update {
            self.run_checked(self.request(
                workflow,
                context,
                "rustup",
                &["set", "auto-self-update", "disable"],
            ))
            .await
            .map_err(StepFailure::ToolchainInstallFailed)?;
        }

        let channel = workflow.toolchain.channel.clone();
        let output = self
            .run_checked(self.request(
                workflow,
                context,
                "rustup",
                &[
                    "toolchain",
                    "install",
                    &channel,
                    "--profile",
                    workflow.toolchain.profile.as_str(),
                ],
            ))
            .await
            .map_err(StepFailure::ToolchainInstallFailed)?;

        Ok(output.stdout)
    }

    /// Invoke the task runner with a recipe list, e.g. `just build test`
    async fn recipes(
        &self,
        workflow: &Workflow,
        context: &RunContext,
        recipes: &[String],
    ) -> Result<String, String> {
        let args: Vec<&str> = recipes.iter().map(String::as_str).collect();
        let program = workflow.runner.program.clone();
        let output = self
            .run_checked(self.request(workflow, context, &program, &args))
            .await?;
        Ok(output.stdout)
    }
}
