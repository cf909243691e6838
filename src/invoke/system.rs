//! System command runner - spawns real processes

use crate::invoke::{CommandOutput, CommandRequest, CommandRunner, InvokeError};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Runs commands on the local machine via tokio subprocesses.
///
/// Commands inherit the process environment with the request env
/// layered on top, run in the request working directory, and are
/// killed when the timeout elapses.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, request: &CommandRequest) -> Result<CommandOutput, InvokeError> {
        debug!("Spawning: {}", request.display_line());

        let timeout_duration = Duration::from_secs(request.timeout_secs);

        let result = timeout(
            timeout_duration,
            Command::new(&request.program)
                .args(&request.args)
                .envs(&request.env)
                .current_dir(&request.cwd)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| InvokeError::Timeout(request.timeout_secs))?;

        let output = result.map_err(|e| InvokeError::Spawn {
            program: request.program.clone(),
            source: e,
        })?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| InvokeError::Output(format!("stdout is not valid UTF-8: {}", e)))?;
        let stderr = String::from_utf8(output.stderr)
            .map_err(|e| InvokeError::Output(format!("stderr is not valid UTF-8: {}", e)))?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(
            "{} exited with code {} ({} bytes stdout)",
            request.program,
            exit_code,
            stdout.len()
        );

        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}
