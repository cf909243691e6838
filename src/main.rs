use anyhow::{Context, Result};
use greenlight::cli::commands::{HistoryCommand, ListCommand, RunCommand, ValidateCommand};
use greenlight::cli::output::*;
use greenlight::cli::{Cli, Command};
use greenlight::core::{RunStatus, StepKind, WorkflowConfig};
use greenlight::execution::{RunEngine, RunEvent};
use greenlight::history::{
    summarize, HistoryBackend, InMemoryHistory, RunSummary, SqliteRunStore,
};
use greenlight::invoke::SystemCommandRunner;
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_workflow(cmd).await?,
        Command::Validate(cmd) => validate_workflow(cmd)?,
        Command::History(cmd) => show_history(cmd).await?,
        Command::List(cmd) => list_workflows(cmd).await?,
    }

    Ok(())
}

async fn run_workflow(cmd: &RunCommand) -> Result<()> {
    // Load workflow config
    let config = WorkflowConfig::from_file(&cmd.file)
        .context("Failed to load workflow config")?;

    println!(
        "{} Loaded workflow: {}",
        INFO,
        style(&config.name).bold()
    );

    // The trigger decides whether the workflow runs at all
    let trigger = cmd.trigger();
    if !config.triggers.accepts(&trigger) {
        println!(
            "{} {} does not run for {}",
            INFO,
            style(&config.name).bold(),
            style(&trigger).cyan()
        );
        return Ok(());
    }

    // Create workflow
    let mut workflow = config.to_workflow();

    if let Some(workdir) = &cmd.workdir {
        workflow.checkout.workdir = workdir.clone();
    }

    // Apply env overrides before the run starts; the env is frozen once
    // the first step begins
    for (key, value) in &cmd.env {
        workflow.env.insert(key.clone(), value.clone());
        println!(
            "{} Env override: {} = {}",
            INFO,
            style(key).cyan(),
            style(value).dim()
        );
    }

    // Set up history
    let store: Arc<dyn HistoryBackend> = if cmd.no_history {
        Arc::new(InMemoryHistory::new())
    } else {
        Arc::new(SqliteRunStore::with_default_path().await?)
    };

    // Create run engine over the real machine
    let engine = RunEngine::new(SystemCommandRunner::new());

    // Console output: one progress tick per terminal step event
    let progress = create_step_progress(StepKind::ORDER.len());
    let bar = progress.clone();
    engine.add_event_handler(move |event| {
        bar.println(format_run_event(&event));
        if matches!(
            event,
            RunEvent::StepSucceeded { .. }
                | RunEvent::StepFailed { .. }
                | RunEvent::StepSkipped { .. }
        ) {
            bar.inc(1);
        }
    });

    // Execute the run
    println!();
    let status = engine.execute(&mut workflow, &trigger).await;
    progress.finish_and_clear();

    // Save to history
    if !cmd.no_history {
        let summary = summarize(&workflow, &trigger);
        store.save_run(&summary).await?;
        println!(
            "\n{} Run saved to history (ID: {})",
            INFO,
            style(&summary.run_id.to_string()[..8]).dim()
        );
    }

    // Print final status
    match status {
        RunStatus::Success => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(&workflow.name).bold(),
                style("successfully").green()
            );
        }
        _ => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&workflow.name).bold(),
                style("failed").red()
            );
            if let Some(step) = workflow.state.failed_step {
                error!("Run failed at step: {}", step);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn validate_workflow(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating workflow...", INFO);

    let result = WorkflowConfig::from_file(&cmd.file);

    match result {
        Ok(config) => {
            println!("{} Workflow configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!(
                "  Toolchain: {} ({})",
                style(&config.toolchain.channel).cyan(),
                config.toolchain.profile.as_str()
            );
            println!(
                "  Build/test: {} {}",
                style(&config.runner.program).cyan(),
                config.runner.build_test.join(" ")
            );
            println!(
                "  Lint: {} {}",
                style(&config.runner.program).cyan(),
                config.runner.lint.join(" ")
            );

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

async fn show_history(cmd: &HistoryCommand) -> Result<()> {
    let store = SqliteRunStore::with_default_path().await?;

    // If a specific run ID is requested
    if let Some(run_id_str) = &cmd.run_id {
        let run_id = uuid::Uuid::parse_str(run_id_str).context("Invalid run ID format")?;
        let summary = store.load_run(run_id).await?;

        match summary {
            Some(summary) => {
                print_run_details(&summary, cmd.verbose)?;
            }
            None => {
                println!("{} Run not found", WARN);
            }
        }
        return Ok(());
    }

    // List runs for one workflow or all
    let runs = if let Some(workflow_name) = &cmd.workflow {
        store.list_runs(workflow_name).await?
    } else {
        let workflows = store.list_workflows().await?;
        let mut all_runs = Vec::new();
        for workflow in &workflows {
            all_runs.extend(store.list_runs(workflow).await?);
        }
        all_runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        all_runs.into_iter().take(cmd.limit).collect()
    };

    if runs.is_empty() {
        println!("{} No runs found", INFO);
        return Ok(());
    }

    println!("{} Run history (showing latest {}):", INFO, cmd.limit);

    if cmd.json {
        let data = serde_json::json!({ "runs": runs });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        for summary in runs.iter().take(cmd.limit) {
            println!("  {}", format_run_summary(summary));
        }
    }

    Ok(())
}

async fn list_workflows(cmd: &ListCommand) -> Result<()> {
    let store = SqliteRunStore::with_default_path().await?;
    let workflows = store.list_workflows().await?;

    if workflows.is_empty() {
        println!("{} No workflows found in history", INFO);
        return Ok(());
    }

    println!("{} Workflows in history:", INFO);

    for workflow_name in &workflows {
        let runs = store.list_runs(workflow_name).await?;

        if cmd.with_counts {
            let succeeded = runs
                .iter()
                .filter(|r| r.status == RunStatus::Success)
                .count();
            let failed = runs.iter().filter(|r| r.status == RunStatus::Failed).count();
            println!(
                "  {} ({} runs: {} succeeded, {} failed)",
                style(workflow_name).bold(),
                style(runs.len()).cyan(),
                style(succeeded).green(),
                style(failed).red()
            );
        } else {
            println!("  {}", style(workflow_name).bold());
        }
    }

    if cmd.json {
        let mut json_data = Vec::new();
        for workflow in &workflows {
            let runs = store.list_runs(workflow).await.ok();
            json_data.push(serde_json::json!({
                "name": workflow,
                "run_count": runs.as_ref().map(|r| r.len()).unwrap_or(0)
            }));
        }
        let data = serde_json::json!({ "workflows": json_data });
        println!("\n{}", serde_json::to_string_pretty(&data)?);
    }

    Ok(())
}

fn print_run_details(summary: &RunSummary, verbose: bool) -> Result<()> {
    println!("{} Run Details", INFO);
    println!("  ID: {}", style(summary.run_id).cyan());
    println!("  Workflow: {}", style(&summary.workflow_name).bold());
    println!("  Trigger: {}", style(&summary.trigger).cyan());
    println!("  Status: {}", format_status(summary.status));
    if let Some(step) = &summary.failed_step {
        println!("  Failed step: {}", style(step).red());
    }
    println!("  Started: {}", style(summary.started_at.to_rfc3339()).dim());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", style(finished.to_rfc3339()).dim());
        if let Ok(duration) = finished.signed_duration_since(summary.started_at).to_std() {
            println!("  Duration: {}", style(format_duration(duration)).dim());
        }
    }
    println!(
        "  Steps: {}/{} succeeded",
        summary.succeeded_steps, summary.total_steps
    );

    if verbose {
        println!("\n  {}", style("Full details:").bold());
        let json = serde_json::to_string_pretty(summary)?;
        for line in json.lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}

fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
