//! CLI output formatting

use crate::core::{RunStatus, StepState};
use crate::execution::RunEvent;
use crate::history::RunSummary;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'static, 'static> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'static, 'static> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'static, 'static> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'static, 'static> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'static, 'static> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'static, 'static> = Emoji("🚀 ", "> ");

/// Create a progress bar over the step sequence
pub fn create_step_progress(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    if let Ok(progress_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(progress_style.progress_chars("#>-"));
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a step state for display
pub fn format_step_state(state: &StepState) -> String {
    match state {
        StepState::Pending => style("PENDING").dim().to_string(),
        StepState::Running { .. } => style("RUNNING").yellow().to_string(),
        StepState::Succeeded { .. } => style("SUCCEEDED").green().to_string(),
        StepState::Failed { .. } => style("FAILED").red().to_string(),
        StepState::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Pending => style("PENDING").dim().to_string(),
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Success => style("SUCCESS").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a run summary line
pub fn format_run_summary(summary: &RunSummary) -> String {
    let status_icon = match summary.status {
        RunStatus::Success => CHECK,
        RunStatus::Failed => CROSS,
        RunStatus::Running => SPINNER,
        RunStatus::Pending => INFO,
    };

    let failed_note = summary
        .failed_step
        .as_ref()
        .map(|step| format!(" at {}", style(step).red()))
        .unwrap_or_default();

    format!(
        "{} {} - {} [{}] - {}{} ({}/{} steps)",
        status_icon,
        style(&summary.run_id.to_string()[..8]).dim(),
        style(&summary.workflow_name).bold(),
        style(&summary.trigger).cyan(),
        format_status(summary.status),
        failed_note,
        summary.succeeded_steps,
        summary.total_steps,
    )
}

/// Format a run event for console display
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::RunStarted {
            run_id,
            workflow_name,
            trigger,
        } => format!(
            "{} Starting {} ({}) for {}",
            ROCKET,
            style(workflow_name).bold(),
            style(&run_id.to_string()[..8]).dim(),
            style(trigger).cyan()
        ),
        RunEvent::StepStarted { step } => {
            format!("{} {}", SPINNER, style(step.title()).cyan())
        }
        RunEvent::StepOutput { step, output } => {
            format!(
                "{} Output from {}:\n{}",
                INFO,
                style(step.id()).dim(),
                format_output(output, 5)
            )
        }
        RunEvent::StepSucceeded { step } => {
            format!("{} {}", CHECK, style(step.title()).green())
        }
        RunEvent::StepFailed { step, error } => {
            format!("{} {}: {}", CROSS, style(step.title()).red(), style(error).dim())
        }
        RunEvent::StepSkipped { step, reason } => {
            format!(
                "{} {} skipped ({})",
                WARN,
                style(step.title()).dim(),
                reason
            )
        }
        RunEvent::RunFinished { run_id, status } => {
            let status_str = match status {
                RunStatus::Success => style("succeeded").green().to_string(),
                RunStatus::Failed => style("failed").red().to_string(),
                _ => format!("{:?}", status),
            };
            format!(
                "{} Run ({}) {}",
                INFO,
                style(&run_id.to_string()[..8]).dim(),
                status_str
            )
        }
    }
}

/// Format step output with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{} ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_states_name_the_outcome() {
        assert!(format_status(RunStatus::Success).contains("SUCCESS"));
        assert!(format_status(RunStatus::Failed).contains("FAILED"));
        assert!(format_step_state(&StepState::Pending).contains("PENDING"));
        assert!(format_step_state(&StepState::Skipped {
            reason: "build-test failed".to_string()
        })
        .contains("SKIPPED"));
    }

    #[test]
    fn test_format_output_truncates() {
        let output = "1\n2\n3\n4\n5\n6\n7";
        let formatted = format_output(output, 5);
        assert!(formatted.contains("2 more lines"));

        let short = format_output("1\n2", 5);
        assert_eq!(short, "1\n2");
    }
}
