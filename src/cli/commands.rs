//! CLI command definitions

use crate::core::Trigger;
use clap::Args;

/// Run a workflow for a repository event
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the workflow YAML file
    #[arg(short, long)]
    pub file: String,

    /// Triggering event
    #[arg(long, value_enum, default_value_t = EventArg::Push)]
    pub event: EventArg,

    /// Branch the event refers to
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Commit to check out (empty = current worktree state)
    #[arg(long, default_value = "")]
    pub commit: String,

    /// Pull request number (with --event pull-request)
    #[arg(long, default_value_t = 0)]
    pub number: u64,

    /// Override the checkout workdir
    #[arg(long)]
    pub workdir: Option<String>,

    /// Environment overrides (KEY=VALUE), applied before the run starts
    #[arg(long = "env", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,

    /// Don't save the run to history
    #[arg(long)]
    pub no_history: bool,
}

impl RunCommand {
    /// Build the trigger this invocation stands for
    pub fn trigger(&self) -> Trigger {
        match self.event {
            EventArg::Push => Trigger::Push {
                branch: self.branch.clone(),
                commit: self.commit.clone(),
            },
            EventArg::PullRequest => Trigger::PullRequest {
                number: self.number,
                branch: self.branch.clone(),
                commit: self.commit.clone(),
            },
        }
    }
}

/// Triggering event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventArg {
    Push,
    #[clap(name = "pull-request")]
    PullRequest,
}

/// Validate a workflow file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the workflow YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show run history
#[derive(Debug, Args, Clone)]
pub struct HistoryCommand {
    /// Workflow name to filter by
    #[arg(short, long)]
    pub workflow: Option<String>,

    /// Number of recent runs to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Show full details
    #[arg(long)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show a specific run by ID
    #[arg(long)]
    pub run_id: Option<String>,
}

/// List workflows seen in history
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Show run counts
    #[arg(long)]
    pub with_counts: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid key=value pair: {}", s));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}
