//! Repository event triggers

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The repository event that starts a run.
///
/// Created by the invoker (the hosting platform, or the CLI standing in
/// for it) and immutable for the lifetime of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Push {
        branch: String,
        commit: String,
    },
    PullRequest {
        number: u64,
        branch: String,
        commit: String,
    },
}

impl Trigger {
    pub fn branch(&self) -> &str {
        match self {
            Trigger::Push { branch, .. } => branch,
            Trigger::PullRequest { branch, .. } => branch,
        }
    }

    pub fn commit(&self) -> &str {
        match self {
            Trigger::Push { commit, .. } => commit,
            Trigger::PullRequest { commit, .. } => commit,
        }
    }

    /// Stable event label used in history and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::Push { .. } => "push",
            Trigger::PullRequest { .. } => "pull_request",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Trigger::Push { branch, .. } => write!(f, "push to {}", branch),
            Trigger::PullRequest { number, branch, .. } => {
                write!(f, "pull request #{} ({})", number, branch)
            }
        }
    }
}

/// The `on:` block of a workflow file: which events run the workflow.
///
/// The default accepts any push to any branch and any pull-request
/// event. An omitted event is disabled; an event with no branch
/// filters accepts every branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(default)]
    pub push: Option<EventFilter>,

    #[serde(default)]
    pub pull_request: Option<EventFilter>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            push: Some(EventFilter::default()),
            pull_request: Some(EventFilter::default()),
        }
    }
}

/// Per-event filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Branch patterns (regex). Empty means any branch.
    #[serde(default)]
    pub branches: Vec<String>,
}

impl EventFilter {
    /// Check whether a branch passes the filter
    pub fn matches(&self, branch: &str) -> bool {
        if self.branches.is_empty() {
            return true;
        }
        self.branches.iter().any(|pattern| {
            Regex::new(pattern)
                .map(|re| re.is_match(branch))
                .unwrap_or(false)
        })
    }
}

impl TriggerConfig {
    /// Decide whether a trigger runs this workflow
    pub fn accepts(&self, trigger: &Trigger) -> bool {
        let filter = match trigger {
            Trigger::Push { .. } => self.push.as_ref(),
            Trigger::PullRequest { .. } => self.pull_request.as_ref(),
        };

        match filter {
            Some(filter) => filter.matches(trigger.branch()),
            None => false,
        }
    }

    /// Validate the trigger configuration
    pub fn validate(&self) -> Result<()> {
        if self.push.is_none() && self.pull_request.is_none() {
            anyhow::bail!("workflow declares no trigger events");
        }

        for filter in [&self.push, &self.pull_request].into_iter().flatten() {
            for pattern in &filter.branches {
                Regex::new(pattern).map_err(|e| {
                    anyhow::anyhow!("invalid branch filter pattern '{}': {}", pattern, e)
                })?;
            }
        }

        Ok(())
    }
}
