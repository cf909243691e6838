//! Execution state models

use crate::core::step::StepKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// Run is currently executing steps
    Running,
    /// Every step succeeded
    Success,
    /// A step failed; the remaining steps were skipped
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Failed)
    }
}

/// State of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepState {
    /// Step has not started
    Pending,
    /// Step is currently running
    Running { started_at: DateTime<Utc> },
    /// Step finished with a zero outcome
    Succeeded {
        output: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
    /// Step failed; the run stops here
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
    /// Step never ran because an earlier step failed
    Skipped { reason: String },
}

impl StepState {
    /// Check if the step is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepState::Succeeded { .. } | StepState::Failed { .. } | StepState::Skipped { .. }
        )
    }
}

/// Overall run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run ID
    pub run_id: Uuid,

    /// Current status
    pub status: RunStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run reached a terminal state
    pub finished_at: Option<DateTime<Utc>>,

    /// The step that failed, if any. First failure wins; there is
    /// never more than one.
    pub failed_step: Option<StepKind>,

    /// Total number of steps
    pub total_steps: usize,

    /// Number of steps that succeeded
    pub succeeded_steps: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Pending,
            started_at: None,
            finished_at: None,
            failed_step: None,
            total_steps: 0,
            succeeded_steps: 0,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self, total_steps: usize) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
        self.total_steps = total_steps;
    }

    /// Mark the run as successful
    pub fn complete(&mut self) {
        self.status = RunStatus::Success;
        self.succeeded_steps = self.total_steps;
        self.finished_at = Some(Utc::now());
    }

    /// Mark the run as failed at the given step
    pub fn fail(&mut self, step: StepKind, succeeded_steps: usize) {
        self.status = RunStatus::Failed;
        self.failed_step = Some(step);
        self.succeeded_steps = succeeded_steps;
        self.finished_at = Some(Utc::now());
    }

    /// Progress through the step sequence (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        self.succeeded_steps as f64 / self.total_steps as f64
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
