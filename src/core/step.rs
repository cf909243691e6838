//! Step domain model

use crate::core::state::StepState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five pipeline steps, in their only legal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// Fetch the repository state for the triggering event
    Checkout,
    /// Make the task-runner utility available
    ToolInstall,
    /// Pin and install the language toolchain
    ToolchainConfigure,
    /// Compile the project and run its test suite
    BuildTest,
    /// Static style/quality checks
    Lint,
}

impl StepKind {
    /// Fixed execution order. A step never runs before its predecessor
    /// finished successfully.
    pub const ORDER: [StepKind; 5] = [
        StepKind::Checkout,
        StepKind::ToolInstall,
        StepKind::ToolchainConfigure,
        StepKind::BuildTest,
        StepKind::Lint,
    ];

    /// Stable identifier used in logs, history and JSON output
    pub fn id(self) -> &'static str {
        match self {
            StepKind::Checkout => "checkout",
            StepKind::ToolInstall => "tool-install",
            StepKind::ToolchainConfigure => "toolchain-configure",
            StepKind::BuildTest => "build-test",
            StepKind::Lint => "lint",
        }
    }

    /// Human-readable step title
    pub fn title(self) -> &'static str {
        match self {
            StepKind::Checkout => "Checkout sources",
            StepKind::ToolInstall => "Install task runner",
            StepKind::ToolchainConfigure => "Configure toolchain",
            StepKind::BuildTest => "Build and test",
            StepKind::Lint => "Lint",
        }
    }

    /// Parse a stable identifier back into a step kind
    pub fn from_id(id: &str) -> Option<StepKind> {
        StepKind::ORDER.into_iter().find(|kind| kind.id() == id)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single step in a run: its kind plus runtime state
#[derive(Debug, Clone)]
pub struct Step {
    pub kind: StepKind,
    pub state: StepState,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Step {
            kind,
            state: StepState::Pending,
        }
    }
}
