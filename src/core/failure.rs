//! Step failure taxonomy

use crate::core::step::StepKind;
use thiserror::Error;

/// Why a run failed, one variant per pipeline step.
///
/// Every failure is terminal: there is no retry or partial-success
/// reporting, the first failing step determines the run outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepFailure {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("tooling install failed: {0}")]
    ToolInstallFailed(String),

    #[error("toolchain install failed: {0}")]
    ToolchainInstallFailed(String),

    #[error("build/test failed: {0}")]
    BuildOrTestFailed(String),

    #[error("lint failed: {0}")]
    LintFailed(String),
}

impl StepFailure {
    /// The step this failure belongs to
    pub fn step(&self) -> StepKind {
        match self {
            StepFailure::SourceUnavailable(_) => StepKind::Checkout,
            StepFailure::ToolInstallFailed(_) => StepKind::ToolInstall,
            StepFailure::ToolchainInstallFailed(_) => StepKind::ToolchainConfigure,
            StepFailure::BuildOrTestFailed(_) => StepKind::BuildTest,
            StepFailure::LintFailed(_) => StepKind::Lint,
        }
    }
}
