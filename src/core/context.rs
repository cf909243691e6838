//! Run context - the per-run execution environment

use crate::core::step::StepKind;
use crate::core::trigger::Trigger;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Execution context for one run.
///
/// The environment map is built once before the first step and is
/// read-only afterwards: every spawned command sees the identical set
/// of variables. Step outputs accumulate as steps succeed.
#[derive(Debug, Clone)]
pub struct RunContext {
    trigger: Trigger,
    workspace: PathBuf,
    env: HashMap<String, String>,
    outputs: HashMap<StepKind, String>,
}

impl RunContext {
    pub fn new(trigger: Trigger, workspace: PathBuf, env: HashMap<String, String>) -> Self {
        Self {
            trigger,
            workspace,
            env,
            outputs: HashMap::new(),
        }
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// The frozen environment for this run
    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Record the captured output of a finished step
    pub fn record_output(&mut self, step: StepKind, output: String) {
        self.outputs.insert(step, output);
    }

    /// Get the captured output of a step, if it succeeded
    pub fn output(&self, step: StepKind) -> Option<&String> {
        self.outputs.get(&step)
    }
}
