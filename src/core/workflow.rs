//! Workflow domain model

use crate::core::{
    config::{CheckoutConfig, RunnerConfig, ToolchainConfig, WorkflowConfig},
    context::RunContext,
    state::{RunState, RunStatus, StepState},
    step::{Step, StepKind},
    trigger::Trigger,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// A workflow instance: the configuration plus the run state of its
/// five fixed steps.
#[derive(Debug, Clone)]
pub struct Workflow {
    /// Workflow name
    pub name: String,

    /// Environment variables frozen at run start
    pub env: HashMap<String, String>,

    /// Toolchain pinning
    pub toolchain: ToolchainConfig,

    /// Task-runner utility and recipes
    pub runner: RunnerConfig,

    /// Source checkout settings
    pub checkout: CheckoutConfig,

    /// Per-step timeout
    pub step_timeout_secs: u64,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Run state
    pub state: RunState,
}

impl Workflow {
    /// Create a workflow from configuration
    pub fn from_config(config: &WorkflowConfig) -> Self {
        let steps = StepKind::ORDER.into_iter().map(Step::new).collect();

        Workflow {
            name: config.name.clone(),
            env: config.env.clone(),
            toolchain: config.toolchain.clone(),
            runner: config.runner.clone(),
            checkout: config.checkout.clone(),
            step_timeout_secs: config.step_timeout_secs,
            steps,
            state: RunState::new(),
        }
    }

    /// Get a step by kind
    pub fn step(&self, kind: StepKind) -> &Step {
        self.steps
            .iter()
            .find(|s| s.kind == kind)
            .unwrap_or_else(|| unreachable!("workflow always holds all five steps"))
    }

    /// Get a mutable step by kind
    pub fn step_mut(&mut self, kind: StepKind) -> &mut Step {
        self.steps
            .iter_mut()
            .find(|s| s.kind == kind)
            .unwrap_or_else(|| unreachable!("workflow always holds all five steps"))
    }

    /// Number of steps that have succeeded so far
    pub fn succeeded_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.state, StepState::Succeeded { .. }))
            .count()
    }

    /// Check if every step reached a terminal state
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.state.is_terminal())
    }

    /// Check if the run failed
    pub fn has_failed(&self) -> bool {
        self.state.status == RunStatus::Failed
    }

    /// Build the frozen execution context for this run.
    ///
    /// Called exactly once, before the first step; the environment map
    /// never changes afterwards.
    pub fn create_context(&self, trigger: &Trigger) -> RunContext {
        RunContext::new(
            trigger.clone(),
            PathBuf::from(&self.checkout.workdir),
            self.env.clone(),
        )
    }
}
