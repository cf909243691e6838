//! Core domain models

pub mod config;
pub mod context;
pub mod failure;
pub mod state;
pub mod step;
pub mod trigger;
pub mod workflow;

pub use config::WorkflowConfig;
pub use context::RunContext;
pub use failure::StepFailure;
pub use state::{RunState, RunStatus, StepState};
pub use step::{Step, StepKind};
pub use trigger::{Trigger, TriggerConfig};
pub use workflow::Workflow;
