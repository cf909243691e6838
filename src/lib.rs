//! greenlight - a local build-verification pipeline runner

pub mod cli;
pub mod core;
pub mod execution;
pub mod history;
pub mod invoke;

// Re-export commonly used types
pub use crate::core::{
    RunContext, RunState, RunStatus, StepFailure, StepKind, StepState, Trigger, TriggerConfig,
    Workflow, WorkflowConfig,
};
pub use crate::execution::{RunEngine, RunEvent, StepExecutor};
pub use crate::history::{summarize, HistoryBackend, InMemoryHistory, RunSummary};
pub use crate::invoke::{
    CommandOutput, CommandRequest, CommandRunner, InvokeError, SystemCommandRunner,
};
