//! Shared scenario helpers

use async_trait::async_trait;
use greenlight::core::{RunStatus, Trigger, Workflow, WorkflowConfig};
use greenlight::execution::{RunEngine, RunEvent};
use greenlight::invoke::{CommandOutput, CommandRequest, CommandRunner, InvokeError};
use std::sync::{Arc, Mutex};

/// Runner that records every request and fails those whose display line
/// matches a pattern. Clones share the recorded calls.
#[derive(Clone)]
pub struct ScriptedRunner {
    fail_on: Option<String>,
    calls: Arc<Mutex<Vec<CommandRequest>>>,
}

impl ScriptedRunner {
    pub fn ok() -> Self {
        Self {
            fail_on: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All requests seen so far
    pub fn requests(&self) -> Vec<CommandRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Display lines of all requests seen so far
    pub fn lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| request.display_line())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, request: &CommandRequest) -> Result<CommandOutput, InvokeError> {
        let line = request.display_line();
        self.calls.lock().unwrap().push(request.clone());

        let fail = self
            .fail_on
            .as_ref()
            .is_some_and(|pattern| line.contains(pattern));

        Ok(CommandOutput {
            exit_code: if fail { 1 } else { 0 },
            stdout: format!("ran: {}", line),
            stderr: if fail {
                "scripted failure".to_string()
            } else {
                String::new()
            },
        })
    }
}

pub fn workflow_from(yaml: &str) -> Workflow {
    WorkflowConfig::from_yaml(yaml)
        .expect("scenario yaml must parse")
        .to_workflow()
}

pub fn push(branch: &str) -> Trigger {
    Trigger::Push {
        branch: branch.to_string(),
        commit: String::new(),
    }
}

/// Drive a full run, collecting every emitted event
pub async fn run_workflow(
    workflow: &mut Workflow,
    trigger: &Trigger,
    runner: ScriptedRunner,
) -> (RunStatus, Vec<RunEvent>) {
    let engine = RunEngine::new(runner);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    engine.add_event_handler(move |event| sink.lock().unwrap().push(event));

    let status = engine.execute(workflow, trigger).await;
    let events = events.lock().unwrap().clone();
    (status, events)
}

/// The command sequence a default green run issues, in order
pub const GREEN_RUN_COMMANDS: [&str; 6] = [
    "git rev-parse --is-inside-work-tree",
    "just --version",
    "rustup set auto-self-update disable",
    "rustup toolchain install stable --profile minimal",
    "just build test",
    "just lint",
];
