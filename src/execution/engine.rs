//! Run engine - drives the fixed step sequence

use crate::core::{RunStatus, StepKind, StepState, Trigger, Workflow};
use crate::execution::StepExecutor;
use crate::invoke::CommandRunner;
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use uuid::Uuid;

/// Events that occur during a run
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted {
        run_id: Uuid,
        workflow_name: String,
        trigger: String,
    },
    StepStarted {
        step: StepKind,
    },
    StepOutput {
        step: StepKind,
        output: String,
    },
    StepSucceeded {
        step: StepKind,
    },
    StepFailed {
        step: StepKind,
        error: String,
    },
    StepSkipped {
        step: StepKind,
        reason: String,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(RunEvent) + Send + Sync>;

/// Executes a workflow's steps strictly in [`StepKind::ORDER`].
///
/// Fail-fast: the first failing step marks the run failed, every
/// remaining step is skipped, and no retries happen. Concurrent runs
/// use separate engines and workflows and share nothing.
pub struct RunEngine<R> {
    executor: StepExecutor<R>,
    event_handlers: Mutex<Vec<EventHandler>>,
}

impl<R: CommandRunner> RunEngine<R> {
    pub fn new(runner: R) -> Self {
        Self {
            executor: StepExecutor::new(runner),
            event_handlers: Mutex::new(Vec::new()),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(RunEvent) + Send + Sync + 'static,
    {
        let mut handlers = self
            .event_handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit(&self, event: RunEvent) {
        let handlers = self
            .event_handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for handler in handlers.iter() {
            handler(event.clone());
        }
    }

    /// Execute the full run and return its terminal status
    pub async fn execute(&self, workflow: &mut Workflow, trigger: &Trigger) -> RunStatus {
        let run_id = workflow.state.run_id;
        info!(
            "Starting run: {} ({}) for {}",
            workflow.name, run_id, trigger
        );
        self.emit(RunEvent::RunStarted {
            run_id,
            workflow_name: workflow.name.clone(),
            trigger: trigger.to_string(),
        });

        workflow.state.start(StepKind::ORDER.len());

        // The context is frozen here; later steps see exactly what the
        // first step saw.
        let mut context = workflow.create_context(trigger);

        for (position, kind) in StepKind::ORDER.into_iter().enumerate() {
            let started_at = chrono::Utc::now();
            workflow.step_mut(kind).state = StepState::Running { started_at };
            self.emit(RunEvent::StepStarted { step: kind });

            match self.executor.execute(workflow, kind, &context).await {
                Ok(output) => {
                    workflow.step_mut(kind).state = StepState::Succeeded {
                        output: output.clone(),
                        started_at,
                        finished_at: chrono::Utc::now(),
                    };
                    if !output.trim().is_empty() {
                        self.emit(RunEvent::StepOutput {
                            step: kind,
                            output: output.clone(),
                        });
                    }
                    context.record_output(kind, output);
                    self.emit(RunEvent::StepSucceeded { step: kind });
                }
                Err(failure) => {
                    error!("Step {} failed: {}", kind, failure);
                    workflow.step_mut(kind).state = StepState::Failed {
                        error: failure.to_string(),
                        started_at,
                        failed_at: chrono::Utc::now(),
                    };
                    self.emit(RunEvent::StepFailed {
                        step: kind,
                        error: failure.to_string(),
                    });

                    // Fail-fast: nothing after the failing step runs
                    let reason = format!("{} failed", kind);
                    for later in &StepKind::ORDER[position + 1..] {
                        workflow.step_mut(*later).state = StepState::Skipped {
                            reason: reason.clone(),
                        };
                        self.emit(RunEvent::StepSkipped {
                            step: *later,
                            reason: reason.clone(),
                        });
                    }

                    let succeeded = workflow.succeeded_steps();
                    workflow.state.fail(kind, succeeded);
                    info!("Run {} failed at step {}", run_id, kind);
                    self.emit(RunEvent::RunFinished {
                        run_id,
                        status: RunStatus::Failed,
                    });
                    return RunStatus::Failed;
                }
            }
        }

        workflow.state.complete();
        info!("Run {} completed successfully", run_id);
        self.emit(RunEvent::RunFinished {
            run_id,
            status: RunStatus::Success,
        });
        RunStatus::Success
    }
}
