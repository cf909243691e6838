//! Run history

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteRunStore;

use crate::core::{RunStatus, Trigger, Workflow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run ID
    pub run_id: Uuid,

    /// Workflow name
    pub workflow_name: String,

    /// Trigger label ("push" or "pull_request")
    pub trigger: String,

    /// Terminal status
    pub status: RunStatus,

    /// The failing step's identifier, if the run failed
    pub failed_step: Option<String>,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (if it reached a terminal state)
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of steps that succeeded
    pub succeeded_steps: usize,

    /// Total number of steps
    pub total_steps: usize,
}

/// Trait for history backends
#[async_trait::async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Save a run summary
    async fn save_run(&self, run: &RunSummary) -> Result<()>;

    /// Load a run by ID
    async fn load_run(&self, run_id: Uuid) -> Result<Option<RunSummary>>;

    /// List all runs for a workflow, most recent first
    async fn list_runs(&self, workflow_name: &str) -> Result<Vec<RunSummary>>;

    /// Latest run for a workflow
    async fn latest_run(&self, workflow_name: &str) -> Result<Option<RunSummary>>;

    /// Delete a run by ID
    async fn delete_run(&self, run_id: Uuid) -> Result<()>;

    /// List all workflow names seen in history
    async fn list_workflows(&self) -> Result<Vec<String>>;
}

/// In-memory history (for `--no-history` runs and tests)
pub struct InMemoryHistory {
    runs: tokio::sync::RwLock<std::collections::HashMap<Uuid, RunSummary>>,
    by_workflow: tokio::sync::RwLock<std::collections::HashMap<String, Vec<Uuid>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            runs: tokio::sync::RwLock::new(std::collections::HashMap::new()),
            by_workflow: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HistoryBackend for InMemoryHistory {
    async fn save_run(&self, run: &RunSummary) -> Result<()> {
        let mut runs = self.runs.write().await;
        runs.insert(run.run_id, run.clone());

        let mut by_workflow = self.by_workflow.write().await;
        by_workflow
            .entry(run.workflow_name.clone())
            .or_default()
            .push(run.run_id);

        Ok(())
    }

    async fn load_run(&self, run_id: Uuid) -> Result<Option<RunSummary>> {
        let runs = self.runs.read().await;
        Ok(runs.get(&run_id).cloned())
    }

    async fn list_runs(&self, workflow_name: &str) -> Result<Vec<RunSummary>> {
        let runs = self.runs.read().await;
        let by_workflow = self.by_workflow.read().await;

        let mut result: Vec<RunSummary> = by_workflow
            .get(workflow_name)
            .map(|ids| ids.iter().filter_map(|id| runs.get(id).cloned()).collect())
            .unwrap_or_default();
        result.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        Ok(result)
    }

    async fn latest_run(&self, workflow_name: &str) -> Result<Option<RunSummary>> {
        Ok(self.list_runs(workflow_name).await?.into_iter().next())
    }

    async fn delete_run(&self, run_id: Uuid) -> Result<()> {
        let mut runs = self.runs.write().await;
        if let Some(run) = runs.remove(&run_id) {
            let mut by_workflow = self.by_workflow.write().await;
            if let Some(ids) = by_workflow.get_mut(&run.workflow_name) {
                ids.retain(|id| *id != run_id);
            }
        }
        Ok(())
    }

    async fn list_workflows(&self) -> Result<Vec<String>> {
        let by_workflow = self.by_workflow.read().await;
        let mut names: Vec<String> = by_workflow.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Create a summary from a finished workflow
pub fn summarize(workflow: &Workflow, trigger: &Trigger) -> RunSummary {
    RunSummary {
        run_id: workflow.state.run_id,
        workflow_name: workflow.name.clone(),
        trigger: trigger.label().to_string(),
        status: workflow.state.status,
        failed_step: workflow.state.failed_step.map(|s| s.id().to_string()),
        started_at: workflow.state.started_at.unwrap_or_else(Utc::now),
        finished_at: workflow.state.finished_at,
        succeeded_steps: workflow.state.succeeded_steps,
        total_steps: workflow.state.total_steps,
    }
}
