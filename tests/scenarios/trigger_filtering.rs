//! Trigger filtering ahead of any step execution

use crate::helpers::push;
use greenlight::core::{Trigger, WorkflowConfig};

fn pull_request(branch: &str) -> Trigger {
    Trigger::PullRequest {
        number: 12,
        branch: branch.to_string(),
        commit: "abc123".to_string(),
    }
}

#[test]
fn default_workflow_runs_for_both_events() {
    let config = WorkflowConfig::from_yaml("name: verify").unwrap();

    assert!(config.triggers.accepts(&push("main")));
    assert!(config.triggers.accepts(&push("feature/anything")));
    assert!(config.triggers.accepts(&pull_request("feature/anything")));
}

#[test]
fn omitted_event_is_disabled() {
    let yaml = r#"
name: verify
on:
  push: {}
"#;
    let config = WorkflowConfig::from_yaml(yaml).unwrap();

    assert!(config.triggers.accepts(&push("main")));
    assert!(!config.triggers.accepts(&pull_request("main")));
}

#[test]
fn branch_filters_gate_the_event() {
    let yaml = r#"
name: verify
on:
  push:
    branches: ["^main$", "^release-"]
  pull_request: {}
"#;
    let config = WorkflowConfig::from_yaml(yaml).unwrap();

    assert!(config.triggers.accepts(&push("main")));
    assert!(config.triggers.accepts(&push("release-2.0")));
    assert!(!config.triggers.accepts(&push("feature/foo")));

    // pull_request carries no filter, so any branch passes
    assert!(config.triggers.accepts(&pull_request("feature/foo")));
}

#[test]
fn workflow_with_no_events_is_rejected_at_load() {
    // An explicit empty `on:` block leaves both events disabled, which
    // would make the workflow unrunnable
    let yaml = r#"
name: verify
on: {}
"#;
    assert!(WorkflowConfig::from_yaml(yaml).is_err());
}
