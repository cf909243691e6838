//! The run environment is set once and visible identically to every step

use crate::helpers::{push, run_workflow, workflow_from, ScriptedRunner};
use greenlight::core::RunStatus;

#[tokio::test]
async fn default_env_reaches_every_command() {
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Success);
    let requests = runner.requests();
    assert!(!requests.is_empty());
    for request in &requests {
        assert_eq!(request.env.get("CARGO_TERM_COLOR").unwrap(), "always");
        assert_eq!(request.env.get("CARGO_INCREMENTAL").unwrap(), "0");
    }
}

#[tokio::test]
async fn every_command_sees_the_same_environment() {
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from("name: verify");

    run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    let requests = runner.requests();
    let first = &requests[0].env;
    for request in &requests[1..] {
        assert_eq!(&request.env, first);
    }
}

#[tokio::test]
async fn overrides_applied_before_the_run_are_visible_everywhere() {
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from("name: verify");
    workflow
        .env
        .insert("RUST_BACKTRACE".to_string(), "1".to_string());

    run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    for request in &runner.requests() {
        assert_eq!(request.env.get("RUST_BACKTRACE").unwrap(), "1");
        assert_eq!(request.env.get("CARGO_TERM_COLOR").unwrap(), "always");
    }
}

#[tokio::test]
async fn declared_env_replaces_the_defaults() {
    let yaml = r#"
name: verify
env:
  RUSTFLAGS: "-D warnings"
"#;
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from(yaml);

    run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    for request in &runner.requests() {
        assert_eq!(request.env.get("RUSTFLAGS").unwrap(), "-D warnings");
        assert!(request.env.get("CARGO_TERM_COLOR").is_none());
    }
}

#[tokio::test]
async fn commands_inherit_workdir_and_timeout() {
    let yaml = r#"
name: verify
checkout:
  workdir: "/tmp/verify-workspace"
step_timeout_secs: 900
"#;
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from(yaml);

    run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    for request in &runner.requests() {
        assert_eq!(request.cwd.to_str().unwrap(), "/tmp/verify-workspace");
        assert_eq!(request.timeout_secs, 900);
    }
}
