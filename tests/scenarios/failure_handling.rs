//! Fail-fast behavior and the failure taxonomy

use crate::helpers::{push, run_workflow, workflow_from, ScriptedRunner};
use greenlight::core::{RunStatus, StepKind, StepState};
use greenlight::execution::RunEvent;

#[tokio::test]
async fn checkout_failure_skips_every_later_step() {
    let runner = ScriptedRunner::failing_on("git rev-parse");
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Failed);
    assert_eq!(workflow.state.failed_step, Some(StepKind::Checkout));
    assert_eq!(runner.lines().len(), 1);

    match &workflow.step(StepKind::Checkout).state {
        StepState::Failed { error, .. } => assert!(error.contains("source unavailable")),
        other => panic!("expected failed checkout, got {:?}", other),
    }
    for kind in &StepKind::ORDER[1..] {
        assert!(matches!(
            workflow.step(*kind).state,
            StepState::Skipped { .. }
        ));
    }
}

#[tokio::test]
async fn tool_install_failure_stops_the_run() {
    // Probe fails, then the install itself fails
    let runner = ScriptedRunner::failing_on("just");
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Failed);
    assert_eq!(workflow.state.failed_step, Some(StepKind::ToolInstall));
    assert_eq!(
        runner.lines(),
        vec![
            "git rev-parse --is-inside-work-tree",
            "just --version",
            "cargo install just --locked"
        ]
    );
    match &workflow.step(StepKind::ToolInstall).state {
        StepState::Failed { error, .. } => assert!(error.contains("tooling install failed")),
        other => panic!("expected failed tool install, got {:?}", other),
    }
}

#[tokio::test]
async fn toolchain_failure_never_reaches_build() {
    let runner = ScriptedRunner::failing_on("rustup toolchain install");
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Failed);
    assert_eq!(
        workflow.state.failed_step,
        Some(StepKind::ToolchainConfigure)
    );

    let lines = runner.lines();
    assert!(!lines.contains(&"just build test".to_string()));
    assert!(!lines.contains(&"just lint".to_string()));
}

#[tokio::test]
async fn build_test_failure_skips_lint() {
    let runner = ScriptedRunner::failing_on("just build test");
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Failed);
    assert_eq!(workflow.state.failed_step, Some(StepKind::BuildTest));
    assert_eq!(workflow.state.succeeded_steps, 3);
    assert!(!runner.lines().contains(&"just lint".to_string()));

    match &workflow.step(StepKind::Lint).state {
        StepState::Skipped { reason } => assert!(reason.contains("failed")),
        other => panic!("expected skipped lint, got {:?}", other),
    }
}

#[tokio::test]
async fn lint_failure_fails_an_otherwise_green_run() {
    let runner = ScriptedRunner::failing_on("just lint");
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner).await;

    assert_eq!(status, RunStatus::Failed);
    assert_eq!(workflow.state.failed_step, Some(StepKind::Lint));
    assert_eq!(workflow.state.succeeded_steps, 4);
    match &workflow.step(StepKind::Lint).state {
        StepState::Failed { error, .. } => assert!(error.contains("lint failed")),
        other => panic!("expected failed lint, got {:?}", other),
    }
}

#[tokio::test]
async fn failing_commands_are_never_retried() {
    let runner = ScriptedRunner::failing_on("just build test");
    let mut workflow = workflow_from("name: verify");

    run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    let attempts = runner
        .lines()
        .iter()
        .filter(|line| line.as_str() == "just build test")
        .count();
    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn skip_events_cover_every_unreached_step() {
    let runner = ScriptedRunner::failing_on("rustup set");
    let mut workflow = workflow_from("name: verify");

    let (_, events) = run_workflow(&mut workflow, &push("main"), runner).await;

    let skipped: Vec<StepKind> = events
        .iter()
        .filter_map(|event| match event {
            RunEvent::StepSkipped { step, .. } => Some(*step),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![StepKind::BuildTest, StepKind::Lint]);
    assert!(matches!(
        events.last(),
        Some(RunEvent::RunFinished {
            status: RunStatus::Failed,
            ..
        })
    ));
}
