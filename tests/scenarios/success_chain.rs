//! Happy-path runs

use crate::helpers::{push, run_workflow, workflow_from, ScriptedRunner, GREEN_RUN_COMMANDS};
use greenlight::core::{RunStatus, StepKind, StepState};
use greenlight::execution::RunEvent;

#[tokio::test]
async fn green_run_issues_every_command_in_order() {
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Success);
    assert_eq!(runner.lines(), GREEN_RUN_COMMANDS);
}

#[tokio::test]
async fn green_run_leaves_every_step_succeeded() {
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from("name: verify");

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner).await;

    assert_eq!(status, RunStatus::Success);
    assert!(workflow.is_complete());
    assert_eq!(workflow.state.succeeded_steps, 5);
    assert_eq!(workflow.state.failed_step, None);
    for kind in StepKind::ORDER {
        assert!(matches!(
            workflow.step(kind).state,
            StepState::Succeeded { .. }
        ));
    }
}

#[tokio::test]
async fn green_run_emits_bracketing_events() {
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from("name: verify");

    let (_, events) = run_workflow(&mut workflow, &push("main"), runner).await;

    assert!(matches!(events.first(), Some(RunEvent::RunStarted { .. })));
    assert!(matches!(
        events.last(),
        Some(RunEvent::RunFinished {
            status: RunStatus::Success,
            ..
        })
    ));

    let started: Vec<StepKind> = events
        .iter()
        .filter_map(|event| match event {
            RunEvent::StepStarted { step } => Some(*step),
            _ => None,
        })
        .collect();
    assert_eq!(started, StepKind::ORDER);
}

#[tokio::test]
async fn configured_repository_is_cloned() {
    let yaml = r#"
name: verify
checkout:
  repository: "https://example.com/repo.git"
"#;
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from(yaml);

    let (status, _) = run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    assert_eq!(status, RunStatus::Success);
    assert_eq!(
        runner.lines()[0],
        "git clone --depth 1 https://example.com/repo.git ."
    );
}

#[tokio::test]
async fn custom_recipes_reach_the_task_runner() {
    let yaml = r#"
name: verify
runner:
  build_test: ["check", "test"]
  lint: ["fmt-check", "clippy"]
"#;
    let runner = ScriptedRunner::ok();
    let mut workflow = workflow_from(yaml);

    run_workflow(&mut workflow, &push("main"), runner.clone()).await;

    let lines = runner.lines();
    assert!(lines.contains(&"just check test".to_string()));
    assert!(lines.contains(&"just fmt-check clippy".to_string()));
}

#[tokio::test]
async fn reruns_are_independent() {
    let mut first = workflow_from("name: verify");
    let mut second = workflow_from("name: verify");

    let (first_status, _) =
        run_workflow(&mut first, &push("main"), ScriptedRunner::ok()).await;
    let (second_status, _) =
        run_workflow(&mut second, &push("main"), ScriptedRunner::failing_on("just lint")).await;

    // One run's outcome never leaks into another's
    assert_eq!(first_status, RunStatus::Success);
    assert_eq!(second_status, RunStatus::Failed);
    assert_ne!(first.state.run_id, second.state.run_id);
    assert!(first.is_complete());
    assert!(second.has_failed());
}
