// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use vg_core::test_support::{noop_job, run_job};
use vg_core::Code;
use vg_terminal::recording::{RecordingUi, UiAction};

fn ctx(job: Job, ui: &RecordingUi, workdir: &std::path::Path) -> ExecContext {
    ExecContext {
        job,
        ui: Arc::new(ui.clone()),
        workdir: workdir.to_path_buf(),
        cancel: CancellationToken::new(),
    }
}

fn stdout_of(ui: &RecordingUi) -> String {
    let bytes: Vec<u8> = ui
        .actions()
        .into_iter()
        .filter_map(|a| match a {
            UiAction::Stdout(b) => Some(b),
            _ => None,
        })
        .flatten()
        .collect();
    String::from_utf8(bytes).unwrap()
}

#[tokio::test]
async fn noop_succeeds() {
    let ui = RecordingUi::new();
    let result = BuiltinDispatcher::new().execute(ctx(noop_job("job-1"), &ui, "/".as_ref())).await;
    assert_eq!(result, Ok(JobResult::Noop));
}

#[tokio::test]
async fn noop_gate_blocks_until_released() {
    let gate = CancellationToken::new();
    let dispatcher = BuiltinDispatcher::new().with_noop_gate(gate.clone());
    let ui = RecordingUi::new();
    let mut task =
        tokio::spawn(async move { dispatcher.execute(ctx(noop_job("job-1"), &ui, "/".as_ref())).await });

    assert!(tokio::time::timeout(Duration::from_millis(50), &mut task).await.is_err());
    gate.cancel();
    assert_eq!(task.await.unwrap(), Ok(JobResult::Noop));
}

#[tokio::test]
async fn gated_noop_returns_cancelled_with_operation_context() {
    let dispatcher = BuiltinDispatcher::new().with_noop_gate(CancellationToken::new());
    let ui = RecordingUi::new();
    let exec = ctx(noop_job("job-1"), &ui, "/".as_ref());
    exec.cancel.cancel();
    let err = dispatcher.execute(exec).await.unwrap_err();
    assert_eq!(err.code, Code::Cancelled);
    assert_eq!(err.message, "noop: context canceled");
}

#[tokio::test]
async fn init_creates_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let ui = RecordingUi::new();
    let job = Job::builder().operation(Operation::Init).build();
    let result = BuiltinDispatcher::new().execute(ctx(job, &ui, dir.path())).await.unwrap();
    let expected = dir.path().join(DATA_DIR);
    assert!(expected.is_dir());
    assert_eq!(result, JobResult::Init(InitResult { data_dir: expected }));
    assert_eq!(ui.lines().len(), 1);
}

#[tokio::test]
async fn run_streams_output_and_reports_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let ui = RecordingUi::new();
    let job = run_job("sh", &["-c", "echo out; echo err >&2; exit 3"]);
    let result = BuiltinDispatcher::new().execute(ctx(job, &ui, dir.path())).await.unwrap();
    assert_eq!(result, JobResult::Run(RunResult { exit_code: 3 }));
    assert_eq!(stdout_of(&ui), "out\n");
    assert!(ui.actions().iter().any(|a| matches!(a, UiAction::Stderr(b) if b == b"err\n")));
}

#[tokio::test]
async fn run_uses_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker"), "").unwrap();
    let ui = RecordingUi::new();
    let job = run_job("ls", &[]);
    BuiltinDispatcher::new().execute(ctx(job, &ui, dir.path())).await.unwrap();
    assert_eq!(stdout_of(&ui), "marker\n");
}

#[tokio::test]
async fn run_missing_command_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let ui = RecordingUi::new();
    let job = run_job("vg-definitely-not-a-command", &[]);
    let err = BuiltinDispatcher::new().execute(ctx(job, &ui, dir.path())).await.unwrap_err();
    assert_eq!(err.code, Code::NotFound);
    assert!(err.message.starts_with("run: "), "{}", err.message);
}

#[tokio::test]
async fn cancel_kills_running_command() {
    let dir = tempfile::tempdir().unwrap();
    let ui = RecordingUi::new();
    let exec = ctx(run_job("sleep", &["30"]), &ui, dir.path());
    let cancel = exec.cancel.clone();
    let task = tokio::spawn(async move { BuiltinDispatcher::new().execute(exec).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    let err = tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap().unwrap_err();
    assert_eq!(err.code, Code::Cancelled);
}

#[tokio::test]
async fn auth_reports_each_component_as_a_step() {
    let ui = RecordingUi::new();
    let job = Job::builder()
        .operation(Operation::Auth { components: vec!["docker".into(), "cloud".into()] })
        .build();
    let result = BuiltinDispatcher::new().execute(ctx(job, &ui, "/".as_ref())).await.unwrap();
    assert_eq!(
        result,
        JobResult::Auth(AuthResult {
            results: vec![("docker".to_string(), true), ("cloud".to_string(), true)]
        })
    );
    let done = ui.actions().iter().filter(|a| matches!(a, UiAction::StepDone { .. })).count();
    assert_eq!(done, 2);
    assert!(ui.actions().contains(&UiAction::StepGroupWait));
}

#[tokio::test]
async fn docs_lists_every_operation() {
    let ui = RecordingUi::new();
    let job = Job::builder().operation(Operation::Docs).build();
    let result = BuiltinDispatcher::new().execute(ctx(job, &ui, "/".as_ref())).await.unwrap();
    let JobResult::Docs(docs) = result else { panic!("expected docs result") };
    let names: Vec<_> = docs.operations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["noop", "init", "run", "auth", "docs"]);
    assert!(matches!(&ui.actions()[0], UiAction::Table { rows, .. } if rows.len() == 5));
}
