// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_core::test_support::noop_job;
use vg_core::{Code, ConfigVar, JobId, JobResult, RunnerId, RunnerInfo};
use vg_wire::{JobService, SocketService};

struct Harness {
    _dir: tempfile::TempDir,
    service: SocketService,
    store: JobStore,
    shutdown: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

fn start() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vg.sock");
    let store = JobStore::new();
    let listener = Listener::bind(&path, store.clone()).unwrap();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(listener.run(shutdown.clone()));
    Harness { _dir: dir, service: SocketService::new(path), store, shutdown, task }
}

#[tokio::test]
async fn unary_requests_reach_the_store() {
    let h = start();
    let id = h.service.queue_job(noop_job(""), None).await.unwrap();
    assert!(h.store.job(&id).is_some());

    h.service.cancel_job(&id).await.unwrap();
    assert_eq!(h.store.job(&id).unwrap().error.map(|e| e.code), Some(Code::Cancelled));

    h.service.set_config(vec![ConfigVar::new("VG_X", "1")]).await.unwrap();
    let config = h.store.config_for(&RunnerId::from_string("rnr-a"));
    assert_eq!(config.config_vars, vec![ConfigVar::new("VG_X", "1")]);
}

#[tokio::test]
async fn unary_error_is_returned_as_status() {
    let h = start();
    let err = h.service.cancel_job(&JobId::from_string("job-nope")).await.unwrap_err();
    assert_eq!(err.code, Code::NotFound);
}

#[tokio::test]
async fn job_runs_end_to_end_over_socket() {
    let h = start();
    let runner_id = RunnerId::from_string("rnr-a");

    let mut cfg = h.service.runner_config().await.unwrap();
    let runner = RunnerInfo::new(runner_id.clone());
    cfg.send.send(RunnerConfigRequest::Open { runner }).await.unwrap();
    assert!(cfg.recv.recv().await.unwrap().is_some());

    let job_id = h.service.queue_job(noop_job(""), None).await.unwrap();
    let mut events = h.service.get_job_stream(&job_id).await.unwrap();
    assert_eq!(events.recv().await.unwrap(), Some(JobStreamEvent::Open));

    let mut jobs = h.service.runner_job_stream().await.unwrap();
    jobs.send.send(RunnerRequest::Request { runner_id }).await.unwrap();
    let Some(RunnerResponse::Assignment { job }) = jobs.recv.recv().await.unwrap() else {
        panic!("expected assignment");
    };
    assert_eq!(job.id, job_id);
    jobs.send.send(RunnerRequest::Ack).await.unwrap();
    jobs.send.send(RunnerRequest::Complete { result: JobResult::Noop }).await.unwrap();
    assert_eq!(jobs.recv.recv().await.unwrap(), None);

    let mut last = None;
    while let Some(ev) = events.recv().await.unwrap() {
        last = Some(ev);
    }
    assert_eq!(last, Some(JobStreamEvent::Complete { result: Some(JobResult::Noop), error: None }));
}

#[tokio::test]
async fn shutdown_stops_listener_and_removes_socket() {
    let h = start();
    let path = h.service.path().to_path_buf();
    assert!(path.exists());
    h.shutdown.cancel();
    h.task.await.unwrap();
    assert!(!path.exists());

    let err = h.service.set_config(vec![]).await.unwrap_err();
    assert_eq!(err.code, Code::Unavailable);
}

#[tokio::test]
async fn bind_replaces_stale_socket_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vg.sock");
    std::fs::write(&path, b"").unwrap();
    let listener = Listener::bind(&path, JobStore::new()).unwrap();
    assert_eq!(listener.path(), path.as_path());
}
