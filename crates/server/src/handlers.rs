// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming RPC handlers, generic over transport.

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use vg_core::{JobId, JobState, Status};
use vg_wire::{
    BoxRecv, BoxSend, JobStreamEvent, RunnerConfigRequest, RunnerConfigResponse, RunnerRequest,
    RunnerResponse,
};

use crate::store::{AckOutcome, JobStore};

/// Read a stream on its own task so handlers can `select!` on it.
///
/// The receiver yields `Ok(None)` once for EOF; an error also ends the pump.
fn pump<T: Send + 'static>(mut recv: BoxRecv<T>) -> mpsc::Receiver<Result<Option<T>, Status>> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        loop {
            let msg = recv.recv().await;
            let end = !matches!(msg, Ok(Some(_)));
            if tx.send(msg).await.is_err() || end {
                break;
            }
        }
    });
    rx
}

async fn next<T>(incoming: &mut mpsc::Receiver<Result<Option<T>, Status>>) -> Result<Option<T>, Status> {
    incoming.recv().await.unwrap_or(Ok(None))
}

/// Upper bound on terminal events per `Terminal` frame.
const TERMINAL_BATCH: usize = 64;

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn changed(rx: &mut watch::Receiver<u64>) {
    // The store outlives every handler, so the sender is never dropped here.
    let _ = rx.changed().await;
}

/// Serve `GetJobStream`: `Open`, state changes and output in order, then
/// `Complete`.
pub(crate) async fn job_stream(store: JobStore, job_id: JobId, mut send: BoxSend<JobStreamEvent>) {
    let mut rx = store.subscribe();
    if store.delta(&job_id, 0).is_none() {
        let _ = send.fail(Status::not_found(format!("job {}", job_id))).await;
        return;
    }
    if send.send(JobStreamEvent::Open).await.is_err() {
        return;
    }

    let mut last: Option<(JobState, bool)> = None;
    let mut cursor = 0;
    loop {
        rx.borrow_and_update();
        let Some(delta) = store.delta(&job_id, cursor) else { break };

        if last != Some((delta.state, delta.canceling)) {
            let previous = last.map(|(s, _)| s).unwrap_or(delta.state);
            let ev = JobStreamEvent::State {
                previous,
                current: delta.state,
                canceling: delta.canceling,
            };
            if send.send(ev).await.is_err() {
                return;
            }
            last = Some((delta.state, delta.canceling));
        }

        cursor += delta.events.len();
        let mut events = delta.events;
        while !events.is_empty() {
            let rest = events.split_off(events.len().min(TERMINAL_BATCH));
            if send.send(JobStreamEvent::Terminal { events }).await.is_err() {
                return;
            }
            events = rest;
        }

        if delta.state.is_terminal() {
            let (result, error) = store.outcome(&job_id);
            let _ = send.send(JobStreamEvent::Complete { result, error }).await;
            break;
        }

        changed(&mut rx).await;
    }
    send.close().await;
}

/// Serve `RunnerJobStream` for one accept cycle.
pub(crate) async fn runner_job_stream(
    store: JobStore,
    recv: BoxRecv<RunnerRequest>,
    mut send: BoxSend<RunnerResponse>,
) {
    let mut incoming = pump(recv);

    let runner_id = match next(&mut incoming).await {
        Ok(Some(RunnerRequest::Request { runner_id })) => runner_id,
        Ok(Some(other)) => {
            let msg = format!("expected Request, runner sent {}", other.name());
            let _ = send.fail(Status::aborted(msg)).await;
            return;
        }
        Ok(None) | Err(_) => return,
    };
    let Some(runner) = store.runner(&runner_id) else {
        let _ = send.fail(Status::not_found(format!("runner {} is not registered", runner_id))).await;
        return;
    };

    // Wait for an assignable job, or for the runner to go away.
    let mut rx = store.subscribe();
    let job = loop {
        rx.borrow_and_update();
        if let Some(job) = store.try_assign(&runner) {
            break job;
        }
        tokio::select! {
            _ = changed(&mut rx) => {}
            msg = next(&mut incoming) => {
                debug!(runner_id = %runner_id, "runner left while waiting: {:?}", msg.map(|m| m.map(|m| m.name())));
                return;
            }
        }
    };
    let job_id = job.id.clone();

    if send.send(RunnerResponse::Assignment { job: Box::new(job) }).await.is_err() {
        store.requeue(&job_id);
        return;
    }

    match next(&mut incoming).await {
        Ok(Some(RunnerRequest::Ack)) => {}
        Ok(Some(RunnerRequest::Error { .. })) => {
            info!(job_id = %job_id, runner_id = %runner_id, "runner nacked assignment");
            store.requeue(&job_id);
            send.close().await;
            return;
        }
        other => {
            warn!(job_id = %job_id, "expected ack, got {:?}", other.map(|m| m.map(|m| m.name())));
            store.requeue(&job_id);
            send.close().await;
            return;
        }
    }

    if let AckOutcome::Cancelled = store.ack(&job_id) {
        let _ = send.send(RunnerResponse::Cancel { force: true }).await;
        send.close().await;
        return;
    }

    let mut cancels_sent = 0;
    loop {
        rx.borrow_and_update();
        let requests = store.cancel_requests(&job_id);
        if requests > cancels_sent {
            cancels_sent = requests;
            let force = requests > 1;
            info!(job_id = %job_id, force, "sending cancel to runner");
            let _ = send.send(RunnerResponse::Cancel { force }).await;
            if force {
                store.finish(&job_id, None, Some(Status::cancelled("job force cancelled")));
                send.close().await;
                return;
            }
        }

        let heartbeat_deadline = store.heartbeat_deadline(&job_id);
        tokio::select! {
            _ = changed(&mut rx) => {}
            _ = until(heartbeat_deadline) => {
                if store.expire_heartbeat(&job_id) {
                    let _ = send.send(RunnerResponse::Cancel { force: true }).await;
                    send.close().await;
                    return;
                }
            }
            msg = next(&mut incoming) => match msg {
                Ok(Some(RunnerRequest::Terminal { events })) => store.append_output(&job_id, events),
                Ok(Some(RunnerRequest::Heartbeat)) => store.heartbeat(&job_id),
                Ok(Some(RunnerRequest::Complete { result })) => {
                    store.finish(&job_id, Some(result), None);
                    break;
                }
                Ok(Some(RunnerRequest::Error { error })) => {
                    let error = error.unwrap_or_else(|| Status::unknown("runner reported an error"));
                    store.finish(&job_id, None, Some(error));
                    break;
                }
                Ok(Some(other)) => {
                    warn!(job_id = %job_id, "unexpected runner message {}", other.name());
                }
                Ok(None) => {
                    store.finish(&job_id, None, Some(Status::unavailable("runner disconnected")));
                    return;
                }
                Err(e) => {
                    store.finish(&job_id, None, Some(e));
                    return;
                }
            }
        }
    }
    send.close().await;
}

/// Serve `RunnerConfig`: register the runner, push its config on every
/// change, deregister on close.
pub(crate) async fn runner_config(
    store: JobStore,
    recv: BoxRecv<RunnerConfigRequest>,
    mut send: BoxSend<RunnerConfigResponse>,
) {
    let mut incoming = pump(recv);
    let runner = match next(&mut incoming).await {
        Ok(Some(RunnerConfigRequest::Open { runner })) => runner,
        Ok(None) | Err(_) => return,
    };
    let runner_id = runner.id.clone();
    let mut rx = store.subscribe();
    store.register_runner(runner);

    let mut last = None;
    loop {
        rx.borrow_and_update();
        let config = store.config_for(&runner_id);
        if last.as_ref() != Some(&config) {
            if send.send(RunnerConfigResponse::Config { config: config.clone() }).await.is_err() {
                break;
            }
            last = Some(config);
        }
        tokio::select! {
            _ = changed(&mut rx) => {}
            _ = next(&mut incoming) => break,
        }
    }
    store.deregister_runner(&runner_id);
    send.close().await;
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
