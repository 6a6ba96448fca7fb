// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted [`JobService`] for tests.
//!
//! Unary calls are recorded and answered immediately. Every stream call
//! hands the server end of a fresh channel pair to the paired
//! [`FakeServer`], so a test plays the job store by hand.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use vg_core::{ConfigVar, Job, JobId, Status};

use crate::{
    channel, BoxRecv, BoxSend, Duplex, JobService, JobStreamEvent, RunnerConfigRequest,
    RunnerConfigResponse, RunnerConfigStream, RunnerJobStream, RunnerRequest, RunnerResponse,
};

/// A unary call seen by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    QueueJob { job: Job, expires_in: Option<Duration> },
    CancelJob { job_id: JobId },
    SetConfig { vars: Vec<ConfigVar> },
}

/// Server side of an opened `GetJobStream`.
pub struct JobStreamEnd {
    pub job_id: JobId,
    pub send: BoxSend<JobStreamEvent>,
}

#[derive(Default)]
struct Recorded {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU32,
}

#[derive(Clone)]
pub struct FakeService {
    recorded: Arc<Recorded>,
    job_streams: mpsc::UnboundedSender<JobStreamEnd>,
    runner_streams: mpsc::UnboundedSender<Duplex<RunnerResponse, RunnerRequest>>,
    config_streams: mpsc::UnboundedSender<Duplex<RunnerConfigResponse, RunnerConfigRequest>>,
}

/// The test's handle on streams opened through a [`FakeService`].
pub struct FakeServer {
    recorded: Arc<Recorded>,
    pub job_streams: mpsc::UnboundedReceiver<JobStreamEnd>,
    pub runner_streams: mpsc::UnboundedReceiver<Duplex<RunnerResponse, RunnerRequest>>,
    pub config_streams: mpsc::UnboundedReceiver<Duplex<RunnerConfigResponse, RunnerConfigRequest>>,
}

impl FakeService {
    pub fn new() -> (Self, FakeServer) {
        let recorded = Arc::new(Recorded::default());
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (runner_tx, runner_rx) = mpsc::unbounded_channel();
        let (config_tx, config_rx) = mpsc::unbounded_channel();
        let service = Self {
            recorded: Arc::clone(&recorded),
            job_streams: job_tx,
            runner_streams: runner_tx,
            config_streams: config_tx,
        };
        let server = FakeServer {
            recorded,
            job_streams: job_rx,
            runner_streams: runner_rx,
            config_streams: config_rx,
        };
        (service, server)
    }

    fn record(&self, call: Call) {
        self.recorded.calls.lock().push(call);
    }
}

impl FakeServer {
    pub fn calls(&self) -> Vec<Call> {
        self.recorded.calls.lock().clone()
    }

    pub fn cancel_calls(&self) -> Vec<JobId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CancelJob { job_id } => Some(job_id),
                _ => None,
            })
            .collect()
    }
}

/// Open a channel pair and return (near end, far end).
fn duplex<A: Send + 'static, B: Send + 'static>() -> (Duplex<A, B>, Duplex<B, A>) {
    let (a_tx, a_rx) = channel::<A>();
    let (b_tx, b_rx) = channel::<B>();
    (Duplex::new(Box::new(a_tx), Box::new(b_rx)), Duplex::new(Box::new(b_tx), Box::new(a_rx)))
}

fn gone() -> Status {
    Status::unavailable("fake server dropped")
}

#[async_trait]
impl JobService for FakeService {
    async fn queue_job(&self, mut job: Job, expires_in: Option<Duration>) -> Result<JobId, Status> {
        if job.id.is_empty() {
            let n = self.recorded.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            job.id = JobId::from_string(format!("job-{}", n));
        }
        let id = job.id.clone();
        self.record(Call::QueueJob { job, expires_in });
        Ok(id)
    }

    async fn get_job_stream(&self, job_id: &JobId) -> Result<BoxRecv<JobStreamEvent>, Status> {
        let (tx, rx) = channel::<JobStreamEvent>();
        let end = JobStreamEnd { job_id: job_id.clone(), send: Box::new(tx) };
        self.job_streams.send(end).map_err(|_| gone())?;
        Ok(Box::new(rx))
    }

    async fn cancel_job(&self, job_id: &JobId) -> Result<(), Status> {
        self.record(Call::CancelJob { job_id: job_id.clone() });
        Ok(())
    }

    async fn runner_job_stream(&self) -> Result<RunnerJobStream, Status> {
        let (near, far) = duplex::<RunnerRequest, RunnerResponse>();
        self.runner_streams.send(far).map_err(|_| gone())?;
        Ok(near)
    }

    async fn runner_config(&self) -> Result<RunnerConfigStream, Status> {
        let (near, far) = duplex::<RunnerConfigRequest, RunnerConfigResponse>();
        self.config_streams.send(far).map_err(|_| gone())?;
        Ok(near)
    }

    async fn set_config(&self, vars: Vec<ConfigVar>) -> Result<(), Status> {
        self.record(Call::SetConfig { vars });
        Ok(())
    }
}
