// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job store's RPC surface.

use std::time::Duration;

use async_trait::async_trait;
use vg_core::{ConfigVar, Job, JobId, Status};

use crate::{
    BoxRecv, Duplex, JobStreamEvent, RunnerConfigRequest, RunnerConfigResponse, RunnerRequest,
    RunnerResponse,
};

/// Runner end of `RunnerJobStream`.
pub type RunnerJobStream = Duplex<RunnerRequest, RunnerResponse>;

/// Runner end of `RunnerConfig`.
pub type RunnerConfigStream = Duplex<RunnerConfigRequest, RunnerConfigResponse>;

/// Job store operations used by clients and runners.
///
/// Implemented in-process by the job store and over a Unix socket by
/// [`SocketService`](crate::SocketService).
#[async_trait]
pub trait JobService: Send + Sync + 'static {
    /// Enqueue a job and return its assigned id. `expires_in` bounds how
    /// long the job may wait for a runner.
    async fn queue_job(&self, job: Job, expires_in: Option<Duration>) -> Result<JobId, Status>;

    /// Open a job's event stream. The first event is always `Open`.
    async fn get_job_stream(&self, job_id: &JobId) -> Result<BoxRecv<JobStreamEvent>, Status>;

    async fn cancel_job(&self, job_id: &JobId) -> Result<(), Status>;

    async fn runner_job_stream(&self) -> Result<RunnerJobStream, Status>;

    async fn runner_config(&self) -> Result<RunnerConfigStream, Status>;

    async fn set_config(&self, vars: Vec<ConfigVar>) -> Result<(), Status>;
}
