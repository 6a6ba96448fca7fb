// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process [`JobService`] over channel streams.

use std::time::Duration;

use async_trait::async_trait;
use vg_core::{ConfigVar, Job, JobId, Status};
use vg_wire::{
    channel, BoxRecv, Duplex, JobService, JobStreamEvent, RunnerConfigRequest,
    RunnerConfigResponse, RunnerConfigStream, RunnerJobStream, RunnerRequest, RunnerResponse,
};

use crate::handlers;
use crate::store::JobStore;

/// Calls the job store directly; each stream is served by a spawned task.
#[derive(Clone, Default)]
pub struct LocalService {
    store: JobStore,
}

impl LocalService {
    pub fn new(store: JobStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }
}

#[async_trait]
impl JobService for LocalService {
    async fn queue_job(&self, job: Job, expires_in: Option<Duration>) -> Result<JobId, Status> {
        self.store.queue(job, expires_in)
    }

    async fn get_job_stream(&self, job_id: &JobId) -> Result<BoxRecv<JobStreamEvent>, Status> {
        let (tx, rx) = channel::<JobStreamEvent>();
        tokio::spawn(handlers::job_stream(self.store.clone(), job_id.clone(), Box::new(tx)));
        Ok(Box::new(rx))
    }

    async fn cancel_job(&self, job_id: &JobId) -> Result<(), Status> {
        self.store.cancel(job_id)
    }

    async fn runner_job_stream(&self) -> Result<RunnerJobStream, Status> {
        let (to_server, server_rx) = channel::<RunnerRequest>();
        let (server_tx, from_server) = channel::<RunnerResponse>();
        tokio::spawn(handlers::runner_job_stream(
            self.store.clone(),
            Box::new(server_rx),
            Box::new(server_tx),
        ));
        Ok(Duplex::new(Box::new(to_server), Box::new(from_server)))
    }

    async fn runner_config(&self) -> Result<RunnerConfigStream, Status> {
        let (to_server, server_rx) = channel::<RunnerConfigRequest>();
        let (server_tx, from_server) = channel::<RunnerConfigResponse>();
        tokio::spawn(handlers::runner_config(
            self.store.clone(),
            Box::new(server_rx),
            Box::new(server_tx),
        ));
        Ok(Duplex::new(Box::new(to_server), Box::new(from_server)))
    }

    async fn set_config(&self, vars: Vec<ConfigVar>) -> Result<(), Status> {
        self.store.set_config(vars);
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
