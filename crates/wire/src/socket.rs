// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`JobService`] over a Unix socket, one connection per RPC.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UnixStream;
use tracing::debug;
use vg_core::{ConfigVar, Job, JobId, Status};

use crate::env::ipc_timeout;
use crate::wire::{read_frame, write_frame, ProtocolError};
use crate::{
    BoxRecv, Duplex, FramedRecv, FramedSend, JobService, JobStreamEvent, Request, Response,
    RunnerConfigRequest, RunnerConfigResponse, RunnerConfigStream, RunnerJobStream,
    RunnerRequest, RunnerResponse,
};

/// Client for a job store listening on a Unix socket.
#[derive(Debug, Clone)]
pub struct SocketService {
    path: PathBuf,
}

impl SocketService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self, request: &Request) -> Result<UnixStream, Status> {
        debug!(rpc = request.name(), socket = %self.path.display(), "opening connection");
        let connect = UnixStream::connect(&self.path);
        let mut stream = tokio::time::timeout(ipc_timeout(), connect)
            .await
            .map_err(|_| Status::unavailable("timed out connecting to server"))?
            .map_err(|e| {
                Status::unavailable(format!("connecting to {}: {}", self.path.display(), e))
            })?;
        tokio::time::timeout(ipc_timeout(), write_frame(&mut stream, request))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        Ok(stream)
    }

    async fn unary(&self, request: Request) -> Result<Response, Status> {
        let mut stream = self.open(&request).await?;
        let response: Response = tokio::time::timeout(ipc_timeout(), read_frame(&mut stream))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        match response {
            Response::Error { status } => Err(status),
            other => Ok(other),
        }
    }
}

fn unexpected(response: Response) -> Status {
    Status::internal(format!("unexpected response: {:?}", response))
}

#[async_trait]
impl JobService for SocketService {
    async fn queue_job(&self, job: Job, expires_in: Option<Duration>) -> Result<JobId, Status> {
        let expires_in_ms = expires_in.map(|d| d.as_millis() as u64);
        match self.unary(Request::QueueJob { job: Box::new(job), expires_in_ms }).await? {
            Response::JobQueued { job_id } => Ok(job_id),
            other => Err(unexpected(other)),
        }
    }

    async fn get_job_stream(&self, job_id: &JobId) -> Result<BoxRecv<JobStreamEvent>, Status> {
        let stream = self.open(&Request::GetJobStream { job_id: job_id.clone() }).await?;
        Ok(Box::new(FramedRecv::<JobStreamEvent, _>::new(stream)))
    }

    async fn cancel_job(&self, job_id: &JobId) -> Result<(), Status> {
        match self.unary(Request::CancelJob { job_id: job_id.clone() }).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn runner_job_stream(&self) -> Result<RunnerJobStream, Status> {
        let stream = self.open(&Request::RunnerJobStream).await?;
        let (reader, writer) = stream.into_split();
        let send = FramedSend::<RunnerRequest, _>::new(writer);
        let recv = FramedRecv::<RunnerResponse, _>::new(reader);
        Ok(Duplex::new(Box::new(send), Box::new(recv)))
    }

    async fn runner_config(&self) -> Result<RunnerConfigStream, Status> {
        let stream = self.open(&Request::RunnerConfig).await?;
        let (reader, writer) = stream.into_split();
        let send = FramedSend::<RunnerConfigRequest, _>::new(writer);
        let recv = FramedRecv::<RunnerConfigResponse, _>::new(reader);
        Ok(Duplex::new(Box::new(send), Box::new(recv)))
    }

    async fn set_config(&self, vars: Vec<ConfigVar>) -> Result<(), Status> {
        match self.unary(Request::SetConfig { vars }).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
