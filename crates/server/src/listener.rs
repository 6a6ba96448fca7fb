// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix socket front end for the job store.
//!
//! Each connection carries exactly one RPC. Unary requests get a single
//! [`Response`]; streaming requests hand the connection to the same
//! handlers the in-process service uses.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vg_wire::env::ipc_timeout;
use vg_wire::{
    read_request, write_response, FramedRecv, FramedSend, JobStreamEvent, ProtocolError, Request,
    Response, RunnerConfigRequest, RunnerConfigResponse, RunnerRequest, RunnerResponse,
};

use crate::handlers;
use crate::store::JobStore;

/// Accepts connections on a Unix socket until shut down.
pub struct Listener {
    socket: UnixListener,
    path: PathBuf,
    store: JobStore,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {}: {source}", path.display())]
    Bind { path: PathBuf, source: std::io::Error },

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    /// Bind `path`, replacing a stale socket file left by a previous server.
    pub fn bind(path: impl Into<PathBuf>, store: JobStore) -> Result<Self, ServerError> {
        let path = path.into();
        if path.exists() {
            debug!(socket = %path.display(), "removing stale socket");
            let _ = std::fs::remove_file(&path);
        }
        let socket = UnixListener::bind(&path)
            .map_err(|source| ServerError::Bind { path: path.clone(), source })?;
        Ok(Self { socket, path, store })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serve until `shutdown` is cancelled, then remove the socket file.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(socket = %self.path.display(), "listening");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.socket.accept() => match result {
                    Ok((stream, _)) => {
                        let store = self.store.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, store).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("accept error: {}", e),
                },
            }
        }
        let _ = std::fs::remove_file(&self.path);
        info!("listener stopped");
    }
}

fn log_connection_error(e: ServerError) {
    match e {
        ServerError::Protocol(ProtocolError::ConnectionClosed) => debug!("client disconnected"),
        ServerError::Protocol(ProtocolError::Timeout) => warn!("connection timeout"),
        _ => error!("connection error: {}", e),
    }
}

async fn handle_connection(mut stream: UnixStream, store: JobStore) -> Result<(), ServerError> {
    let request = read_request(&mut stream, ipc_timeout()).await?;
    debug!(rpc = request.name(), "request");

    let response = match request {
        Request::QueueJob { job, expires_in_ms } => {
            match store.queue(*job, expires_in_ms.map(Duration::from_millis)) {
                Ok(job_id) => Response::JobQueued { job_id },
                Err(status) => Response::Error { status },
            }
        }
        Request::CancelJob { job_id } => match store.cancel(&job_id) {
            Ok(()) => Response::Ok,
            Err(status) => Response::Error { status },
        },
        Request::SetConfig { vars } => {
            store.set_config(vars);
            Response::Ok
        }
        Request::GetJobStream { job_id } => {
            let send = FramedSend::<JobStreamEvent, _>::new(stream);
            handlers::job_stream(store, job_id, Box::new(send)).await;
            return Ok(());
        }
        Request::RunnerJobStream => {
            let (reader, writer) = stream.into_split();
            let recv = FramedRecv::<RunnerRequest, _>::new(reader);
            let send = FramedSend::<RunnerResponse, _>::new(writer);
            handlers::runner_job_stream(store, Box::new(recv), Box::new(send)).await;
            return Ok(());
        }
        Request::RunnerConfig => {
            let (reader, writer) = stream.into_split();
            let recv = FramedRecv::<RunnerConfigRequest, _>::new(reader);
            let send = FramedSend::<RunnerConfigResponse, _>::new(writer);
            handlers::runner_config(store, Box::new(recv), Box::new(send)).await;
            return Ok(());
        }
    };
    write_response(&mut stream, &response, ipc_timeout()).await?;
    Ok(())
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
