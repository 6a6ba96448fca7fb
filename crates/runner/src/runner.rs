// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner lifecycle: build, start (register), accept jobs, close.
//!
//! 1. Build with [`Runner::builder`]. Nothing is registered yet.
//! 2. [`Runner::start`] opens the config stream, applies the initial config,
//!    and keeps applying pushed config in the background.
//! 3. [`Runner::accept`] runs exactly one job. Call it repeatedly, or from
//!    several tasks to run jobs in parallel.
//! 4. [`Runner::close`] waits for in-flight jobs, then stops the config loop.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, trace, warn, Instrument, Span};
use vg_core::{DataSourceKind, RunnerId, RunnerInfo, Status};
use vg_terminal::Ui;
use vg_wire::{
    BoxRecv, BoxSend, Duplex, JobService, RunnerConfigRequest, RunnerConfigResponse,
};

use crate::dispatch::{BuiltinDispatcher, OperationDispatcher};
use crate::env::{ConfigWatcher, EnvAdapter, ProcessEnv};
use crate::error::RunnerError;
use crate::source::{GitSourcer, LocalSourcer, Sourcer};

/// Interval between heartbeats while a job executes.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

struct ConfigLoop {
    stop: CancellationToken,
    send: BoxSend<RunnerConfigRequest>,
    task: JoinHandle<()>,
}

pub(crate) struct Inner {
    pub(crate) info: RunnerInfo,
    pub(crate) service: Arc<dyn JobService>,
    /// Local UI mirrored alongside the streamed one (local mode).
    pub(crate) ui: Option<Arc<dyn Ui>>,
    pub(crate) heartbeat: Duration,
    pub(crate) sourcers: HashMap<DataSourceKind, Arc<dyn Sourcer>>,
    pub(crate) dispatcher: Arc<dyn OperationDispatcher>,
    /// Jobs between assignment and the end of their accept cycle.
    pub(crate) in_flight: TaskTracker,
    pub(crate) span: Span,
    closed: AtomicBool,
    watcher: Arc<Mutex<ConfigWatcher>>,
    config: tokio::sync::Mutex<Option<ConfigLoop>>,
}

/// A job runner. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct Runner {
    pub(crate) inner: Arc<Inner>,
}

pub struct RunnerBuilder {
    service: Arc<dyn JobService>,
    id: RunnerId,
    ui: Option<Arc<dyn Ui>>,
    by_id_only: bool,
    heartbeat_interval: Duration,
    workdir: Option<PathBuf>,
    sourcers: HashMap<DataSourceKind, Arc<dyn Sourcer>>,
    dispatcher: Option<Arc<dyn OperationDispatcher>>,
    env: Option<Box<dyn EnvAdapter>>,
}

impl RunnerBuilder {
    vg_core::setters! {
        into {
            id: RunnerId,
        }
        set {
            by_id_only: bool,
            heartbeat_interval: Duration,
        }
        option {
            workdir: PathBuf,
        }
    }

    /// Local mode: mirror job output to `ui` as well as the stream.
    pub fn local(mut self, ui: Arc<dyn Ui>) -> Self {
        self.ui = Some(ui);
        self
    }

    pub fn sourcer(mut self, kind: DataSourceKind, sourcer: Arc<dyn Sourcer>) -> Self {
        self.sourcers.insert(kind, sourcer);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn OperationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Environment the config watcher manages. Defaults to the process env.
    pub fn env(mut self, env: Box<dyn EnvAdapter>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn build(self) -> Result<Runner, RunnerError> {
        let workdir = match self.workdir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|source| RunnerError::Workdir { path: PathBuf::from("."), source })?,
        };
        let workdir = std::path::absolute(&workdir)
            .map_err(|source| RunnerError::Workdir { path: workdir.clone(), source })?;

        let mut sourcers = self.sourcers;
        sourcers
            .entry(DataSourceKind::Local)
            .or_insert_with(|| Arc::new(LocalSourcer::new(workdir)));
        sourcers.entry(DataSourceKind::Git).or_insert_with(|| Arc::new(GitSourcer::default()));

        let info = RunnerInfo { id: self.id.clone(), by_id_only: self.by_id_only };
        let span = info_span!("runner", runner_id = %self.id);
        let env = self.env.unwrap_or_else(|| Box::new(ProcessEnv));
        let watcher = ConfigWatcher::new(env, self.id);
        let dispatcher =
            self.dispatcher.unwrap_or_else(|| Arc::new(BuiltinDispatcher::new()));

        Ok(Runner {
            inner: Arc::new(Inner {
                info,
                service: self.service,
                ui: self.ui,
                heartbeat: self.heartbeat_interval,
                sourcers,
                dispatcher,
                in_flight: TaskTracker::new(),
                span,
                closed: AtomicBool::new(false),
                watcher: Arc::new(Mutex::new(watcher)),
                config: tokio::sync::Mutex::new(None),
            }),
        })
    }
}

impl Runner {
    pub fn builder(service: Arc<dyn JobService>) -> RunnerBuilder {
        RunnerBuilder {
            service,
            id: RunnerId::new(),
            ui: None,
            by_id_only: false,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            workdir: None,
            sourcers: HashMap::new(),
            dispatcher: None,
            env: None,
        }
    }

    pub fn id(&self) -> &RunnerId {
        &self.inner.info.id
    }

    pub fn info(&self) -> &RunnerInfo {
        &self.inner.info
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Jobs currently between assignment and the end of their accept cycle.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.len()
    }

    /// Register with the server and apply the initial config.
    ///
    /// Returns once the first config has been applied; later pushes are
    /// applied by a background task until [`Runner::close`].
    pub async fn start(&self) -> Result<(), RunnerError> {
        if self.is_closed() {
            return Err(RunnerError::Closed);
        }
        let mut config = self.inner.config.lock().await;
        if config.is_some() {
            return Err(RunnerError::AlreadyStarted);
        }

        let span = self.inner.span.clone();
        async {
            debug!("registering runner");
            let Duplex { mut send, mut recv } = self.inner.service.runner_config().await?;
            send.send(RunnerConfigRequest::Open { runner: self.inner.info.clone() }).await?;

            trace!("runner connected, waiting for initial config");
            match recv.recv().await? {
                Some(RunnerConfigResponse::Config { config }) => {
                    self.inner.watcher.lock().apply(&config);
                }
                None => {
                    return Err(Status::unavailable("config stream closed before initial config"))
                }
            }

            let stop = CancellationToken::new();
            let task = tokio::spawn(
                watch_config(recv, Arc::clone(&self.inner.watcher), stop.clone())
                    .in_current_span(),
            );
            *config = Some(ConfigLoop { stop, send, task });
            info!("runner registered with server");
            Ok(())
        }
        .instrument(span)
        .await
        .map_err(RunnerError::from)
    }

    /// Stop accepting jobs, wait for in-flight ones, then deregister.
    /// Idempotent.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let span = self.inner.span.clone();
        async {
            self.inner.in_flight.close();
            self.inner.in_flight.wait().await;
            info!("closing down the runner");

            if let Some(mut config) = self.inner.config.lock().await.take() {
                config.stop.cancel();
                config.send.close().await;
                if let Err(e) = config.task.await {
                    warn!(error = %e, "config watcher task failed");
                }
            }
            info!("runner closed");
        }
        .instrument(span)
        .await
    }
}

/// Apply config pushes until the stream ends or `stop` fires.
async fn watch_config(
    mut recv: BoxRecv<RunnerConfigResponse>,
    watcher: Arc<Mutex<ConfigWatcher>>,
    stop: CancellationToken,
) {
    loop {
        let msg = tokio::select! {
            _ = stop.cancelled() => return,
            msg = recv.recv() => msg,
        };
        match msg {
            Ok(Some(RunnerConfigResponse::Config { config })) => {
                watcher.lock().apply(&config);
            }
            Ok(None) => {
                debug!("config stream closed");
                return;
            }
            Err(e) => {
                warn!(error = %e, "config stream failed");
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
