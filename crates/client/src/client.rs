// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job client: build, queue, and follow jobs.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument, Span};
use vg_core::{Job, JobId, JobResult, RunnerTarget, Scope, Status};
use vg_runner::Runner;
use vg_terminal::Ui;
use vg_wire::JobService;

use crate::error::ClientError;
use crate::final_context::DEFAULT_FINAL_TIMEOUT;

/// Expiry attached to jobs queued in local mode, so a job orphaned by an
/// ungraceful exit does not stay queued forever.
pub const DEFAULT_LOCAL_JOB_EXPIRY: Duration = Duration::from_secs(30);

/// Called once with the id of a freshly queued job. The returned future is
/// spawned and awaited before the job call returns.
pub type OnIdAssigned =
    Box<dyn FnOnce(JobId) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// Queues jobs and streams their results.
pub struct Client {
    pub(crate) service: Arc<dyn JobService>,
    pub(crate) ui: Arc<dyn Ui>,
    scope: Scope,
    /// Co-located runner in local mode.
    runner: Option<Runner>,
    pub(crate) local_expiry: Duration,
    pub(crate) final_timeout: Duration,
    pub(crate) span: Span,
}

pub struct ClientBuilder {
    service: Arc<dyn JobService>,
    ui: Arc<dyn Ui>,
    scope: Scope,
    runner: Option<Runner>,
    local_expiry: Duration,
    final_timeout: Duration,
}

impl ClientBuilder {
    vg_core::setters! {
        set {
            scope: Scope,
            local_expiry: Duration,
            final_timeout: Duration,
        }
    }

    /// Local mode: target `runner` and have it accept exactly our jobs.
    /// The runner should already be started.
    pub fn local_runner(mut self, runner: Runner) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn build(self) -> Client {
        let span = match &self.runner {
            Some(runner) => info_span!("client", mode = "local", runner_id = %runner.id()),
            None => info_span!("client", mode = "remote"),
        };
        Client {
            service: self.service,
            ui: self.ui,
            scope: self.scope,
            runner: self.runner,
            local_expiry: self.local_expiry,
            final_timeout: self.final_timeout,
            span,
        }
    }
}

impl Client {
    pub fn builder(service: Arc<dyn JobService>, ui: Arc<dyn Ui>) -> ClientBuilder {
        ClientBuilder {
            service,
            ui,
            scope: Scope::basis("default"),
            runner: None,
            local_expiry: DEFAULT_LOCAL_JOB_EXPIRY,
            final_timeout: DEFAULT_FINAL_TIMEOUT,
        }
    }

    pub fn is_local(&self) -> bool {
        self.runner.is_some()
    }

    pub fn ui(&self) -> &Arc<dyn Ui> {
        &self.ui
    }

    /// Job skeleton with the client's defaults: no-op operation on local
    /// data, targeting the local runner in local mode.
    pub fn job(&self) -> Job {
        let target = match &self.runner {
            Some(runner) => RunnerTarget::Id(runner.id().clone()),
            None => RunnerTarget::Any,
        };
        Job::new(self.scope.clone()).target_runner(target)
    }

    /// Queue `job` and stream it to completion. In local mode the local
    /// runner is told to accept exactly this job.
    ///
    /// `ui` defaults to the client's UI.
    pub async fn do_job(
        &self,
        cancel: &CancellationToken,
        job: Job,
        ui: Option<Arc<dyn Ui>>,
    ) -> Result<JobResult, ClientError> {
        let ui = ui.unwrap_or_else(|| Arc::clone(&self.ui));
        let on_id = self.runner.clone().map(|runner| {
            let cancel = cancel.clone();
            let accept: OnIdAssigned = Box::new(move |id: JobId| {
                let fut = async move {
                    if let Err(e) = runner.accept_exact(&cancel, &id).await {
                        error!(error = %e, "runner job accept error");
                    }
                };
                Box::pin(fut.in_current_span()) as Pin<Box<dyn Future<Output = ()> + Send>>
            });
            accept
        });
        self.queue_and_stream(cancel, job, ui, on_id).await
    }

    /// Queue `job`, hand its id to `on_id`, and follow its stream.
    pub async fn queue_and_stream(
        &self,
        cancel: &CancellationToken,
        job: Job,
        ui: Arc<dyn Ui>,
        on_id: Option<OnIdAssigned>,
    ) -> Result<JobResult, ClientError> {
        let expires_in = self.is_local().then_some(self.local_expiry);
        let operation = job.operation.name();
        async {
            debug!(operation, "queueing job");
            let job_id = tokio::select! {
                biased;
                r = self.service.queue_job(job, expires_in) => r?,
                _ = cancel.cancelled() => {
                    let st = Status::cancelled("cancelled while queueing job");
                    return Err(ClientError::Stream(st));
                }
            };
            let span = info_span!("job", %job_id);
            async {
                info!("job queued");

                // Cancelling this stops a local accept still waiting for an
                // assignment if streaming fails before the job ever ran.
                let accept_cancel = CancellationToken::new();
                let accept = on_id.map(|f| {
                    let fut = f(job_id.clone());
                    let stop = accept_cancel.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = stop.cancelled() => debug!("local accept abandoned"),
                            _ = fut => {}
                        }
                    })
                });

                let result = self.stream(cancel, &job_id, Arc::clone(&ui)).await;

                if let Some(task) = accept {
                    if matches!(result, Err(ClientError::Stream(_))) && !cancel.is_cancelled() {
                        accept_cancel.cancel();
                    }
                    info!("waiting for accept to finish");
                    let _ = task.await;
                    debug!("finished waiting for job accept");
                }
                result
            }
            .instrument(span)
            .await
        }
        .instrument(self.span.clone())
        .await
    }

    /// Close the local runner, if any, waiting for its in-flight jobs.
    pub async fn close(&self) {
        if let Some(runner) = &self.runner {
            info!(runner_id = %runner.id(), "stopping local runner");
            runner.close().await;
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
