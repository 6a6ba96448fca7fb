// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One accept cycle: request, assignment, ack, execute, report.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};
use vg_core::{Job, JobId, JobResult, Status};
use vg_terminal::{MultiUi, StreamUi, Ui, UiError};
use vg_wire::{BoxRecv, Duplex, RunnerRequest, RunnerResponse};

use crate::dispatch::ExecContext;
use crate::error::RunnerError;
use crate::runner::Runner;
use crate::writer::Writer;

impl Runner {
    /// Accept and execute a single job, blocking until one is assigned.
    ///
    /// Only errors internal to the runner are returned; a failing job is
    /// reported on the job stream. Safe to call concurrently.
    pub async fn accept(&self, cancel: &CancellationToken) -> Result<(), RunnerError> {
        self.accept_inner(cancel, None).await
    }

    /// Like [`Runner::accept`], but nack any assignment other than `id`.
    /// Used in local mode so a co-located runner only runs its own job.
    pub async fn accept_exact(
        &self,
        cancel: &CancellationToken,
        id: &JobId,
    ) -> Result<(), RunnerError> {
        self.accept_inner(cancel, Some(id)).await
    }

    async fn accept_inner(
        &self,
        cancel: &CancellationToken,
        exact: Option<&JobId>,
    ) -> Result<(), RunnerError> {
        if self.is_closed() {
            return Err(RunnerError::Closed);
        }
        let span = self.inner.span.clone();
        self.cycle(cancel, exact).instrument(span).await
    }

    async fn cycle(
        &self,
        cancel: &CancellationToken,
        exact: Option<&JobId>,
    ) -> Result<(), RunnerError> {
        // The stream is not tied to `cancel`: errors must still be
        // reported after the caller gives up.
        debug!("opening job stream");
        let Duplex { mut send, mut recv } = self.inner.service.runner_job_stream().await?;

        trace!("sending job request");
        send.send(RunnerRequest::Request { runner_id: self.id().clone() }).await?;

        info!("waiting for job assignment");
        let msg = tokio::select! {
            _ = cancel.cancelled() => {
                send.close().await;
                return Err(Status::cancelled("cancelled while waiting for a job").into());
            }
            msg = recv.recv() => msg?,
        };
        let job = match msg {
            Some(RunnerResponse::Assignment { job }) => *job,
            Some(other) => {
                return Err(Status::aborted(format!(
                    "expected job assignment, server sent {}",
                    other.name()
                ))
                .into())
            }
            None => return Err(Status::unavailable("job stream closed before assignment").into()),
        };

        let span = info_span!("job", job_id = %job.id, operation = job.operation.name());
        async move {
            info!("job assignment received");

            // Count the job before acking so a racing close() waits for it.
            let _in_flight = self.inner.in_flight.token();

            if let Some(id) = exact {
                if job.id != *id {
                    warn!(expected = %id, "unexpected job id for exact match, nacking");
                    send.send(RunnerRequest::Error { error: None }).await?;
                    send.close().await;
                    return Err(Status::aborted("server sent us an invalid job").into());
                }
                trace!("assigned job matches expected ID for local mode");
            }

            trace!("acking job assignment");
            send.send(RunnerRequest::Ack).await?;

            let ctx = cancel.child_token();
            let _stop = ctx.clone().drop_guard();
            let (writer, events, writer_task) = Writer::spawn(send);
            let watcher = Watcher::spawn(recv, ctx.clone());
            let heartbeat = spawn_heartbeat(writer.clone(), self.inner.heartbeat, ctx.clone());

            let stream_ui = Arc::new(StreamUi::new(events, ctx.clone()));
            let outcome = match self.job_ui(&stream_ui) {
                Ok(ui) => self.execute(&job, ui, &ctx).await,
                Err(e) => Err(e.into()),
            };
            // No more output once execution returns; this also stops the heartbeat.
            stream_ui.close();
            debug!(error = ?outcome.as_ref().err(), "job finished");
            let _ = heartbeat.await;

            let result = self.report(outcome, &writer, watcher, &ctx).await;
            drop(writer);
            let _ = writer_task.await;
            result
        }
        .instrument(span)
        .await
    }

    /// The streamed UI, mirrored to the local UI in local mode.
    fn job_ui(&self, stream_ui: &Arc<StreamUi>) -> Result<Arc<dyn Ui>, UiError> {
        let streamed: Arc<dyn Ui> = stream_ui.clone();
        match &self.inner.ui {
            Some(local) => Ok(Arc::new(MultiUi::new(vec![Arc::clone(local), streamed])?)),
            None => Ok(streamed),
        }
    }

    /// Source the job's data and run its operation.
    async fn execute(
        &self,
        job: &Job,
        ui: Arc<dyn Ui>,
        ctx: &CancellationToken,
    ) -> Result<JobResult, Status> {
        let kind = job.data_source.kind();
        let sourcer = self
            .inner
            .sourcers
            .get(&kind)
            .ok_or_else(|| Status::invalid_argument(format!("no sourcer for {} data", kind)))?;
        let data = sourcer.fetch(&job.data_source, ui.as_ref(), ctx).await?;
        debug!(pwd = %data.dir.display(), "job data downloaded (or local)");

        let result = if !data.dir.is_absolute() {
            Err(Status::internal(
                "data working directory should be absolute. This is a bug, please report it.",
            ))
        } else {
            info!("starting job execution");
            let exec = ExecContext {
                job: job.clone(),
                ui,
                workdir: data.dir.clone(),
                cancel: ctx.clone(),
            };
            self.inner.dispatcher.execute(exec).await
        };
        data.cleanup().await;
        result
    }

    /// Send exactly one of `Complete`/`Error`, unless the server already
    /// force-cancelled the job, then wait for the server to close the stream.
    async fn report(
        &self,
        outcome: Result<JobResult, Status>,
        writer: &Writer,
        watcher: Watcher,
        ctx: &CancellationToken,
    ) -> Result<(), RunnerError> {
        if ctx.is_cancelled() && watcher.force_cancelled() {
            info!("job force canceled");
            return Ok(());
        }

        match outcome {
            Err(status) => {
                warn!(error = %status, "error during job execution");
                let msg = RunnerRequest::Error { error: Some(status) };
                if let Err(e) = writer.send(msg).await {
                    warn!(error = %e, "error sending error event, job may be dangling");
                    return Ok(());
                }
            }
            Ok(result) => {
                debug!("sending job completion");
                if let Err(e) = writer.send(RunnerRequest::Complete { result }).await {
                    error!(error = %e, "error sending job complete message");
                    return Err(e.into());
                }
            }
        }

        // The server closes the stream once the outcome is stored.
        watcher.closed().await.map_err(RunnerError::from)
    }
}

/// Watches the job stream for server messages while the job runs.
struct Watcher {
    forced: Arc<AtomicBool>,
    done: oneshot::Receiver<Result<(), Status>>,
}

impl Watcher {
    fn spawn(mut recv: BoxRecv<RunnerResponse>, ctx: CancellationToken) -> Self {
        let forced = Arc::new(AtomicBool::new(false));
        let (tx, done) = oneshot::channel();
        let flag = Arc::clone(&forced);
        tokio::spawn(
            async move {
                let end = loop {
                    match recv.recv().await {
                        Ok(Some(RunnerResponse::Cancel { force })) => {
                            info!(force, "job cancellation request received, canceling");
                            if force {
                                flag.store(true, Ordering::SeqCst);
                            }
                            ctx.cancel();
                        }
                        Ok(Some(other)) => info!(event = other.name(), "unknown job event"),
                        Ok(None) => {
                            flag.store(true, Ordering::SeqCst);
                            break Ok(());
                        }
                        Err(e) => break Err(e),
                    }
                };
                let _ = tx.send(end);
            }
            .in_current_span(),
        );
        Self { forced, done }
    }

    /// The server force-cancelled the job or already closed the stream.
    fn force_cancelled(&self) -> bool {
        self.forced.load(Ordering::SeqCst)
    }

    /// Wait for the server to close the stream. EOF is success.
    async fn closed(self) -> Result<(), Status> {
        self.done.await.unwrap_or_else(|_| Err(Status::internal("job stream watcher stopped")))
    }
}

fn spawn_heartbeat(writer: Writer, every: Duration, ctx: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            let start = tokio::time::Instant::now() + every;
            let mut tick = tokio::time::interval_at(start, every);
            loop {
                tokio::select! {
                    _ = ctx.cancelled() => return,
                    _ = tick.tick() => {}
                }
                if let Err(e) = writer.send(RunnerRequest::Heartbeat).await {
                    warn!(error = %e, "error during heartbeat");
                }
            }
        }
        .in_current_span(),
    )
}

#[cfg(test)]
#[path = "accept_tests.rs"]
mod tests;
