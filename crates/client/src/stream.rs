// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Following a queued job's event stream to its outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use vg_core::{JobId, JobResult, JobState, Status};
use vg_terminal::{OutputOpts, Replayer, Ui};
use vg_wire::{BoxRecv, JobStreamEvent};

use crate::client::Client;
use crate::error::ClientError;
use crate::final_context::FinalContext;

/// Delay before telling the user a job is still waiting.
pub(crate) const STATE_NOTICE_DELAY: Duration = Duration::from_millis(1500);

const BACKGROUND_HINT: &str =
    "If you interrupt this command, the job will still run in the background.";

impl Client {
    /// Follow `job_id` until it completes. In local mode, a job still
    /// outstanding when `cancel` fires is cancelled on the job store.
    pub(crate) async fn stream(
        &self,
        cancel: &CancellationToken,
        job_id: &JobId,
        ui: Arc<dyn Ui>,
    ) -> Result<JobResult, ClientError> {
        debug!("opening job stream");
        let mut events = self.service.get_job_stream(job_id).await?;

        let outcome = match self.open(cancel, &mut events).await {
            Some(Ok(())) => self.follow(cancel, &mut events, ui).await,
            Some(Err(e)) => Some(Err(e)),
            None => None,
        };

        match outcome {
            Some(result) => result,
            None => {
                // The job is outstanding from the moment it was queued.
                if self.is_local() {
                    self.cancel_job(job_id).await;
                }
                Err(ClientError::Stream(Status::cancelled("job stream cancelled")))
            }
        }
    }

    /// Wait for `Open`; `None` when `cancel` fired first.
    async fn open(
        &self,
        cancel: &CancellationToken,
        events: &mut BoxRecv<JobStreamEvent>,
    ) -> Option<Result<(), ClientError>> {
        let first = tokio::select! {
            biased;
            r = events.recv() => r,
            _ = cancel.cancelled() => return None,
        };
        match first {
            Ok(Some(JobStreamEvent::Open)) => Some(Ok(())),
            Ok(other) => {
                let name = other.as_ref().map_or("end of stream", JobStreamEvent::name);
                Some(Err(ClientError::Stream(Status::aborted(format!(
                    "job stream failed to open, got unexpected message {}",
                    name
                )))))
            }
            Err(e) => Some(Err(ClientError::Stream(e))),
        }
    }

    /// Handle events until the job's outcome; `None` when `cancel` fired.
    async fn follow(
        &self,
        cancel: &CancellationToken,
        events: &mut BoxRecv<JobStreamEvent>,
        ui: Arc<dyn Ui>,
    ) -> Option<Result<JobResult, ClientError>> {
        let mut follow = Follow::new(ui, self.is_local());
        let outcome = loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => None,
                r = events.recv() => Some(r),
            };
            let event = match next {
                None => break None,
                Some(Err(e)) => break Some(Err(ClientError::Stream(e))),
                Some(Ok(None)) => {
                    break Some(Err(ClientError::Stream(Status::unavailable(
                        "job stream closed before the job completed",
                    ))))
                }
                Some(Ok(Some(event))) => event,
            };
            if let Some(done) = follow.handle(event).await {
                break Some(done);
            }
        };
        follow.finish();
        outcome
    }

    /// Best-effort `CancelJob` on a context independent of the caller's.
    async fn cancel_job(&self, job_id: &JobId) {
        let ctx = FinalContext::new(self.final_timeout);
        warn!("canceling job");
        match ctx.run(self.service.cancel_job(job_id)).await {
            Some(Ok(())) => info!("job cancelled successfully"),
            Some(Err(e)) => warn!(error = %e, "error canceling job"),
            None => warn!("gave up canceling job"),
        }
    }
}

/// Per-stream state: terminal replay and the pending wait notice.
struct Follow {
    ui: Arc<dyn Ui>,
    local: bool,
    replayer: Replayer,
    notice: Option<JoinHandle<()>>,
}

impl Follow {
    fn new(ui: Arc<dyn Ui>, local: bool) -> Self {
        let replayer = Replayer::new(Arc::clone(&ui));
        Self { ui, local, replayer, notice: None }
    }

    /// Handle one event; `Some` once the job's outcome is known.
    async fn handle(&mut self, event: JobStreamEvent) -> Option<Result<JobResult, ClientError>> {
        match event {
            JobStreamEvent::Complete { result, error: Some(st) } => {
                warn!(code = %st.code, message = %st.message, ?result, "job failed");
                Some(Err(ClientError::Job(st)))
            }
            JobStreamEvent::Complete { result, error: None } => {
                info!("job completed successfully");
                Some(result.ok_or_else(|| {
                    ClientError::Stream(Status::internal("job completed without a result"))
                }))
            }
            JobStreamEvent::Error { error } => {
                warn!(code = %error.code, message = %error.message, "job stream failure");
                Some(Err(ClientError::Stream(error)))
            }
            JobStreamEvent::Terminal { events } => {
                // Local jobs drive the UI directly.
                if self.local {
                    return None;
                }
                trace!(count = events.len(), "job terminal output");
                self.replayer.apply_all(events).await.err().map(|e| Err(e.into()))
            }
            JobStreamEvent::State { current, .. } => {
                self.cancel_notice();
                match current {
                    JobState::Queued => {
                        self.schedule_notice("Operation is queued. Waiting for runner assignment...")
                    }
                    JobState::Waiting => self
                        .schedule_notice("Operation is assigned to a runner. Waiting for start..."),
                    _ => {}
                }
                None
            }
            JobStreamEvent::Open => {
                warn!(event = "Open", "unexpected stream event, ignoring");
                None
            }
        }
    }

    fn schedule_notice(&mut self, headline: &'static str) {
        let ui = Arc::clone(&self.ui);
        self.notice = Some(tokio::spawn(async move {
            tokio::time::sleep(STATE_NOTICE_DELAY).await;
            ui.output(headline, OutputOpts::header());
            ui.output(BACKGROUND_HINT, OutputOpts::info());
        }));
    }

    fn cancel_notice(&mut self) {
        if let Some(notice) = self.notice.take() {
            notice.abort();
        }
    }

    fn finish(&mut self) {
        self.cancel_notice();
        self.replayer.finish();
    }
}
