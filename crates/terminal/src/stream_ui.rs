// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer side of the bridge: a [`Ui`] that emits terminal events.

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::task_tracker::TaskTrackerToken;
use tokio_util::task::TaskTracker;
use vg_core::{NamedValue, StepStatus, TableRow, TerminalEvent};

use crate::{OutputOpts, OutputWriters, StatusLine, Step, StepGroup, Ui, UiError};

/// Raw output is forwarded in chunks of at most this many bytes.
pub const RAW_CHUNK_SIZE: usize = 1024;

/// Destination for emitted events. Must not block: UI calls are synchronous.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: TerminalEvent);
}

impl EventSink for mpsc::UnboundedSender<TerminalEvent> {
    fn emit(&self, event: TerminalEvent) {
        let _ = self.send(event);
    }
}

struct Shared {
    /// `None` once the UI is closed; later events are dropped.
    sink: Mutex<Option<Arc<dyn EventSink>>>,
    cancel: CancellationToken,
}

impl Shared {
    fn emit(&self, event: TerminalEvent) {
        if let Some(sink) = self.sink.lock().as_ref() {
            sink.emit(event);
        }
    }
}

/// A non-interactive [`Ui`] that turns every action into a [`TerminalEvent`].
///
/// Raw writers stop accepting bytes once `cancel` fires or the UI is
/// closed. Closing the UI also cancels `cancel`.
pub struct StreamUi {
    shared: Arc<Shared>,
}

impl StreamUi {
    pub fn new(sink: impl EventSink, cancel: CancellationToken) -> Self {
        let sink: Arc<dyn EventSink> = Arc::new(sink);
        Self { shared: Arc::new(Shared { sink: Mutex::new(Some(sink)), cancel }) }
    }
}

impl Ui for StreamUi {
    fn output(&self, msg: &str, opts: OutputOpts) {
        self.shared.emit(TerminalEvent::Line {
            msg: msg.to_string(),
            style: opts.style,
            disable_newline: opts.disable_newline,
        });
    }

    fn named_values(&self, values: &[NamedValue]) {
        self.shared.emit(TerminalEvent::NamedValues { values: values.to_vec() });
    }

    fn table(&self, headers: &[String], rows: &[TableRow]) {
        self.shared.emit(TerminalEvent::Table { headers: headers.to_vec(), rows: rows.to_vec() });
    }

    fn status(&self) -> Box<dyn StatusLine> {
        Box::new(StreamStatus { shared: Arc::clone(&self.shared) })
    }

    fn step_group(&self) -> Box<dyn StepGroup> {
        self.shared.emit(TerminalEvent::StepGroup { close: false });
        Box::new(StreamStepGroup {
            shared: Arc::clone(&self.shared),
            tracker: TaskTracker::new(),
            next_id: AtomicU32::new(0),
            cancel: self.shared.cancel.child_token(),
        })
    }

    fn output_writers(&self) -> Result<OutputWriters, UiError> {
        let cancel = self.shared.cancel.clone();
        Ok(OutputWriters {
            stdout: Box::new(RawWriter::raw(Arc::clone(&self.shared), cancel.clone(), false)),
            stderr: Box::new(RawWriter::raw(Arc::clone(&self.shared), cancel, true)),
        })
    }

    fn interactive(&self) -> bool {
        false
    }

    fn input(&self, _prompt: &str) -> Result<String, UiError> {
        Err(UiError::NonInteractive)
    }

    fn close(&self) {
        self.shared.sink.lock().take();
        self.shared.cancel.cancel();
    }
}

enum RawTarget {
    Stream { stderr: bool },
    Step { id: u32 },
}

/// Writer that forwards bytes as `Raw` (or step output) events.
struct RawWriter {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    target: RawTarget,
}

impl RawWriter {
    fn raw(shared: Arc<Shared>, cancel: CancellationToken, stderr: bool) -> Self {
        Self { shared, cancel, target: RawTarget::Stream { stderr } }
    }

    fn event(&self, chunk: &[u8]) -> TerminalEvent {
        match self.target {
            RawTarget::Stream { stderr } => TerminalEvent::Raw { data: chunk.to_vec(), stderr },
            RawTarget::Step { id } => TerminalEvent::Step {
                id,
                msg: None,
                status: None,
                output: chunk.to_vec(),
                close: false,
            },
        }
    }
}

impl Write for RawWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.cancel.is_cancelled() {
            return Err(std::io::ErrorKind::BrokenPipe.into());
        }
        for chunk in buf.chunks(RAW_CHUNK_SIZE) {
            self.shared.emit(self.event(chunk));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct StreamStatus {
    shared: Arc<Shared>,
}

impl StatusLine for StreamStatus {
    fn update(&mut self, msg: &str) {
        self.shared.emit(TerminalEvent::Status {
            status: StepStatus::Running,
            msg: msg.to_string(),
            step: false,
        });
    }

    fn step(&mut self, status: StepStatus, msg: &str) {
        self.shared.emit(TerminalEvent::Status { status, msg: msg.to_string(), step: true });
    }

    fn close(&mut self) {
        self.shared.emit(TerminalEvent::Status {
            status: StepStatus::Running,
            msg: String::new(),
            step: false,
        });
    }
}

struct StreamStepGroup {
    shared: Arc<Shared>,
    tracker: TaskTracker,
    next_id: AtomicU32,
    /// Cancelled when the group closes; stops its steps' output writers.
    cancel: CancellationToken,
}

#[async_trait]
impl StepGroup for StreamStepGroup {
    fn add(&self, msg: &str) -> Box<dyn Step> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = self.tracker.token();
        self.shared.emit(TerminalEvent::Step {
            id,
            msg: Some(msg.to_string()),
            status: None,
            output: Vec::new(),
            close: false,
        });
        Box::new(StreamStep {
            output: RawWriter {
                shared: Arc::clone(&self.shared),
                cancel: self.cancel.clone(),
                target: RawTarget::Step { id },
            },
            id,
            token: Some(token),
        })
    }

    async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.cancel.cancel();
        self.shared.emit(TerminalEvent::StepGroup { close: true });
    }
}

struct StreamStep {
    output: RawWriter,
    id: u32,
    /// Held until the step finishes; taking it is the idempotence guard.
    token: Option<TaskTrackerToken>,
}

impl StreamStep {
    fn finish(&mut self, status: Option<StepStatus>) {
        if let Some(token) = self.token.take() {
            self.output.shared.emit(TerminalEvent::Step {
                id: self.id,
                msg: None,
                status,
                output: Vec::new(),
                close: true,
            });
            drop(token);
        }
    }
}

impl Step for StreamStep {
    fn update(&mut self, msg: &str) {
        self.output.shared.emit(TerminalEvent::Step {
            id: self.id,
            msg: Some(msg.to_string()),
            status: None,
            output: Vec::new(),
            close: false,
        });
    }

    fn status(&mut self, status: StepStatus) {
        self.output.shared.emit(TerminalEvent::Step {
            id: self.id,
            msg: None,
            status: Some(status),
            output: Vec::new(),
            close: false,
        });
    }

    fn write_output(&mut self, data: &[u8]) {
        let _ = self.output.write_all(data);
    }

    fn done(&mut self) {
        self.finish(None);
    }

    fn abort(&mut self) {
        self.finish(Some(StepStatus::Aborted));
    }
}

#[cfg(test)]
#[path = "stream_ui_tests.rs"]
mod tests;
