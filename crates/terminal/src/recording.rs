// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A [`Ui`] that records every action, for asserting on rendered output.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::task::TaskTracker;
use vg_core::{LineStyle, NamedValue, StepStatus, TableRow};

use crate::{OutputOpts, OutputWriters, StatusLine, Step, StepGroup, Ui, UiError};

/// One recorded UI action. Steps are numbered in creation order across
/// the whole UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Output { msg: String, style: LineStyle },
    NamedValues(Vec<NamedValue>),
    Table { headers: Vec<String>, rows: Vec<TableRow> },
    StatusUpdate(String),
    StatusStep(StepStatus, String),
    StatusClose,
    StepGroupOpen,
    StepGroupWait,
    StepAdd { step: usize, msg: String },
    StepUpdate { step: usize, msg: String },
    StepStatus { step: usize, status: StepStatus },
    StepOutput { step: usize, data: Vec<u8> },
    StepDone { step: usize },
    StepAbort { step: usize },
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Input(String),
    Close,
}

#[derive(Default)]
struct Inner {
    actions: Mutex<Vec<UiAction>>,
    next_step: AtomicUsize,
}

impl Inner {
    fn push(&self, action: UiAction) {
        self.actions.lock().push(action);
    }
}

#[derive(Clone, Default)]
pub struct RecordingUi {
    inner: Arc<Inner>,
    interactive: bool,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interactive() -> Self {
        Self { inner: Arc::default(), interactive: true }
    }

    pub fn actions(&self) -> Vec<UiAction> {
        self.inner.actions.lock().clone()
    }

    /// Messages of every `Output` action, in order.
    pub fn lines(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                UiAction::Output { msg, .. } => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Ui for RecordingUi {
    fn output(&self, msg: &str, opts: OutputOpts) {
        self.inner.push(UiAction::Output { msg: msg.to_string(), style: opts.style });
    }

    fn named_values(&self, values: &[NamedValue]) {
        self.inner.push(UiAction::NamedValues(values.to_vec()));
    }

    fn table(&self, headers: &[String], rows: &[TableRow]) {
        self.inner.push(UiAction::Table { headers: headers.to_vec(), rows: rows.to_vec() });
    }

    fn status(&self) -> Box<dyn StatusLine> {
        Box::new(RecordingStatus(Arc::clone(&self.inner)))
    }

    fn step_group(&self) -> Box<dyn StepGroup> {
        self.inner.push(UiAction::StepGroupOpen);
        Box::new(RecordingStepGroup { inner: Arc::clone(&self.inner), tracker: TaskTracker::new() })
    }

    fn output_writers(&self) -> Result<OutputWriters, UiError> {
        Ok(OutputWriters {
            stdout: Box::new(RecordingWriter { inner: Arc::clone(&self.inner), stderr: false }),
            stderr: Box::new(RecordingWriter { inner: Arc::clone(&self.inner), stderr: true }),
        })
    }

    fn interactive(&self) -> bool {
        self.interactive
    }

    fn input(&self, prompt: &str) -> Result<String, UiError> {
        if !self.interactive {
            return Err(UiError::NonInteractive);
        }
        self.inner.push(UiAction::Input(prompt.to_string()));
        Ok(String::new())
    }

    fn close(&self) {
        self.inner.push(UiAction::Close);
    }
}

struct RecordingWriter {
    inner: Arc<Inner>,
    stderr: bool,
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let data = buf.to_vec();
        self.inner.push(if self.stderr { UiAction::Stderr(data) } else { UiAction::Stdout(data) });
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct RecordingStatus(Arc<Inner>);

impl StatusLine for RecordingStatus {
    fn update(&mut self, msg: &str) {
        self.0.push(UiAction::StatusUpdate(msg.to_string()));
    }

    fn step(&mut self, status: StepStatus, msg: &str) {
        self.0.push(UiAction::StatusStep(status, msg.to_string()));
    }

    fn close(&mut self) {
        self.0.push(UiAction::StatusClose);
    }
}

struct RecordingStepGroup {
    inner: Arc<Inner>,
    tracker: TaskTracker,
}

#[async_trait]
impl StepGroup for RecordingStepGroup {
    fn add(&self, msg: &str) -> Box<dyn Step> {
        let step = self.inner.next_step.fetch_add(1, Ordering::SeqCst);
        self.inner.push(UiAction::StepAdd { step, msg: msg.to_string() });
        Box::new(RecordingStep {
            inner: Arc::clone(&self.inner),
            step,
            token: Some(self.tracker.token()),
        })
    }

    async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.inner.push(UiAction::StepGroupWait);
    }
}

struct RecordingStep {
    inner: Arc<Inner>,
    step: usize,
    token: Option<tokio_util::task::task_tracker::TaskTrackerToken>,
}

impl Step for RecordingStep {
    fn update(&mut self, msg: &str) {
        self.inner.push(UiAction::StepUpdate { step: self.step, msg: msg.to_string() });
    }

    fn status(&mut self, status: StepStatus) {
        self.inner.push(UiAction::StepStatus { step: self.step, status });
    }

    fn write_output(&mut self, data: &[u8]) {
        self.inner.push(UiAction::StepOutput { step: self.step, data: data.to_vec() });
    }

    fn done(&mut self) {
        if self.token.take().is_some() {
            self.inner.push(UiAction::StepDone { step: self.step });
        }
    }

    fn abort(&mut self) {
        if self.token.take().is_some() {
            self.inner.push(UiAction::StepAbort { step: self.step });
        }
    }
}
