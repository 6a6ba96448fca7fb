// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI surface handed to operations.

use std::io::Write;

use async_trait::async_trait;
use thiserror::Error;
use vg_core::{LineStyle, NamedValue, Status, StepStatus, TableRow};

#[derive(Debug, Error)]
pub enum UiError {
    #[error("input requested from a non-interactive UI")]
    NonInteractive,

    #[error("more than one interactive UI; input would be ambiguous")]
    MultipleInteractive,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UiError> for Status {
    fn from(e: UiError) -> Self {
        match e {
            UiError::NonInteractive => Status::failed_precondition(e.to_string()),
            UiError::MultipleInteractive | UiError::Io(_) => Status::internal(e.to_string()),
        }
    }
}

/// Options for a single output line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOpts {
    pub style: LineStyle,
    pub disable_newline: bool,
}

impl OutputOpts {
    pub fn style(style: LineStyle) -> Self {
        Self { style, disable_newline: false }
    }

    pub fn header() -> Self {
        Self::style(LineStyle::Header)
    }

    pub fn info() -> Self {
        Self::style(LineStyle::Info)
    }

    pub fn error() -> Self {
        Self::style(LineStyle::Error)
    }

    pub fn no_newline(mut self) -> Self {
        self.disable_newline = true;
        self
    }
}

/// Raw stdout/stderr writers for subprocess output.
pub struct OutputWriters {
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
}

/// A terminal-like output surface.
pub trait Ui: Send + Sync {
    fn output(&self, msg: &str, opts: OutputOpts);

    fn named_values(&self, values: &[NamedValue]);

    fn table(&self, headers: &[String], rows: &[TableRow]);

    /// A live status line.
    fn status(&self) -> Box<dyn StatusLine>;

    fn step_group(&self) -> Box<dyn StepGroup>;

    fn output_writers(&self) -> Result<OutputWriters, UiError>;

    fn interactive(&self) -> bool;

    /// Read a line of input. Non-interactive UIs return [`UiError::NonInteractive`].
    fn input(&self, prompt: &str) -> Result<String, UiError>;

    /// Stop accepting output. Idempotent.
    fn close(&self);
}

/// A single live-updating status line.
pub trait StatusLine: Send {
    fn update(&mut self, msg: &str);

    /// Finish the current message with a status glyph.
    fn step(&mut self, status: StepStatus, msg: &str);

    fn close(&mut self);
}

/// A group of concurrently progressing steps.
#[async_trait]
pub trait StepGroup: Send + Sync {
    fn add(&self, msg: &str) -> Box<dyn Step>;

    /// Block until every step added so far is done or aborted.
    async fn wait(&self);
}

/// One line item in a [`StepGroup`].
///
/// `done` and `abort` are idempotent: only the first call of either has
/// any effect.
pub trait Step: Send {
    fn update(&mut self, msg: &str);

    fn status(&mut self, status: StepStatus);

    fn write_output(&mut self, data: &[u8]);

    fn done(&mut self);

    fn abort(&mut self);
}
