// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented UI for the local terminal.

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::task::task_tracker::TaskTrackerToken;
use tokio_util::task::TaskTracker;
use vg_core::{LineStyle, NamedValue, StepStatus, TableRow};

use crate::color;
use crate::{OutputOpts, OutputWriters, StatusLine, Step, StepGroup, Ui, UiError};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Renders UI actions as plain lines on a pair of writers.
///
/// Status lines and steps are printed as they change rather than redrawn
/// in place, so output stays readable when piped.
pub struct ConsoleUi {
    out: SharedWriter,
    err: SharedWriter,
    color: bool,
    interactive: bool,
}

impl ConsoleUi {
    /// Console on the process stdout/stderr.
    pub fn stdio() -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(std::io::stdout()))),
            err: Arc::new(Mutex::new(Box::new(std::io::stderr()))),
            color: color::should_colorize(),
            interactive: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
        }
    }

    /// Uncolored, non-interactive console on arbitrary writers.
    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            err: Arc::new(Mutex::new(err)),
            color: false,
            interactive: false,
        }
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn paint(&self, code: Option<u8>, text: &str) -> String {
        paint(self.color, code, text)
    }
}

fn paint(enabled: bool, code: Option<u8>, text: &str) -> String {
    match code {
        Some(code) if enabled => color::paint(code, text),
        _ => text.to_string(),
    }
}

fn status_text(enabled: bool, status: StepStatus, msg: &str) -> String {
    let glyph = paint(enabled, Some(color::status_code(status)), color::glyph(status));
    format!("{} {}", glyph, msg)
}

impl Ui for ConsoleUi {
    fn output(&self, msg: &str, opts: OutputOpts) {
        let text = match opts.style {
            LineStyle::Header => format!("==> {}", msg),
            LineStyle::Info => format!("    {}", msg),
            _ => msg.to_string(),
        };
        let text = self.paint(color::line_code(opts.style), &text);
        let mut out = self.out.lock();
        let _ = if opts.disable_newline {
            write!(out, "{}", text)
        } else {
            writeln!(out, "{}", text)
        };
        let _ = out.flush();
    }

    fn named_values(&self, values: &[NamedValue]) {
        let width = values.iter().map(|v| v.name.chars().count()).max().unwrap_or(0);
        for v in values {
            self.line(&format!("  {:>width$}: {}", v.name, v.value, width = width));
        }
    }

    fn table(&self, headers: &[String], rows: &[TableRow]) {
        let columns = rows.iter().map(|r| r.entries.len()).chain([headers.len()]).max();
        let columns = columns.unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for (i, h) in headers.iter().enumerate() {
            widths[i] = widths[i].max(h.chars().count());
        }
        for row in rows {
            for (i, e) in row.entries.iter().enumerate() {
                widths[i] = widths[i].max(e.value.chars().count());
            }
        }

        let render = |cells: Vec<&str>| {
            cells
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        if !headers.is_empty() {
            let header = render(headers.iter().map(String::as_str).collect());
            self.line(&self.paint(Some(color::codes::HEADER), &header));
        }
        for row in rows {
            self.line(&render(row.entries.iter().map(|e| e.value.as_str()).collect()));
        }
    }

    fn status(&self) -> Box<dyn StatusLine> {
        Box::new(ConsoleStatus { out: Arc::clone(&self.out), color: self.color, last: None })
    }

    fn step_group(&self) -> Box<dyn StepGroup> {
        Box::new(ConsoleStepGroup {
            out: Arc::clone(&self.out),
            color: self.color,
            tracker: TaskTracker::new(),
        })
    }

    fn output_writers(&self) -> Result<OutputWriters, UiError> {
        Ok(OutputWriters {
            stdout: Box::new(ConsoleWriter(Arc::clone(&self.out))),
            stderr: Box::new(ConsoleWriter(Arc::clone(&self.err))),
        })
    }

    fn interactive(&self) -> bool {
        self.interactive
    }

    fn input(&self, prompt: &str) -> Result<String, UiError> {
        if !self.interactive {
            return Err(UiError::NonInteractive);
        }
        {
            let mut out = self.out.lock();
            write!(out, "{} ", prompt)?;
            out.flush()?;
        }
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn close(&self) {
        let _ = self.out.lock().flush();
        let _ = self.err.lock().flush();
    }
}

struct ConsoleWriter(SharedWriter);

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

struct ConsoleStatus {
    out: SharedWriter,
    color: bool,
    last: Option<String>,
}

impl StatusLine for ConsoleStatus {
    fn update(&mut self, msg: &str) {
        if self.last.as_deref() == Some(msg) {
            return;
        }
        let _ = writeln!(self.out.lock(), "{}", status_text(self.color, StepStatus::Running, msg));
        self.last = Some(msg.to_string());
    }

    fn step(&mut self, status: StepStatus, msg: &str) {
        let _ = writeln!(self.out.lock(), "{}", status_text(self.color, status, msg));
        self.last = None;
    }

    fn close(&mut self) {
        self.last = None;
    }
}

struct ConsoleStepGroup {
    out: SharedWriter,
    color: bool,
    tracker: TaskTracker,
}

#[async_trait]
impl StepGroup for ConsoleStepGroup {
    fn add(&self, msg: &str) -> Box<dyn Step> {
        let step = ConsoleStep {
            out: Arc::clone(&self.out),
            color: self.color,
            msg: msg.to_string(),
            status: StepStatus::Running,
            token: Some(self.tracker.token()),
        };
        step.print(StepStatus::Running);
        Box::new(step)
    }

    async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

struct ConsoleStep {
    out: SharedWriter,
    color: bool,
    msg: String,
    status: StepStatus,
    token: Option<TaskTrackerToken>,
}

impl ConsoleStep {
    fn print(&self, status: StepStatus) {
        let _ = writeln!(self.out.lock(), "  {}", status_text(self.color, status, &self.msg));
    }

    fn finish(&mut self, status: StepStatus) {
        if self.token.take().is_some() {
            self.print(status);
        }
    }
}

impl Step for ConsoleStep {
    fn update(&mut self, msg: &str) {
        self.msg = msg.to_string();
        if self.token.is_some() {
            self.print(self.status);
        }
    }

    fn status(&mut self, status: StepStatus) {
        self.status = status;
    }

    fn write_output(&mut self, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        let mut out = self.out.lock();
        for line in text.lines() {
            let _ = writeln!(out, "    │ {}", line);
        }
    }

    fn done(&mut self) {
        let status = match self.status {
            StepStatus::Running => StepStatus::Complete,
            other => other,
        };
        self.finish(status);
    }

    fn abort(&mut self) {
        self.finish(StepStatus::Aborted);
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
