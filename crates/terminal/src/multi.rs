// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mirror every UI action to several UIs.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use vg_core::{NamedValue, StepStatus, TableRow};

use crate::{OutputOpts, OutputWriters, StatusLine, Step, StepGroup, Ui, UiError};

/// A [`Ui`] that forwards each action to every member, in order.
///
/// At most one member may be interactive; it receives `input` calls.
pub struct MultiUi {
    uis: Vec<Arc<dyn Ui>>,
}

impl MultiUi {
    pub fn new(uis: Vec<Arc<dyn Ui>>) -> Result<Self, UiError> {
        if uis.iter().filter(|ui| ui.interactive()).count() > 1 {
            return Err(UiError::MultipleInteractive);
        }
        Ok(Self { uis })
    }
}

impl Ui for MultiUi {
    fn output(&self, msg: &str, opts: OutputOpts) {
        for ui in &self.uis {
            ui.output(msg, opts);
        }
    }

    fn named_values(&self, values: &[NamedValue]) {
        for ui in &self.uis {
            ui.named_values(values);
        }
    }

    fn table(&self, headers: &[String], rows: &[TableRow]) {
        for ui in &self.uis {
            ui.table(headers, rows);
        }
    }

    fn status(&self) -> Box<dyn StatusLine> {
        Box::new(MultiStatus(self.uis.iter().map(|ui| ui.status()).collect()))
    }

    fn step_group(&self) -> Box<dyn StepGroup> {
        Box::new(MultiStepGroup(self.uis.iter().map(|ui| ui.step_group()).collect()))
    }

    fn output_writers(&self) -> Result<OutputWriters, UiError> {
        let mut stdout = Vec::with_capacity(self.uis.len());
        let mut stderr = Vec::with_capacity(self.uis.len());
        for ui in &self.uis {
            let w = ui.output_writers()?;
            stdout.push(w.stdout);
            stderr.push(w.stderr);
        }
        Ok(OutputWriters {
            stdout: Box::new(MultiWriter(stdout)),
            stderr: Box::new(MultiWriter(stderr)),
        })
    }

    fn interactive(&self) -> bool {
        self.uis.iter().any(|ui| ui.interactive())
    }

    fn input(&self, prompt: &str) -> Result<String, UiError> {
        match self.uis.iter().find(|ui| ui.interactive()) {
            Some(ui) => ui.input(prompt),
            None => Err(UiError::NonInteractive),
        }
    }

    fn close(&self) {
        for ui in &self.uis {
            ui.close();
        }
    }
}

/// Writes to every member. A member that fails is reported after the
/// rest have been written.
struct MultiWriter(Vec<Box<dyn Write + Send>>);

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut first_err = None;
        for w in &mut self.0 {
            if let Err(e) = w.write_all(buf) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        for w in &mut self.0 {
            w.flush()?;
        }
        Ok(())
    }
}

struct MultiStatus(Vec<Box<dyn StatusLine>>);

impl StatusLine for MultiStatus {
    fn update(&mut self, msg: &str) {
        self.0.iter_mut().for_each(|s| s.update(msg));
    }

    fn step(&mut self, status: StepStatus, msg: &str) {
        self.0.iter_mut().for_each(|s| s.step(status, msg));
    }

    fn close(&mut self) {
        self.0.iter_mut().for_each(|s| s.close());
    }
}

struct MultiStepGroup(Vec<Box<dyn StepGroup>>);

#[async_trait]
impl StepGroup for MultiStepGroup {
    fn add(&self, msg: &str) -> Box<dyn Step> {
        Box::new(MultiStep(self.0.iter().map(|g| g.add(msg)).collect()))
    }

    async fn wait(&self) {
        for g in &self.0 {
            g.wait().await;
        }
    }
}

struct MultiStep(Vec<Box<dyn Step>>);

impl Step for MultiStep {
    fn update(&mut self, msg: &str) {
        self.0.iter_mut().for_each(|s| s.update(msg));
    }

    fn status(&mut self, status: StepStatus) {
        self.0.iter_mut().for_each(|s| s.status(status));
    }

    fn write_output(&mut self, data: &[u8]) {
        self.0.iter_mut().for_each(|s| s.write_output(data));
    }

    fn done(&mut self) {
        self.0.iter_mut().for_each(|s| s.done());
    }

    fn abort(&mut self) {
        self.0.iter_mut().for_each(|s| s.abort());
    }
}

#[cfg(test)]
#[path = "multi_tests.rs"]
mod tests;
