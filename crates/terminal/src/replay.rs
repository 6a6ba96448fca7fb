// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consumer side of the bridge: apply terminal events to a local [`Ui`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use tracing::{trace, warn};
use vg_core::{StepStatus, TerminalEvent};

use crate::{OutputOpts, OutputWriters, StatusLine, Step, StepGroup, Ui, UiError};

/// Replays a job's terminal events onto a [`Ui`], in the order given.
///
/// Holds the state that spans events: the open status line, raw writers
/// (created on first use), and the current step group with its steps.
pub struct Replayer {
    ui: Arc<dyn Ui>,
    status: Option<Box<dyn StatusLine>>,
    writers: Option<OutputWriters>,
    group: Option<Box<dyn StepGroup>>,
    steps: HashMap<u32, Box<dyn Step>>,
}

impl Replayer {
    pub fn new(ui: Arc<dyn Ui>) -> Self {
        Self { ui, status: None, writers: None, group: None, steps: HashMap::new() }
    }

    pub async fn apply_all(&mut self, events: Vec<TerminalEvent>) -> Result<(), UiError> {
        for event in events {
            self.apply(event).await?;
        }
        Ok(())
    }

    pub async fn apply(&mut self, event: TerminalEvent) -> Result<(), UiError> {
        trace!(kind = event.kind(), "replaying terminal event");
        match event {
            TerminalEvent::Line { msg, style, disable_newline } => {
                self.ui.output(&msg, OutputOpts { style, disable_newline });
            }
            TerminalEvent::NamedValues { values } => self.ui.named_values(&values),
            TerminalEvent::Table { headers, rows } => self.ui.table(&headers, &rows),
            TerminalEvent::Status { status, msg, step } => {
                let line = self.status.get_or_insert_with(|| self.ui.status());
                if msg.is_empty() && !step {
                    line.close();
                } else if step {
                    line.step(status, &msg);
                } else {
                    line.update(&msg);
                }
            }
            TerminalEvent::Raw { data, stderr } => {
                if self.writers.is_none() {
                    self.writers = Some(self.ui.output_writers()?);
                }
                let Some(writers) = self.writers.as_mut() else {
                    return Ok(());
                };
                let target = if stderr { &mut writers.stderr } else { &mut writers.stdout };
                if let Err(e) = target.write_all(&data) {
                    warn!(error = %e, "failed to write raw output");
                }
            }
            TerminalEvent::StepGroup { close } => {
                if let Some(group) = self.group.take() {
                    group.wait().await;
                }
                self.steps.clear();
                if !close {
                    self.group = Some(self.ui.step_group());
                }
            }
            TerminalEvent::Step { id, msg, status, output, close } => {
                let Some(group) = self.group.as_ref() else {
                    return Ok(());
                };
                let step = match self.steps.entry(id) {
                    Entry::Occupied(e) => {
                        let step = e.into_mut();
                        if let Some(msg) = msg.as_deref().filter(|m| !m.is_empty()) {
                            step.update(msg);
                        }
                        step
                    }
                    Entry::Vacant(e) => {
                        e.insert(group.add(msg.as_deref().unwrap_or_default()))
                    }
                };
                match status {
                    Some(StepStatus::Aborted) => step.abort(),
                    Some(status) => step.status(status),
                    None => {}
                }
                if !output.is_empty() {
                    step.write_output(&output);
                }
                if close {
                    step.done();
                }
            }
        }
        Ok(())
    }

    /// Close the status line if one was opened.
    pub fn finish(&mut self) {
        if let Some(mut status) = self.status.take() {
            status.close();
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
