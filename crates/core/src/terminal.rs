// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal events: one observable UI action each, carried on the job stream.

use serde::{Deserialize, Serialize};

/// Style hint for an output line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Plain,
    Header,
    Error,
    Warning,
    Info,
    Success,
}

crate::simple_display! {
    LineStyle {
        Plain => "plain",
        Header => "header",
        Error => "error",
        Warning => "warning",
        Info => "info",
        Success => "success",
    }
}

/// Status glyph attached to a status line or a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Running,
    Complete,
    Error,
    Warning,
    Aborted,
}

crate::simple_display! {
    StepStatus {
        Running => "running",
        Complete => "complete",
        Error => "error",
        Warning => "warning",
        Aborted => "aborted",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub value: String,
    /// Color name; empty for the terminal default.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
}

impl TableEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), color: String::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub entries: Vec<TableEntry>,
}

impl<S: Into<String>> FromIterator<S> for TableRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(TableEntry::new).collect() }
    }
}

/// One UI action. Events for a job are rendered in the order sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerminalEvent {
    Line {
        msg: String,
        #[serde(default)]
        style: LineStyle,
        #[serde(default)]
        disable_newline: bool,
    },
    NamedValues {
        values: Vec<NamedValue>,
    },
    /// Status line. `step` finalizes the current message with `status`;
    /// an empty `msg` without `step` closes the status line.
    Status {
        #[serde(default)]
        status: StepStatus,
        #[serde(default)]
        msg: String,
        #[serde(default)]
        step: bool,
    },
    Raw {
        data: Vec<u8>,
        #[serde(default)]
        stderr: bool,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<TableRow>,
    },
    /// Opens a step group, or closes it once every step has finished.
    StepGroup {
        #[serde(default)]
        close: bool,
    },
    /// Partial update for one step; unset fields are left unchanged.
    Step {
        id: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        msg: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<StepStatus>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        output: Vec<u8>,
        #[serde(default)]
        close: bool,
    },
}

impl TerminalEvent {
    pub fn line(msg: impl Into<String>) -> Self {
        TerminalEvent::Line { msg: msg.into(), style: LineStyle::Plain, disable_newline: false }
    }

    pub fn styled(msg: impl Into<String>, style: LineStyle) -> Self {
        TerminalEvent::Line { msg: msg.into(), style, disable_newline: false }
    }

    /// Bare step event carrying no changes; callers set the fields they need.
    pub fn step(id: u32) -> Self {
        TerminalEvent::Step { id, msg: None, status: None, output: Vec::new(), close: false }
    }

    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TerminalEvent::Line { .. } => "line",
            TerminalEvent::NamedValues { .. } => "named_values",
            TerminalEvent::Status { .. } => "status",
            TerminalEvent::Raw { .. } => "raw",
            TerminalEvent::Table { .. } => "table",
            TerminalEvent::StepGroup { .. } => "step_group",
            TerminalEvent::Step { .. } => "step",
        }
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
