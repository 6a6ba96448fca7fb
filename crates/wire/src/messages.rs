// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messages carried on the streaming RPCs.

use serde::{Deserialize, Serialize};
use vg_core::{Job, JobResult, JobState, RunnerConfig, RunnerId, RunnerInfo, Status, TerminalEvent};

/// A stream item, or the status the stream was terminated with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Frame<T> {
    Item(T),
    Error(Status),
}

/// Events on a client's job stream (`GetJobStream`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum JobStreamEvent {
    /// Always the first event; confirms the stream is attached.
    Open,

    State { previous: JobState, current: JobState, canceling: bool },

    Terminal { events: Vec<TerminalEvent> },

    /// Terminal outcome: `error` is set when the job failed.
    Complete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<JobResult>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<Status>,
    },

    /// The stream itself failed.
    Error { error: Status },
}

impl JobStreamEvent {
    pub fn name(&self) -> &'static str {
        match self {
            JobStreamEvent::Open => "Open",
            JobStreamEvent::State { .. } => "State",
            JobStreamEvent::Terminal { .. } => "Terminal",
            JobStreamEvent::Complete { .. } => "Complete",
            JobStreamEvent::Error { .. } => "Error",
        }
    }
}

/// Runner-to-server messages on `RunnerJobStream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunnerRequest {
    /// Ask for one assignment. Must be the first message.
    Request { runner_id: RunnerId },

    Ack,

    /// Execution failure, or a nack when sent in place of [`RunnerRequest::Ack`].
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<Status>,
    },

    Heartbeat,

    Complete { result: JobResult },

    Terminal { events: Vec<TerminalEvent> },
}

impl RunnerRequest {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerRequest::Request { .. } => "Request",
            RunnerRequest::Ack => "Ack",
            RunnerRequest::Error { .. } => "Error",
            RunnerRequest::Heartbeat => "Heartbeat",
            RunnerRequest::Complete { .. } => "Complete",
            RunnerRequest::Terminal { .. } => "Terminal",
        }
    }
}

/// Server-to-runner messages on `RunnerJobStream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunnerResponse {
    Assignment { job: Box<Job> },

    /// Stop the job. `force` follows a repeated cancel; the server closes
    /// the stream right after.
    Cancel { force: bool },
}

impl RunnerResponse {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerResponse::Assignment { .. } => "Assignment",
            RunnerResponse::Cancel { .. } => "Cancel",
        }
    }
}

/// Runner-to-server messages on `RunnerConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunnerConfigRequest {
    Open { runner: RunnerInfo },
}

/// Server-to-runner messages on `RunnerConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunnerConfigResponse {
    Config { config: RunnerConfig },
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
