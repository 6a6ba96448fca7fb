// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use vg_core::{ConfigVar, Job, JobId, Status};

/// First frame on a connection; names the RPC the connection carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Enqueue a job. `expires_in_ms` bounds how long it may stay queued.
    QueueJob {
        job: Box<Job>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires_in_ms: Option<u64>,
    },

    /// Subscribe to a job's events; followed by [`JobStreamEvent`](crate::JobStreamEvent) frames.
    GetJobStream { job_id: JobId },

    CancelJob { job_id: JobId },

    /// Open the runner's bidirectional job stream.
    RunnerJobStream,

    /// Open the runner's config stream.
    RunnerConfig,

    /// Upsert config variables. An empty value unsets the variable.
    SetConfig { vars: Vec<ConfigVar> },
}

impl Request {
    /// RPC name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Request::QueueJob { .. } => "QueueJob",
            Request::GetJobStream { .. } => "GetJobStream",
            Request::CancelJob { .. } => "CancelJob",
            Request::RunnerJobStream => "RunnerJobStream",
            Request::RunnerConfig => "RunnerConfig",
            Request::SetConfig { .. } => "SetConfig",
        }
    }
}

/// Reply to a unary request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Ok,

    JobQueued { job_id: JobId },

    Error { status: Status },
}
