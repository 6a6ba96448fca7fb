// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client error types

use thiserror::Error;
use vg_core::Status;

/// Errors from queueing or streaming a job.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The job ran and reported a failure.
    #[error("{0}")]
    Job(Status),

    /// The stream or transport failed; the job's outcome is unknown.
    #[error("{0}")]
    Stream(#[from] Status),
}

impl ClientError {
    pub fn status(&self) -> &Status {
        match self {
            ClientError::Job(st) | ClientError::Stream(st) => st,
        }
    }

    /// Failure reported by the job itself, as opposed to the transport.
    pub fn is_job_error(&self) -> bool {
        matches!(self, ClientError::Job(_))
    }
}

impl From<vg_terminal::UiError> for ClientError {
    fn from(e: vg_terminal::UiError) -> Self {
        ClientError::Stream(e.into())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
