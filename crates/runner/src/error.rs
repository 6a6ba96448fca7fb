// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;
use vg_core::Status;
use vg_terminal::UiError;

/// Errors internal to the runner. Failures of the job itself are reported
/// on the job stream, not returned.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("runner is closed")]
    Closed,

    #[error("runner already started")]
    AlreadyStarted,

    #[error("invalid working directory {}: {source}", path.display())]
    Workdir { path: PathBuf, source: std::io::Error },

    #[error(transparent)]
    Status(#[from] Status),
}

impl From<UiError> for RunnerError {
    fn from(e: UiError) -> Self {
        RunnerError::Status(e.into())
    }
}

impl From<RunnerError> for Status {
    fn from(e: RunnerError) -> Self {
        match e {
            RunnerError::Status(st) => st,
            RunnerError::Closed | RunnerError::AlreadyStarted => {
                Status::failed_precondition(e.to_string())
            }
            RunnerError::Workdir { .. } => Status::invalid_argument(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
