// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use vg_client::ClientError;

/// Exit code for protocol and transport failures.
pub const TRANSPORT_FAILURE: i32 = -1;

/// Exit code when the job itself reported an error.
pub const JOB_FAILURE: i32 = 1;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<ClientError> for ExitError {
    fn from(e: ClientError) -> Self {
        let code = if e.is_job_error() { JOB_FAILURE } else { TRANSPORT_FAILURE };
        Self::new(code, humanize(&e))
    }
}

/// One line, no status code jargon: `job failed: run: command not found`.
fn humanize(e: &ClientError) -> String {
    let st = e.status();
    let message = st.message.lines().next().unwrap_or_default();
    match e {
        ClientError::Job(_) => format!("job failed: {}", message),
        ClientError::Stream(_) => format!("{} ({})", message, st.code),
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
