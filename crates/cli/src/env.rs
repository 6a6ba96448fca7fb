// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use vg_client::DEFAULT_LOCAL_JOB_EXPIRY;

/// Resolve state directory: VAGRANT_HOME > XDG_STATE_HOME/vagrant > ~/.local/state/vagrant
pub fn state_dir() -> Result<PathBuf> {
    if let Some(dir) = non_empty("VAGRANT_HOME") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("vagrant"));
    }
    let Some(home) = non_empty("HOME") else {
        bail!("cannot find a state directory: set VAGRANT_HOME or HOME");
    };
    Ok(PathBuf::from(home).join(".local/state/vagrant"))
}

/// Explicit server socket path, if set.
pub fn server_socket() -> Option<PathBuf> {
    non_empty("VAGRANT_SERVER_SOCKET").map(PathBuf::from)
}

/// Expiry for jobs queued in local mode (default 30s, configurable via
/// `VAGRANT_LOCAL_JOB_EXPIRY_MS`).
pub fn local_job_expiry() -> Duration {
    std::env::var("VAGRANT_LOCAL_JOB_EXPIRY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_LOCAL_JOB_EXPIRY)
}

/// Log filter from `VAGRANT_LOG_LEVEL`.
pub fn log_level() -> Option<String> {
    non_empty("VAGRANT_LOG_LEVEL")
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
