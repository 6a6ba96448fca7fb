// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the wire crate.

use std::time::Duration;

/// Timeout for unary request/response exchanges and frame writes
/// (default 5s, configurable via `VAGRANT_IPC_TIMEOUT_MS`).
pub fn ipc_timeout() -> Duration {
    std::env::var("VAGRANT_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
