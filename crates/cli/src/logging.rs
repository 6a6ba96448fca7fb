// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Filter directive: `-v`/`-vv`/`-vvv` win, then `VAGRANT_LOG_LEVEL`, then
/// the config file, then `warn`.
pub fn resolve_level(verbose: u8, env: Option<String>, config: Option<String>) -> String {
    match verbose {
        0 => env.or(config).unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber writing to stderr. Keep the guard alive
/// until exit so buffered lines are flushed.
pub fn init(level: &str) -> WorkerGuard {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init();
    guard
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
