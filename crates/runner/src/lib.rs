// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vg-runner: Accepts jobs from the job store and executes them.
//!
//! A [`Runner`] registers over the config stream, then runs one job per
//! [`Runner::accept`] call: request, assignment, ack, execute, report.
//! Output flows back as terminal events through a single writer task that
//! owns the stream's send half.

mod accept;
mod dispatch;
mod env;
mod error;
mod runner;
mod source;
mod writer;

pub use dispatch::{BuiltinDispatcher, ExecContext, OperationDispatcher};
pub use env::{ConfigWatcher, EnvAdapter, ProcessEnv};
pub use error::RunnerError;
pub use runner::{Runner, RunnerBuilder, DEFAULT_HEARTBEAT_INTERVAL};
pub use source::{GitSourcer, LocalSourcer, SourcedData, Sourcer};

#[cfg(any(test, feature = "test-support"))]
pub use env::FakeEnv;
