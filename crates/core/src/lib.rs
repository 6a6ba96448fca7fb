// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vg-core: Data model shared by the job client, runner, and job store

pub mod macros;

pub mod config;
pub mod id;
pub mod job;
pub mod result;
pub mod runner;
pub mod status;
pub mod terminal;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ConfigVar, RunnerConfig};
pub use job::{DataSource, DataSourceKind, Job, JobId, JobState, Operation, RunnerTarget, Scope};
pub use result::{AuthResult, DocsEntry, DocsResult, InitResult, JobResult, RunResult};
pub use runner::{RunnerId, RunnerInfo};
pub use status::{Code, Status};
pub use terminal::{LineStyle, NamedValue, StepStatus, TableEntry, TableRow, TerminalEvent};
