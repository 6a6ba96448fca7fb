// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of executing a job, one variant per [`Operation`](crate::Operation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobResult {
    Noop,
    Init(InitResult),
    Run(RunResult),
    Auth(AuthResult),
    Docs(DocsResult),
}

impl JobResult {
    /// Whether the operation itself reported success.
    pub fn success(&self) -> bool {
        match self {
            JobResult::Run(r) => r.exit_code == 0,
            JobResult::Auth(r) => r.results.iter().all(|(_, ok)| *ok),
            JobResult::Noop | JobResult::Init(_) | JobResult::Docs(_) => true,
        }
    }

    /// Process exit code the CLI should use for this result.
    pub fn exit_code(&self) -> i32 {
        match self {
            JobResult::Run(r) => r.exit_code,
            _ if self.success() => 0,
            _ => 1,
        }
    }
}

crate::simple_display! {
    JobResult {
        Noop => "noop",
        Init(..) => "init",
        Run(..) => "run",
        Auth(..) => "auth",
        Docs(..) => "docs",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitResult {
    /// Data directory created for the scope.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub exit_code: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    /// Component name paired with whether it authenticated.
    pub results: Vec<(String, bool)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsResult {
    pub operations: Vec<DocsEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsEntry {
    pub name: String,
    pub description: String,
}

impl DocsEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
