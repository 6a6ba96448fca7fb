// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, operation payloads, and lifecycle state.

use crate::runner::RunnerId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a queued job.
    ///
    /// Assigned by the job store at enqueue time and used by the client to
    /// open the job's stream, by the runner to match exact assignments, and
    /// in every log line about the job.
    pub struct JobId("job-");
}

/// A unit of work submitted for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Empty until the job store assigns one at enqueue.
    pub id: JobId,
    pub scope: Scope,
    pub operation: Operation,
    pub data_source: DataSource,
    pub target_runner: RunnerTarget,
}

impl Job {
    /// A job skeleton: no-op operation, local data, any runner.
    pub fn new(scope: Scope) -> Self {
        Self {
            id: JobId::from_string(""),
            scope,
            operation: Operation::Noop,
            data_source: DataSource::Local,
            target_runner: RunnerTarget::Any,
        }
    }

    crate::setters! {
        set {
            operation: Operation,
            data_source: DataSource,
            target_runner: RunnerTarget,
        }
    }
}

/// Scope a job is bound to. Opaque to the execution fabric beyond being
/// carried along with the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    Basis { basis: String },
    Project { basis: String, project: String },
    Target { basis: String, project: String, target: String },
}

impl Scope {
    pub fn basis(name: impl Into<String>) -> Self {
        Scope::Basis { basis: name.into() }
    }

    /// Name of the basis the scope ultimately belongs to.
    pub fn basis_name(&self) -> &str {
        match self {
            Scope::Basis { basis } | Scope::Project { basis, .. } | Scope::Target { basis, .. } => {
                basis
            }
        }
    }
}

crate::simple_display! {
    Scope {
        Basis { .. } => "basis",
        Project { .. } => "project",
        Target { .. } => "target",
    }
}

/// The operation a job performs. Closed set; the runner's dispatcher
/// matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Noop,
    Init,
    Run {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Auth {
        #[serde(default)]
        components: Vec<String>,
    },
    Docs,
}

impl Operation {
    /// Operation type name, used to tag logs and wrap execution errors.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Noop => "noop",
            Operation::Init => "init",
            Operation::Run { .. } => "run",
            Operation::Auth { .. } => "auth",
            Operation::Docs => "docs",
        }
    }
}

crate::simple_display! {
    Operation {
        Noop => "noop",
        Init => "init",
        Run { .. } => "run",
        Auth { .. } => "auth",
        Docs => "docs",
    }
}

/// Where a runner obtains the job's working data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSource {
    /// The runner's own working directory.
    Local,
    /// A git repository cloned for the duration of the job.
    Git {
        url: String,
        /// Branch, tag, or commit to check out after cloning.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
        /// Subdirectory of the checkout to use as the working directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
}

impl DataSource {
    pub fn kind(&self) -> DataSourceKind {
        match self {
            DataSource::Local => DataSourceKind::Local,
            DataSource::Git { .. } => DataSourceKind::Git,
        }
    }
}

/// Tag-only variant of [`DataSource`] for keying sourcers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    Local,
    Git,
}

crate::simple_display! {
    DataSourceKind {
        Local => "local",
        Git => "git",
    }
}

/// Which runner may execute a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerTarget {
    Any,
    Id(RunnerId),
}

impl RunnerTarget {
    /// Whether a runner with the given identity may take this job.
    pub fn matches(&self, runner: &RunnerId, by_id_only: bool) -> bool {
        match self {
            RunnerTarget::Any => !by_id_only,
            RunnerTarget::Id(id) => id == runner,
        }
    }
}

/// Server-side lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    /// Assigned to a runner, waiting for its ack.
    Waiting,
    Running,
    Success,
    Error,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Error)
    }
}

crate::simple_display! {
    JobState {
        Queued => "queued",
        Waiting => "waiting",
        Running => "running",
        Success => "success",
        Error => "error",
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
