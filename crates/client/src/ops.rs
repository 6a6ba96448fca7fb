// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One method per operation, each built on [`Client::do_job`].

use tokio_util::sync::CancellationToken;
use vg_core::{JobResult, Operation};

use crate::client::Client;
use crate::error::ClientError;

impl Client {
    pub async fn noop(&self, cancel: &CancellationToken) -> Result<JobResult, ClientError> {
        self.do_job(cancel, self.job(), None).await
    }

    /// Create the project data directory in the runner's working directory.
    pub async fn init(&self, cancel: &CancellationToken) -> Result<JobResult, ClientError> {
        self.do_job(cancel, self.job().operation(Operation::Init), None).await
    }

    pub async fn run(
        &self,
        cancel: &CancellationToken,
        command: impl Into<String>,
        args: Vec<String>,
    ) -> Result<JobResult, ClientError> {
        let op = Operation::Run { command: command.into(), args };
        self.do_job(cancel, self.job().operation(op), None).await
    }

    pub async fn auth(
        &self,
        cancel: &CancellationToken,
        components: Vec<String>,
    ) -> Result<JobResult, ClientError> {
        self.do_job(cancel, self.job().operation(Operation::Auth { components }), None).await
    }

    pub async fn docs(&self, cancel: &CancellationToken) -> Result<JobResult, ClientError> {
        self.do_job(cancel, self.job().operation(Operation::Docs), None).await
    }
}
