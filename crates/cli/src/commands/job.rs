// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vg noop|init|run|auth|docs` - queue an operation and follow it

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use tracing::info;
use vg_client::{Client, ClientError};
use vg_core::JobResult;
use vg_runner::Runner;
use vg_server::LocalService;
use vg_terminal::{ConsoleUi, Ui};

use super::{interrupt_token, Context};
use crate::exit_error::ExitError;

#[derive(Subcommand)]
pub enum JobCommand {
    /// Run a job that does nothing (checks the plumbing)
    Noop,
    /// Create the project data directory
    Init,
    /// Run a command on the runner
    Run {
        /// Command and its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Authenticate components
    Auth {
        /// Components to authenticate
        components: Vec<String>,
    },
    /// List the operations runners support
    Docs,
}

pub async fn handle(command: JobCommand, ctx: &Context, expiry: Duration) -> Result<i32> {
    let ui: Arc<dyn Ui> = Arc::new(ConsoleUi::stdio());
    let client = if ctx.remote {
        Client::builder(ctx.connect(), ui).scope(ctx.scope()).build()
    } else {
        local_client(ctx, ui, expiry).await?
    };

    let cancel = interrupt_token();
    let result = match command {
        JobCommand::Noop => client.noop(&cancel).await,
        JobCommand::Init => client.init(&cancel).await,
        JobCommand::Run { command } => {
            let mut parts = command.into_iter();
            let program = parts.next().unwrap_or_default();
            client.run(&cancel, program, parts.collect()).await
        }
        JobCommand::Auth { components } => client.auth(&cancel, components).await,
        JobCommand::Docs => client.docs(&cancel).await,
    };
    client.close().await;
    exit_code(result)
}

/// In-process job store plus a runner that only takes our jobs.
async fn local_client(
    ctx: &Context,
    ui: Arc<dyn Ui>,
    expiry: Duration,
) -> Result<Client> {
    let service = Arc::new(LocalService::default());
    let runner = Runner::builder(service.clone())
        .by_id_only(true)
        .local(Arc::clone(&ui))
        .build()?;
    runner.start().await?;
    info!(runner_id = %runner.id(), "started local runner");

    Ok(Client::builder(service, ui)
        .scope(ctx.scope())
        .local_runner(runner)
        .local_expiry(expiry)
        .build())
}

/// The job's own exit code, or an [`ExitError`] for failures.
pub fn exit_code(result: Result<JobResult, ClientError>) -> Result<i32> {
    match result {
        Ok(result) => Ok(result.exit_code()),
        Err(e) => Err(ExitError::from(e).into()),
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
