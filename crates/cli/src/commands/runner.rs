// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vg runner` - accept jobs from a running server

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::{error, info};
use vg_runner::Runner;

use super::{interrupt_token, Context};

/// Pause after a failed accept before asking for work again.
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Args)]
pub struct RunnerArgs {
    /// Runner id (random when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Only take jobs that target this runner by id
    #[arg(long)]
    pub by_id_only: bool,

    /// Working directory for jobs with local data (default: current directory)
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

pub async fn handle(args: RunnerArgs, ctx: &Context) -> Result<i32> {
    let mut builder = Runner::builder(ctx.connect()).by_id_only(args.by_id_only);
    if let Some(id) = args.id {
        builder = builder.id(id);
    }
    if let Some(dir) = args.workdir {
        builder = builder.workdir(dir);
    }
    let runner = builder.build()?;
    runner.start().await?;
    println!("Runner {} ready", runner.id());

    let cancel = interrupt_token();
    while !cancel.is_cancelled() {
        if let Err(e) = runner.accept(&cancel).await {
            if cancel.is_cancelled() {
                break;
            }
            error!(error = %e, "error running job");
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(RETRY_DELAY) => {}
            }
        }
    }

    info!("shutting down runner");
    runner.close().await;
    Ok(0)
}
