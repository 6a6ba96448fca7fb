// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vg: queue jobs and run them on local or remote runners.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::config::ConfigCommand;
use commands::job::JobCommand;
use commands::runner::RunnerArgs;
use commands::Context;
use exit_error::{ExitError, TRANSPORT_FAILURE};

#[derive(Parser)]
#[command(
    name = "vg",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Queue jobs and run them on local or remote runners",
    styles = color::styles(),
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Use the server on the socket instead of an in-process one
    #[arg(long, global = true)]
    remote: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Job(JobCommand),

    /// Serve the job store on a Unix socket until interrupted
    Server,

    /// Accept jobs from the server until interrupted
    Runner(RunnerArgs),

    /// Manage runner configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = e.downcast_ref::<ExitError>().map_or(TRANSPORT_FAILURE, |e| e.code);
            eprintln!("{} {:#}", color::error_prefix(), e);
            code
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let state_dir = env::state_dir()?;
    let config = config::Config::load(&state_dir)?;
    let level = logging::resolve_level(cli.verbose, env::log_level(), config.log_level.clone());
    let _guard = logging::init(&level);

    let ctx = Context { remote: cli.remote, socket: config.socket_path(&state_dir) };
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match cli.command {
            Command::Job(job) => commands::job::handle(job, &ctx, env::local_job_expiry()).await,
            Command::Server => commands::server::handle(&ctx).await,
            Command::Runner(args) => commands::runner::handle(args, &ctx).await,
            Command::Config(command) => commands::config::handle(command, &ctx).await,
        }
    })
}
