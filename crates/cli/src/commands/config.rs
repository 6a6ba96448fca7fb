// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vg config` - runner configuration on the server

use anyhow::Result;
use clap::Subcommand;
use vg_core::{ConfigVar, RunnerId};

use super::Context;
use crate::exit_error::{ExitError, TRANSPORT_FAILURE};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Set environment variables on runners; an empty value unsets
    Set {
        /// NAME=VALUE pairs
        #[arg(required = true, value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Only apply to this runner
        #[arg(long)]
        runner: Option<String>,
    },
}

pub async fn handle(command: ConfigCommand, ctx: &Context) -> Result<i32> {
    match command {
        ConfigCommand::Set { vars, runner } => {
            let vars = config_vars(vars, runner.map(RunnerId::from_string));
            let count = vars.len();
            ctx.connect().set_config(vars).await.map_err(|st| {
                ExitError::new(TRANSPORT_FAILURE, format!("{} ({})", st.message, st.code))
            })?;
            println!("Set {} config variable(s)", count);
            Ok(0)
        }
    }
}

fn config_vars(pairs: Vec<(String, String)>, runner: Option<RunnerId>) -> Vec<ConfigVar> {
    pairs
        .into_iter()
        .map(|(name, value)| {
            let var = ConfigVar::new(name, value);
            match &runner {
                Some(id) => var.for_runner(id.clone()),
                None => var,
            }
        })
        .collect()
}

/// Parse `NAME=VALUE`; the value may be empty or contain `=`.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {:?}", s)),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
