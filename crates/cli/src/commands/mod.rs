// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use vg_core::Scope;
use vg_wire::{JobService, SocketService};

pub mod config;
pub mod job;
pub mod runner;
pub mod server;

/// Resolved global options shared by every command.
pub struct Context {
    /// Talk to a running server instead of an in-process one.
    pub remote: bool,
    pub socket: PathBuf,
}

impl Context {
    /// Job service on the server socket.
    pub fn connect(&self) -> Arc<dyn JobService> {
        debug!(socket = %self.socket.display(), "using server socket");
        Arc::new(SocketService::new(&self.socket))
    }

    /// Jobs are scoped to a basis named after the working directory.
    pub fn scope(&self) -> Scope {
        let name = std::env::current_dir()
            .ok()
            .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "default".to_string());
        Scope::basis(name)
    }
}

/// A token cancelled on the first Ctrl-C.
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let fire = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted");
            fire.cancel();
        }
    });
    token
}
