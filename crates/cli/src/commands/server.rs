// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vg server` - serve the job store on a Unix socket

use anyhow::{Context as _, Result};
use tracing::info;
use vg_server::{JobStore, Listener};

use super::{interrupt_token, Context};

pub async fn handle(ctx: &Context) -> Result<i32> {
    if let Some(parent) = ctx.socket.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let listener = Listener::bind(&ctx.socket, JobStore::new())?;
    println!("Server listening on {}", listener.path().display());

    let shutdown = interrupt_token();
    listener.run(shutdown).await;
    info!("server stopped");
    Ok(0)
}
