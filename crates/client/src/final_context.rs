// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A cancellation context for cleanup work after the caller gave up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// How long cleanup RPCs may take once the caller's context is gone.
pub const DEFAULT_FINAL_TIMEOUT: Duration = Duration::from_secs(5);

/// A fresh token, independent of any cancelled parent, that fires after
/// `timeout` or on the next Ctrl-C. The timer stops on drop.
pub struct FinalContext {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl FinalContext {
    pub fn new(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let fire = token.clone();
        let timer = tokio::spawn(async move {
            let interrupted = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {}
                _ = interrupted => warn!("interrupted, abandoning cleanup"),
            }
            fire.cancel();
        });
        Self { token, timer }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Run `fut` until it finishes or the context fires. `None` when the
    /// context fired first.
    pub async fn run<F: std::future::Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }
}

impl Drop for FinalContext {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

#[cfg(test)]
#[path = "final_context_tests.rs"]
mod tests;
