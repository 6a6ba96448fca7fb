// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test(start_paused = true)]
async fn fires_after_timeout() {
    let ctx = FinalContext::new(Duration::from_secs(5));
    assert!(!ctx.token().is_cancelled());
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(ctx.token().is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn run_returns_output_before_timeout() {
    let ctx = FinalContext::new(Duration::from_secs(5));
    let out = ctx.run(async { 7 }).await;
    assert_eq!(out, Some(7));
}

#[tokio::test(start_paused = true)]
async fn run_gives_up_when_context_fires() {
    let ctx = FinalContext::new(Duration::from_secs(5));
    let out = ctx.run(std::future::pending::<()>()).await;
    assert_eq!(out, None);
}

#[tokio::test]
async fn independent_of_a_cancelled_parent() {
    let parent = CancellationToken::new();
    parent.cancel();
    let ctx = FinalContext::new(DEFAULT_FINAL_TIMEOUT);
    assert!(!ctx.token().is_cancelled());
}
