// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_core::Code;

#[tokio::test]
async fn items_arrive_in_send_order_then_eof() {
    let (mut tx, mut rx) = channel::<u32>();
    for i in 0..5 {
        tx.send(i).await.unwrap();
    }
    tx.close().await;

    let mut seen = Vec::new();
    while let Some(i) = rx.recv().await.unwrap() {
        seen.push(i);
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn dropping_sender_is_eof() {
    let (tx, mut rx) = channel::<u32>();
    drop(tx);
    assert_eq!(rx.recv().await.unwrap(), None);
}

#[tokio::test]
async fn fail_delivers_status_and_closes() {
    let (mut tx, mut rx) = channel::<u32>();
    tx.fail(Status::aborted("bad first message")).await.unwrap();

    let err = rx.recv().await.unwrap_err();
    assert_eq!(err.code, Code::Aborted);
    assert_eq!(rx.recv().await.unwrap(), None);
}

#[tokio::test]
async fn send_after_close_is_unavailable() {
    let (mut tx, _rx) = channel::<u32>();
    tx.close().await;
    tx.close().await;
    let err = tx.send(1).await.unwrap_err();
    assert_eq!(err.code, Code::Unavailable);
}

#[tokio::test]
async fn send_to_dropped_receiver_is_unavailable() {
    let (mut tx, rx) = channel::<u32>();
    drop(rx);
    assert_eq!(tx.send(1).await.unwrap_err().code, Code::Unavailable);
}
