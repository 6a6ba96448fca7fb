// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::RunnerResponse;
use vg_core::Code;

#[tokio::test]
async fn item_then_close_reads_as_item_then_eof() {
    let (a, b) = tokio::io::duplex(1024);
    let mut tx = FramedSend::<RunnerResponse, _>::new(a);
    let mut rx = FramedRecv::<RunnerResponse, _>::new(b);

    tx.send(RunnerResponse::Cancel { force: false }).await.unwrap();
    tx.close().await;

    assert_eq!(rx.recv().await.unwrap(), Some(RunnerResponse::Cancel { force: false }));
    assert_eq!(rx.recv().await.unwrap(), None);
}

#[tokio::test]
async fn fail_is_received_as_status() {
    let (a, b) = tokio::io::duplex(1024);
    let mut tx = FramedSend::<RunnerResponse, _>::new(a);
    let mut rx = FramedRecv::<RunnerResponse, _>::new(b);

    tx.fail(Status::not_found("job-9")).await.unwrap();

    let err = rx.recv().await.unwrap_err();
    assert_eq!(err, Status::not_found("job-9"));
    assert_eq!(tx.send(RunnerResponse::Cancel { force: true }).await.unwrap_err().code, Code::Unavailable);
}

#[tokio::test]
async fn garbage_frame_is_internal() {
    let (mut a, b) = tokio::io::duplex(1024);
    crate::write_message(&mut a, b"not json").await.unwrap();
    let mut rx = FramedRecv::<RunnerResponse, _>::new(b);
    assert_eq!(rx.recv().await.unwrap_err().code, Code::Internal);
}

#[tokio::test]
async fn items_need_not_be_sync() {
    use std::cell::Cell;

    let (a, b) = tokio::io::duplex(1024);
    let mut tx: Box<dyn StreamSend<Cell<u32>>> = Box::new(FramedSend::new(a));
    let mut rx = FramedRecv::<u32, _>::new(b);

    tx.send(Cell::new(7)).await.unwrap();
    tx.close().await;

    assert_eq!(rx.recv().await.unwrap(), Some(7));
    assert_eq!(rx.recv().await.unwrap(), None);
}
