// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_wire::{channel, BoxRecv};

fn writer() -> (Writer, mpsc::UnboundedSender<TerminalEvent>, JoinHandle<()>, BoxRecv<RunnerRequest>) {
    let (tx, rx) = channel::<RunnerRequest>();
    let (writer, events, task) = Writer::spawn(Box::new(tx));
    (writer, events, task, Box::new(rx))
}

async fn collect(mut rx: BoxRecv<RunnerRequest>) -> Vec<RunnerRequest> {
    let mut out = Vec::new();
    while let Some(msg) = rx.recv().await.unwrap() {
        out.push(msg);
    }
    out
}

fn terminal_lines(msgs: &[RunnerRequest]) -> Vec<String> {
    msgs.iter()
        .filter_map(|m| match m {
            RunnerRequest::Terminal { events } => Some(events.clone()),
            _ => None,
        })
        .flatten()
        .filter_map(|ev| match ev {
            TerminalEvent::Line { msg, .. } => Some(msg),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn output_emitted_before_a_message_is_sent_first() {
    let (writer, events, task, rx) = writer();
    events.send(TerminalEvent::line("one")).unwrap();
    events.send(TerminalEvent::line("two")).unwrap();
    writer.send(RunnerRequest::Complete { result: vg_core::JobResult::Noop }).await.unwrap();
    drop(writer);
    drop(events);
    task.await.unwrap();

    let msgs = collect(rx).await;
    assert_eq!(terminal_lines(&msgs), vec!["one", "two"]);
    assert!(matches!(msgs.last(), Some(RunnerRequest::Complete { .. })));
}

#[tokio::test]
async fn events_are_batched_in_order() {
    let (writer, events, task, rx) = writer();
    let n = MAX_BATCH * 2 + 5;
    for i in 0..n {
        events.send(TerminalEvent::line(i.to_string())).unwrap();
    }
    drop(writer);
    drop(events);
    task.await.unwrap();

    let msgs = collect(rx).await;
    let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();
    assert_eq!(terminal_lines(&msgs), expected);
    for msg in &msgs {
        if let RunnerRequest::Terminal { events } = msg {
            assert!(events.len() <= MAX_BATCH);
        }
    }
}

#[tokio::test]
async fn concurrent_senders_never_interleave_output_after_their_message() {
    let (writer, events, task, rx) = writer();
    let heartbeat = writer.clone();
    let beats = tokio::spawn(async move {
        for _ in 0..10 {
            heartbeat.send(RunnerRequest::Heartbeat).await.unwrap();
        }
    });
    for i in 0..10 {
        events.send(TerminalEvent::line(i.to_string())).unwrap();
    }
    beats.await.unwrap();
    writer.send(RunnerRequest::Ack).await.unwrap();
    drop(writer);
    drop(events);
    task.await.unwrap();

    let msgs = collect(rx).await;
    let beats = msgs.iter().filter(|m| matches!(m, RunnerRequest::Heartbeat)).count();
    assert_eq!(beats, 10);
    assert_eq!(terminal_lines(&msgs).len(), 10);
    assert_eq!(msgs.last(), Some(&RunnerRequest::Ack));
}

#[tokio::test]
async fn send_after_stream_dropped_reports_error() {
    let (writer, _events, _task, rx) = writer();
    drop(rx);
    let err = writer.send(RunnerRequest::Heartbeat).await.unwrap_err();
    assert_eq!(err.code, vg_core::Code::Unavailable);
}
