// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_core::test_support::noop_job;
use vg_core::{JobResult, RunnerId, RunnerInfo, TerminalEvent};
use vg_wire::{FramedRecv, FramedSend, StreamRecv};

#[tokio::test]
async fn large_backlog_streams_in_bounded_frames_then_completes() {
    let store = JobStore::new();
    let id = store.queue(noop_job("job-1"), None).unwrap();
    store.try_assign(&RunnerInfo::new(RunnerId::from_string("rnr-a"))).unwrap();
    store.ack(&id);
    // 5 MiB of raw output; JSON would blow the frame limit in one batch.
    let chunk = TerminalEvent::Raw { data: vec![b'x'; 1024], stderr: false };
    store.append_output(&id, vec![chunk; 5 * 1024]);
    store.finish(&id, Some(JobResult::Noop), None);

    let (a, b) = tokio::io::duplex(64 * 1024);
    let send: BoxSend<JobStreamEvent> = Box::new(FramedSend::new(a));
    let server = tokio::spawn(job_stream(store, id, send));

    let mut recv = FramedRecv::<JobStreamEvent, _>::new(b);
    let mut names = Vec::new();
    let mut raw = 0;
    while let Some(ev) = recv.recv().await.unwrap() {
        if let JobStreamEvent::Terminal { events } = &ev {
            assert!(events.len() <= TERMINAL_BATCH);
            raw += events.len();
        }
        names.push(ev.name());
    }
    server.await.unwrap();

    assert_eq!(raw, 5 * 1024);
    assert_eq!(names.first(), Some(&"Open"));
    assert_eq!(names.last(), Some(&"Complete"));
}
