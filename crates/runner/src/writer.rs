// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single writer for a runner job stream.
//!
//! One task owns the stream's send half. Heartbeats, ack/nack, completion,
//! and terminal output all go through it, so sends never interleave and
//! output is flushed before any message submitted after it.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};
use vg_core::{Status, TerminalEvent};
use vg_wire::{BoxSend, RunnerRequest};

/// Most terminal events packed into one `Terminal` message.
const MAX_BATCH: usize = 64;

const MAILBOX_CAPACITY: usize = 16;

struct Outbound {
    msg: RunnerRequest,
    done: oneshot::Sender<Result<(), Status>>,
}

/// Mailbox into the writer task.
#[derive(Clone)]
pub(crate) struct Writer {
    tx: mpsc::Sender<Outbound>,
}

impl Writer {
    /// Start the writer task. Returns the mailbox, the sink for terminal
    /// events, and the task handle.
    ///
    /// The task exits once every [`Writer`] clone is dropped, after
    /// flushing the events already emitted, and closes the stream.
    pub(crate) fn spawn(
        send: BoxSend<RunnerRequest>,
    ) -> (Self, mpsc::UnboundedSender<TerminalEvent>, JoinHandle<()>) {
        let (tx, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        let (events_tx, events) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(send, mailbox, events).in_current_span());
        (Self { tx }, events_tx, task)
    }

    /// Send `msg` after any output emitted before this call.
    pub(crate) async fn send(&self, msg: RunnerRequest) -> Result<(), Status> {
        let (done, result) = oneshot::channel();
        self.tx
            .send(Outbound { msg, done })
            .await
            .map_err(|_| Status::unavailable("job stream writer stopped"))?;
        result.await.map_err(|_| Status::unavailable("job stream writer stopped"))?
    }
}

async fn run(
    mut send: BoxSend<RunnerRequest>,
    mut mailbox: mpsc::Receiver<Outbound>,
    mut events: mpsc::UnboundedReceiver<TerminalEvent>,
) {
    let mut events_open = true;
    loop {
        tokio::select! {
            biased;
            ev = events.recv(), if events_open => match ev {
                Some(ev) => flush(&mut send, &mut events, vec![ev]).await,
                None => events_open = false,
            },
            out = mailbox.recv() => match out {
                Some(out) => {
                    flush(&mut send, &mut events, Vec::new()).await;
                    debug!(msg = out.msg.name(), "sending");
                    let result = send.send(out.msg).await;
                    let _ = out.done.send(result);
                }
                None => break,
            },
        }
    }
    flush(&mut send, &mut events, Vec::new()).await;
    send.close().await;
}

/// Send `batch` plus whatever is already queued, in batches.
async fn flush(
    send: &mut BoxSend<RunnerRequest>,
    events: &mut mpsc::UnboundedReceiver<TerminalEvent>,
    mut batch: Vec<TerminalEvent>,
) {
    loop {
        while batch.len() < MAX_BATCH {
            match events.try_recv() {
                Ok(ev) => batch.push(ev),
                Err(_) => break,
            }
        }
        if batch.is_empty() {
            return;
        }
        let chunk = std::mem::take(&mut batch);
        let full = chunk.len() == MAX_BATCH;
        if let Err(e) = send.send(RunnerRequest::Terminal { events: chunk }).await {
            debug!(error = %e, "dropping terminal output");
        }
        if !full {
            return;
        }
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
