// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream halves: the transport-neutral shape of every streaming RPC.
//!
//! A receive of `Ok(None)` is a clean end of stream (EOF). Senders may end
//! a stream with a status, which the peer receives as `Err`.

use async_trait::async_trait;
use tokio::sync::mpsc;
use vg_core::Status;

/// Sending half of a stream.
#[async_trait]
pub trait StreamSend<T: Send + 'static>: Send {
    async fn send(&mut self, item: T) -> Result<(), Status>;

    /// Terminate the stream with an error status.
    async fn fail(&mut self, status: Status) -> Result<(), Status>;

    /// Close the stream; the peer observes EOF. Idempotent.
    async fn close(&mut self);
}

/// Receiving half of a stream.
#[async_trait]
pub trait StreamRecv<T: Send + 'static>: Send {
    async fn recv(&mut self) -> Result<Option<T>, Status>;
}

pub type BoxSend<T> = Box<dyn StreamSend<T>>;
pub type BoxRecv<T> = Box<dyn StreamRecv<T>>;

/// Both halves of a bidirectional stream, as seen from one end.
pub struct Duplex<S: Send + 'static, R: Send + 'static> {
    pub send: BoxSend<S>,
    pub recv: BoxRecv<R>,
}

impl<S: Send + 'static, R: Send + 'static> Duplex<S, R> {
    pub fn new(send: BoxSend<S>, recv: BoxRecv<R>) -> Self {
        Self { send, recv }
    }
}

/// Capacity of in-process stream channels.
const CHANNEL_CAPACITY: usize = 64;

/// An in-process stream.
pub fn channel<T: Send + 'static>() -> (ChannelSend<T>, ChannelRecv<T>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    (ChannelSend { tx: Some(tx) }, ChannelRecv { rx })
}

pub struct ChannelSend<T> {
    tx: Option<mpsc::Sender<Result<T, Status>>>,
}

impl<T> ChannelSend<T> {
    async fn push(&mut self, item: Result<T, Status>) -> Result<(), Status> {
        let tx = self.tx.as_ref().ok_or_else(|| Status::unavailable("stream closed"))?;
        tx.send(item).await.map_err(|_| Status::unavailable("stream receiver dropped"))
    }
}

#[async_trait]
impl<T: Send + 'static> StreamSend<T> for ChannelSend<T> {
    async fn send(&mut self, item: T) -> Result<(), Status> {
        self.push(Ok(item)).await
    }

    async fn fail(&mut self, status: Status) -> Result<(), Status> {
        let result = self.push(Err(status)).await;
        self.tx = None;
        result
    }

    async fn close(&mut self) {
        self.tx = None;
    }
}

pub struct ChannelRecv<T> {
    rx: mpsc::Receiver<Result<T, Status>>,
}

#[async_trait]
impl<T: Send + 'static> StreamRecv<T> for ChannelRecv<T> {
    async fn recv(&mut self) -> Result<Option<T>, Status> {
        self.rx.recv().await.transpose()
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
