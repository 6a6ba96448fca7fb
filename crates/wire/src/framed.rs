// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream halves over a byte transport, one [`Frame`] per message.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use vg_core::Status;

use crate::env::ipc_timeout;
use crate::wire::{encode, read_frame, write_message, ProtocolError};
use crate::{Frame, StreamRecv, StreamSend};

pub struct FramedSend<T, W> {
    writer: W,
    closed: bool,
    _item: PhantomData<fn(T)>,
}

impl<T, W> FramedSend<T, W> {
    pub fn new(writer: W) -> Self {
        Self { writer, closed: false, _item: PhantomData }
    }
}

impl<T, W> FramedSend<T, W>
where
    T: Serialize + Send + 'static,
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, frame: Frame<T>) -> Result<(), Status> {
        if self.closed {
            return Err(Status::unavailable("stream closed"));
        }
        // Encode up front: the future must stay `Send` without `T: Sync`.
        let bytes = encode(&frame)?;
        drop(frame);
        tokio::time::timeout(ipc_timeout(), write_message(&mut self.writer, &bytes))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        Ok(())
    }
}

#[async_trait]
impl<T, W> StreamSend<T> for FramedSend<T, W>
where
    T: Serialize + Send + 'static,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, item: T) -> Result<(), Status> {
        self.write(Frame::Item(item)).await
    }

    async fn fail(&mut self, status: Status) -> Result<(), Status> {
        let result = self.write(Frame::Error(status)).await;
        self.close().await;
        result
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.writer.shutdown().await;
        }
    }
}

pub struct FramedRecv<T, R> {
    reader: R,
    _item: PhantomData<fn() -> T>,
}

impl<T, R> FramedRecv<T, R> {
    pub fn new(reader: R) -> Self {
        Self { reader, _item: PhantomData }
    }
}

#[async_trait]
impl<T, R> StreamRecv<T> for FramedRecv<T, R>
where
    T: DeserializeOwned + Send + 'static,
    R: AsyncRead + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Option<T>, Status> {
        match read_frame(&mut self.reader).await {
            Ok(Frame::Item(item)) => Ok(Some(item)),
            Ok(Frame::Error(status)) => Err(status),
            Err(ProtocolError::ConnectionClosed) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "framed_tests.rs"]
mod tests;
