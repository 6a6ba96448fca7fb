// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed JSON framing.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use vg_core::Status;

use crate::{Request, Response};

/// Upper bound on a single frame's payload.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Errors from reading or writing frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout")]
    Timeout,
}

impl From<ProtocolError> for Status {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::ConnectionClosed | ProtocolError::Io(_) => {
                Status::unavailable(e.to_string())
            }
            ProtocolError::Timeout => Status::deadline_exceeded(e.to_string()),
            ProtocolError::Json(_) | ProtocolError::MessageTooLarge { .. } => {
                Status::internal(e.to_string())
            }
        }
    }
}

/// Serialize a value to JSON bytes (no length prefix).
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read one length-prefixed payload.
///
/// A clean EOF before the length prefix is [`ProtocolError::ConnectionClosed`].
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    if let Err(e) = reader.read_exact(&mut len_buf).await {
        return Err(match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ProtocolError::ConnectionClosed,
            _ => ProtocolError::Io(e),
        });
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: len, max: MAX_MESSAGE_SIZE });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Write one payload with its length prefix and flush.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    data: &[u8],
) -> Result<(), ProtocolError> {
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: data.len(), max: MAX_MESSAGE_SIZE });
    }
    let len = data.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read and decode one typed frame.
pub async fn read_frame<T, R>(reader: &mut R) -> Result<T, ProtocolError>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let bytes = read_message(reader).await?;
    decode(&bytes)
}

/// Encode and write one typed frame.
pub async fn write_frame<T, W>(writer: &mut W, value: &T) -> Result<(), ProtocolError>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let bytes = encode(value)?;
    write_message(writer, &bytes).await
}

/// Read the opening request of a connection, bounded by `timeout`.
pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Request, ProtocolError> {
    tokio::time::timeout(timeout, read_frame(reader)).await.map_err(|_| ProtocolError::Timeout)?
}

/// Write a unary response, bounded by `timeout`.
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    tokio::time::timeout(timeout, write_frame(writer, response))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
