// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC boundary between job clients, runners, and the job store.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload. Each
//! socket connection carries one RPC, named by its first [`Request`] frame.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
mod framed;
mod messages;
mod request;
mod service;
mod socket;
mod stream;
mod wire;

pub use framed::{FramedRecv, FramedSend};
pub use messages::{
    Frame, JobStreamEvent, RunnerConfigRequest, RunnerConfigResponse, RunnerRequest,
    RunnerResponse,
};
pub use request::{Request, Response};
pub use service::{JobService, RunnerConfigStream, RunnerJobStream};
pub use socket::SocketService;
pub use stream::{channel, BoxRecv, BoxSend, ChannelRecv, ChannelSend, Duplex, StreamRecv, StreamSend};
pub use wire::{
    decode, encode, read_frame, read_message, read_request, write_frame, write_message,
    write_response, ProtocolError, MAX_MESSAGE_SIZE,
};
