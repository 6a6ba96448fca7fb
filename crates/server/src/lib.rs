// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vg-server: In-process job store.
//!
//! Holds queued jobs, assigns them to runners, relays runner output to
//! job stream subscribers, and pushes config to registered runners. Served
//! in-process through [`LocalService`] or over a Unix socket by [`Listener`].

mod handlers;
mod listener;
mod service;
mod store;

pub use listener::{Listener, ServerError};
pub use service::LocalService;
pub use store::{JobSnapshot, JobStore, HEARTBEAT_TIMEOUT, MAX_FINISHED_JOBS};
