// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vg-client: Queue jobs and follow them to completion.
//!
//! In local mode the client owns a co-located [`vg_runner::Runner`] and
//! tells it to accept exactly the job it just queued. In remote mode jobs
//! go to whichever runner the job store picks, and their terminal output
//! is replayed onto the client's UI.

mod client;
mod error;
mod final_context;
mod ops;
mod stream;

pub use client::{Client, ClientBuilder, OnIdAssigned, DEFAULT_LOCAL_JOB_EXPIRY};
pub use error::ClientError;
pub use final_context::{FinalContext, DEFAULT_FINAL_TIMEOUT};
