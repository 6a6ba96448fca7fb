// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vg-terminal: Abstract UI and its bridge onto job stream events.
//!
//! A runner hands operations a [`StreamUi`], which turns every UI action
//! into a [`TerminalEvent`](vg_core::TerminalEvent). A client feeds the
//! events it receives to a [`Replayer`], which performs the same actions
//! on a local [`Ui`].

pub mod color;
mod console;
mod multi;
mod replay;
mod stream_ui;
mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod recording;

pub use console::ConsoleUi;
pub use multi::MultiUi;
pub use replay::Replayer;
pub use stream_ui::{EventSink, StreamUi, RAW_CHUNK_SIZE};
pub use ui::{OutputOpts, OutputWriters, StatusLine, Step, StepGroup, Ui, UiError};
