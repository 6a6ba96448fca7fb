// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_core::Code;

#[yare::parameterized(
    closed  = { RunnerError::Closed, Code::FailedPrecondition },
    started = { RunnerError::AlreadyStarted, Code::FailedPrecondition },
    status  = { RunnerError::Status(Status::aborted("x")), Code::Aborted },
    ui      = { RunnerError::from(UiError::MultipleInteractive), Code::Internal },
)]
fn converts_to_status(err: RunnerError, code: Code) {
    assert_eq!(Status::from(err).code, code);
}

#[test]
fn status_message_is_kept_verbatim() {
    let err = RunnerError::from(Status::aborted("server sent us an invalid job"));
    assert_eq!(err.to_string(), "aborted: server sent us an invalid job");
}
