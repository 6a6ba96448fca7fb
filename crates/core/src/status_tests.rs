// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_includes_code_and_message() {
    let st = Status::aborted("server sent us an invalid job");
    assert_eq!(st.to_string(), "aborted: server sent us an invalid job");
}

#[test]
fn context_prefixes_message_and_keeps_code() {
    let st = Status::internal("exit status 2").context("run");
    assert_eq!(st.code, Code::Internal);
    assert_eq!(st.message, "run: exit status 2");
}

#[yare::parameterized(
    cancelled  = { Status::cancelled("m"), Code::Cancelled },
    not_found  = { Status::not_found("m"), Code::NotFound },
    aborted    = { Status::aborted("m"), Code::Aborted },
    internal   = { Status::internal("m"), Code::Internal },
    deadline   = { Status::deadline_exceeded("m"), Code::DeadlineExceeded },
)]
fn constructors_set_code(st: Status, code: Code) {
    assert_eq!(st.code, code);
    assert_eq!(st.message, "m");
}

#[test]
fn code_serializes_snake_case() {
    let json = serde_json::to_string(&Code::DeadlineExceeded).unwrap();
    assert_eq!(json, "\"deadline_exceeded\"");
}
