// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_core::{AuthResult, RunResult, Status};

use crate::exit_error::{JOB_FAILURE, TRANSPORT_FAILURE};

fn code_of(result: Result<JobResult, ClientError>) -> i32 {
    match exit_code(result) {
        Ok(code) => code,
        Err(e) => e.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(i32::MIN),
    }
}

#[yare::parameterized(
    noop        = { Ok(JobResult::Noop), 0 },
    run_ok      = { Ok(JobResult::Run(RunResult { exit_code: 0 })), 0 },
    run_failed  = { Ok(JobResult::Run(RunResult { exit_code: 3 })), 3 },
    auth_failed = { Ok(JobResult::Auth(AuthResult { results: vec![("box".into(), false)] })), 1 },
    job_error   = { Err(ClientError::Job(Status::internal("boom"))), JOB_FAILURE },
    transport   = { Err(ClientError::Stream(Status::unavailable("gone"))), TRANSPORT_FAILURE },
)]
fn exit_codes(result: Result<JobResult, ClientError>, code: i32) {
    assert_eq!(code_of(result), code);
}
