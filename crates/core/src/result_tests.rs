// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    noop        = { JobResult::Noop, 0 },
    run_ok      = { JobResult::Run(RunResult { exit_code: 0 }), 0 },
    run_failed  = { JobResult::Run(RunResult { exit_code: 3 }), 3 },
    auth_ok     = { JobResult::Auth(AuthResult { results: vec![("a".into(), true)] }), 0 },
    auth_failed = { JobResult::Auth(AuthResult { results: vec![("a".into(), false)] }), 1 },
    docs        = { JobResult::Docs(DocsResult::default()), 0 },
)]
fn exit_code_follows_result(result: JobResult, code: i32) {
    assert_eq!(result.exit_code(), code);
    assert_eq!(result.success(), code == 0);
}

#[test]
fn result_is_tagged_by_operation() {
    let json = serde_json::to_value(JobResult::Run(RunResult { exit_code: 2 })).unwrap();
    assert_eq!(json["type"], "run");
    assert_eq!(json["exit_code"], 2);
}
