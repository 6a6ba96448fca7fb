// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple      = { "A=1", "A", "1" },
    empty_value = { "A=", "A", "" },
    equals      = { "OPTS=a=b", "OPTS", "a=b" },
)]
fn parses_pairs(input: &str, name: &str, value: &str) {
    assert_eq!(parse_var(input), Ok((name.to_string(), value.to_string())));
}

#[yare::parameterized(
    no_equals  = { "A" },
    empty_name = { "=1" },
)]
fn rejects_malformed(input: &str) {
    assert!(parse_var(input).is_err());
}

#[test]
fn scopes_vars_to_runner() {
    let pairs = vec![("A".to_string(), "1".to_string())];
    let vars = config_vars(pairs.clone(), Some(RunnerId::from_string("rnr-x")));
    assert_eq!(vars[0].runner, Some(RunnerId::from_string("rnr-x")));

    let vars = config_vars(pairs, None);
    assert_eq!(vars, vec![ConfigVar::new("A", "1")]);
}
