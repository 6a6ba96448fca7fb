// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use vg_core::test_support::strategies::arb_config_vars;
use vg_core::ConfigVar;

fn watcher(env: &FakeEnv) -> ConfigWatcher {
    ConfigWatcher::new(Box::new(env.clone()), RunnerId::from_string("rnr-a"))
}

fn config(vars: &[(&str, &str)]) -> RunnerConfig {
    RunnerConfig::new(vars.iter().map(|(k, v)| ConfigVar::new(*k, *v)).collect())
}

#[test]
fn removed_var_is_restored_to_original() {
    let env = FakeEnv::with(&[("A", "1")]);
    let mut w = watcher(&env);
    w.apply(&config(&[("A", "2")]));
    assert_eq!(env.var("A").as_deref(), Some("2"));
    w.apply(&config(&[]));
    assert_eq!(env.var("A").as_deref(), Some("1"));
}

#[test]
fn removed_var_without_original_is_unset() {
    let env = FakeEnv::default();
    let mut w = watcher(&env);
    w.apply(&config(&[("B", "x")]));
    w.apply(&config(&[]));
    assert_eq!(env.var("B"), None);
}

#[test]
fn empty_value_unsets_and_original_still_restores() {
    let env = FakeEnv::with(&[("A", "1")]);
    let mut w = watcher(&env);
    w.apply(&config(&[("A", "")]));
    assert_eq!(env.var("A"), None);
    w.apply(&config(&[]));
    assert_eq!(env.var("A").as_deref(), Some("1"));
}

#[test]
fn original_is_snapshotted_once() {
    let env = FakeEnv::with(&[("A", "1")]);
    let mut w = watcher(&env);
    w.apply(&config(&[("A", "2")]));
    w.apply(&config(&[("A", "3")]));
    w.apply(&config(&[]));
    assert_eq!(env.var("A").as_deref(), Some("1"));
}

#[test]
fn redelivery_performs_no_writes() {
    let env = FakeEnv::default();
    let mut w = watcher(&env);
    let cfg = config(&[("A", "1"), ("B", "2")]);
    assert_eq!(w.apply(&cfg), 2);
    assert_eq!(w.apply(&cfg), 0);
}

#[test]
fn vars_for_other_runners_are_ignored() {
    let env = FakeEnv::default();
    let mut w = watcher(&env);
    let cfg = RunnerConfig::new(vec![
        ConfigVar::new("A", "mine").for_runner(RunnerId::from_string("rnr-a")),
        ConfigVar::new("B", "theirs").for_runner(RunnerId::from_string("rnr-b")),
    ]);
    w.apply(&cfg);
    assert_eq!(env.var("A").as_deref(), Some("mine"));
    assert_eq!(env.var("B"), None);
}

#[test]
fn runner_scoped_var_overrides_global() {
    let env = FakeEnv::default();
    let mut w = watcher(&env);
    let cfg = RunnerConfig::new(vec![
        ConfigVar::new("A", "scoped").for_runner(RunnerId::from_string("rnr-a")),
        ConfigVar::new("A", "global"),
    ]);
    w.apply(&cfg);
    assert_eq!(env.var("A").as_deref(), Some("scoped"));
}

#[test]
#[serial_test::serial]
fn process_env_round_trip() {
    let mut env = ProcessEnv;
    env.set("VG_RUNNER_ENV_TEST", "1");
    assert_eq!(env.get("VG_RUNNER_ENV_TEST").as_deref(), Some("1"));
    env.remove("VG_RUNNER_ENV_TEST");
    assert_eq!(env.get("VG_RUNNER_ENV_TEST"), None);
}

proptest! {
    /// After any sequence of deliveries, an empty delivery restores every
    /// touched name to its value from before the first delivery.
    #[test]
    fn empty_delivery_restores_everything(deliveries in proptest::collection::vec(arb_config_vars(), 1..6)) {
        let env = FakeEnv::with(&[("VG_A", "orig")]);
        let mut w = watcher(&env);
        for vars in &deliveries {
            w.apply(&RunnerConfig::new(vars.clone()));
        }
        w.apply(&RunnerConfig::default());
        let restored = env.var("VG_A");
        prop_assert_eq!(restored.as_deref(), Some("orig"));
        prop_assert_eq!(env.var("VG_B"), None);
        prop_assert_eq!(env.var("VG_C"), None);
    }

    #[test]
    fn applying_twice_is_idempotent(a in arb_config_vars(), b in arb_config_vars()) {
        let env = FakeEnv::default();
        let mut w = watcher(&env);
        w.apply(&RunnerConfig::new(a));
        let cfg = RunnerConfig::new(b);
        w.apply(&cfg);
        prop_assert_eq!(w.apply(&cfg), 0);
    }
}
