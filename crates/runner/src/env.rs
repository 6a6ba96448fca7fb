// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying pushed runner config to the process environment.

use std::collections::HashMap;

use tracing::{debug, info};
use vg_core::{RunnerConfig, RunnerId};

/// Access to an environment the watcher manages.
pub trait EnvAdapter: Send {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str);
    fn remove(&mut self, name: &str);
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvAdapter for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&mut self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn remove(&mut self, name: &str) {
        std::env::remove_var(name);
    }
}

/// Applies each config delivery as a diff against the previous one.
///
/// The first time a name is seen its current value is snapshotted. A name
/// that drops out of the config is restored to that snapshot, so the
/// runner never clobbers what the environment held before it started.
/// Delivering the same config twice performs no writes.
pub struct ConfigWatcher {
    env: Box<dyn EnvAdapter>,
    runner: RunnerId,
    original: HashMap<String, Option<String>>,
    /// Names set by the last applied config.
    managed: Vec<String>,
}

impl ConfigWatcher {
    pub fn new(env: Box<dyn EnvAdapter>, runner: RunnerId) -> Self {
        Self { env, runner, original: HashMap::new(), managed: Vec::new() }
    }

    /// Apply `config`; returns the number of environment writes.
    pub fn apply(&mut self, config: &RunnerConfig) -> usize {
        // Global vars first so runner-scoped ones override them.
        let (scoped, global): (Vec<_>, Vec<_>) = config
            .config_vars
            .iter()
            .filter(|v| v.applies_to(&self.runner))
            .partition(|v| v.runner.is_some());
        let mut desired: Vec<(String, Option<String>)> = Vec::new();
        for var in global.into_iter().chain(scoped) {
            let value = (!var.is_unset()).then(|| var.value.clone());
            match desired.iter_mut().find(|(name, _)| *name == var.name) {
                Some(entry) => entry.1 = value,
                None => desired.push((var.name.clone(), value)),
            }
        }

        for (name, _) in &desired {
            if !self.original.contains_key(name) {
                let value = self.env.get(name);
                self.original.insert(name.clone(), value);
            }
        }

        let mut writes = 0;
        for name in std::mem::take(&mut self.managed) {
            if desired.iter().any(|(n, _)| *n == name) {
                continue;
            }
            let original = self.original.get(&name).cloned().flatten();
            if self.write(&name, original.as_deref()) {
                info!(name = %name, "config var removed, restored original value");
                writes += 1;
            }
        }
        for (name, value) in &desired {
            if self.write(name, value.as_deref()) {
                info!(name = %name, unset = value.is_none(), "config var applied");
                writes += 1;
            }
        }

        self.managed = desired.into_iter().map(|(name, _)| name).collect();
        if writes == 0 {
            debug!("runner config unchanged");
        }
        writes
    }

    /// Write `value` (or remove when `None`) if it differs from the current one.
    fn write(&mut self, name: &str, value: Option<&str>) -> bool {
        if self.env.get(name).as_deref() == value {
            return false;
        }
        match value {
            Some(v) => self.env.set(name, v),
            None => self.env.remove(name),
        }
        true
    }
}

/// In-memory environment for tests. Clones share state.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone)]
pub struct FakeEnv {
    vars: std::sync::Arc<parking_lot::Mutex<HashMap<String, String>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeEnv {
    pub fn with(vars: &[(&str, &str)]) -> Self {
        let env = Self::default();
        for (k, v) in vars {
            env.vars.lock().insert(k.to_string(), v.to_string());
        }
        env
    }

    pub fn var(&self, name: &str) -> Option<String> {
        self.vars.lock().get(name).cloned()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl EnvAdapter for FakeEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.var(name)
    }

    fn set(&mut self, name: &str, value: &str) {
        self.vars.lock().insert(name.to_string(), value.to_string());
    }

    fn remove(&mut self, name: &str) {
        self.vars.lock().remove(name);
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
