// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration pushed to runners.

use crate::runner::RunnerId;
use serde::{Deserialize, Serialize};

/// A single environment override. An empty value means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
    /// Scope the variable to one runner; `None` applies to every runner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner: Option<RunnerId>,
}

impl ConfigVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), runner: None }
    }

    pub fn for_runner(mut self, runner: RunnerId) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn is_unset(&self) -> bool {
        self.value.is_empty()
    }

    pub fn applies_to(&self, runner: &RunnerId) -> bool {
        self.runner.as_ref().is_none_or(|r| r == runner)
    }
}

/// A full configuration delivery. Each delivery replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub config_vars: Vec<ConfigVar>,
}

impl RunnerConfig {
    pub fn new(config_vars: Vec<ConfigVar>) -> Self {
        Self { config_vars }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
