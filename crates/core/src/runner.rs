// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner identity.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a runner process.
    pub struct RunnerId("rnr-");
}

/// Identity a runner presents when it registers for config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerInfo {
    pub id: RunnerId,
    /// Only accept jobs that target this runner by id.
    #[serde(default)]
    pub by_id_only: bool,
}

impl RunnerInfo {
    pub fn new(id: RunnerId) -> Self {
        Self { id, by_id_only: false }
    }
}
