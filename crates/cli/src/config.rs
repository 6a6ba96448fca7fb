// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional `config.toml` in the state directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "config.toml";

const SOCKET_FILE: &str = "server.sock";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Server socket path.
    pub socket: Option<PathBuf>,
    /// Log filter used when neither `-v` nor `VAGRANT_LOG_LEVEL` is given.
    pub log_level: Option<String>,
}

impl Config {
    /// Load `config.toml` from `dir`. A missing file is the default config.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Socket path: `VAGRANT_SERVER_SOCKET`, then the config, then the
    /// state directory default.
    pub fn socket_path(&self, state_dir: &Path) -> PathBuf {
        crate::env::server_socket()
            .or_else(|| self.socket.clone())
            .unwrap_or_else(|| state_dir.join(SOCKET_FILE))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
