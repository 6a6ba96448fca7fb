// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn ipc_timeout_defaults_to_five_seconds() {
    std::env::remove_var("VAGRANT_IPC_TIMEOUT_MS");
    assert_eq!(ipc_timeout(), Duration::from_secs(5));
}

#[test]
#[serial]
fn ipc_timeout_reads_override() {
    std::env::set_var("VAGRANT_IPC_TIMEOUT_MS", "250");
    assert_eq!(ipc_timeout(), Duration::from_millis(250));
    std::env::set_var("VAGRANT_IPC_TIMEOUT_MS", "soon");
    assert_eq!(ipc_timeout(), Duration::from_secs(5));
    std::env::remove_var("VAGRANT_IPC_TIMEOUT_MS");
}
