//! `vg config set` specs

use crate::prelude::*;

#[test]
fn config_set_rejects_malformed_pairs() {
    cli().args(&["config", "set", "NOVALUE"]).exits(2).stderr_has("NAME=VALUE");
}

#[test]
fn config_set_without_server_is_transport_failure() {
    cli().args(&["config", "set", "A=1"]).exits(TRANSPORT_FAILURE).stderr_has("Error:");
}

#[test]
fn config_set_reaches_server() {
    let temp = Project::empty();
    let _server = temp.server();
    temp.vg()
        .args(&["config", "set", "VG_SPEC_A=1", "VG_SPEC_B="])
        .passes()
        .stdout_has("Set 2 config variable(s)");
}
