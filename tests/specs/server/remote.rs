//! Remote mode: `vg server`, `vg runner`, and `vg --remote <op>`.

use crate::prelude::*;

#[test]
fn remote_without_server_is_transport_failure() {
    let temp = Project::empty();
    temp.vg().args(&["--remote", "noop"]).exits(TRANSPORT_FAILURE).stderr_has("Error:");
}

#[test]
fn remote_noop_runs_on_remote_runner() {
    let temp = Project::empty();
    let _server = temp.server();
    let _runner = temp.spawn(&["runner"]);

    temp.vg().args(&["--remote", "noop"]).passes();
}

/// Output produced on the runner is replayed on the client.
#[test]
fn remote_run_streams_output_and_exit_code() {
    let temp = Project::empty();
    let _server = temp.server();
    let _runner = temp.spawn(&["runner"]);

    temp.vg()
        .args(&["--remote", "run", "--", "sh", "-c", "echo streamed-output; exit 4"])
        .exits(4)
        .stdout_has("streamed-output");
}
