//! Tests for `vg run` in local mode.

use crate::prelude::*;

/// The process exit code is the command's exit code.
#[test]
fn run_exits_with_command_exit_code() {
    let temp = Project::empty();
    temp.vg()
        .args(&["run", "--", "sh", "-c", "echo hello-from-job; exit 3"])
        .exits(3)
        .stdout_has("hello-from-job");
}

#[test]
fn run_passes_on_success() {
    let temp = Project::empty();
    temp.vg().args(&["run", "true"]).passes();
}

/// Commands run in the working directory.
#[test]
fn run_uses_working_directory() {
    let temp = Project::empty();
    std::fs::write(temp.path().join("marker.txt"), "found-marker").unwrap();
    temp.vg().args(&["run", "cat", "marker.txt"]).passes().stdout_has("found-marker");
}

/// A job that fails reports one line and exits 1.
#[test]
fn missing_command_is_a_job_failure() {
    let temp = Project::empty();
    temp.vg()
        .args(&["run", "vg-definitely-not-a-command"])
        .exits(1)
        .stderr_has("Error: job failed: run:");
}
