//! Local-mode operations: in-process server plus a private runner.

use crate::prelude::*;

#[test]
fn noop_passes() {
    let temp = Project::empty();
    temp.vg().args(&["noop"]).passes();
}

#[test]
fn init_creates_data_directory() {
    let temp = Project::empty();
    temp.vg().args(&["init"]).passes().stdout_has("Initialized project data");
    assert!(temp.path().join(".vagrant").is_dir());
}

#[test]
fn docs_lists_operations() {
    let temp = Project::empty();
    temp.vg().args(&["docs"]).passes().stdout_has("noop").stdout_has("run");
}

#[test]
fn auth_reports_components() {
    let temp = Project::empty();
    temp.vg().args(&["auth", "box-cloud"]).passes().stdout_has("box-cloud");
}

/// Verbose logging goes to stderr and leaves stdout alone.
#[test]
fn verbose_logs_to_stderr() {
    let temp = Project::empty();
    temp.vg()
        .args(&["-vv", "noop"])
        .passes()
        .stderr_has("job queued")
        .stdout_lacks("job queued");
}

/// Local mode never needs a server socket.
#[test]
fn local_mode_ignores_missing_server() {
    let temp = Project::empty();
    temp.vg().args(&["noop"]).passes();
    assert!(!temp.socket().exists());
}
