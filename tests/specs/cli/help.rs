//! CLI help output specs

use crate::prelude::*;

#[test]
fn vg_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn vg_help_lists_operations() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("noop")
        .stdout_has("init")
        .stdout_has("run")
        .stdout_has("server")
        .stdout_has("runner");
}

#[test]
fn vg_run_help_shows_usage() {
    cli().args(&["run", "--help"]).passes().stdout_has("Usage:");
}

#[test]
fn vg_config_help_shows_subcommands() {
    cli().args(&["config", "--help"]).passes().stdout_has("set");
}

#[test]
fn vg_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn vg_without_command_is_usage_error() {
    cli().exits(2);
}
