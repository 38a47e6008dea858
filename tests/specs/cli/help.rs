// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn side_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn side_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("build")
        .stdout_has("run")
        .stdout_has("burn")
        .stdout_has("project")
        .stdout_has("tags");
}

#[test]
fn side_build_help_shows_usage() {
    cli().args(&["build", "--help"]).passes().stdout_has("Usage:");
}

#[test]
fn side_run_help_shows_board_and_port() {
    cli().args(&["run", "--help"]).passes().stdout_has("--board").stdout_has("--port");
}

#[test]
fn side_project_help_shows_subcommands() {
    cli()
        .args(&["project", "--help"])
        .passes()
        .stdout_has("new")
        .stdout_has("show")
        .stdout_has("add")
        .stdout_has("remove")
        .stdout_has("set")
        .stdout_has("flag");
}

#[test]
fn side_tags_help_shows_subcommands() {
    cli()
        .args(&["tags", "--help"])
        .passes()
        .stdout_has("build")
        .stdout_has("find")
        .stdout_has("jump")
        .stdout_has("back")
        .stdout_has("clear");
}

#[test]
fn side_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn unknown_command_fails() {
    cli().args(&["flash"]).fails();
}
