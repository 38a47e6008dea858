// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side project` manifest editing.

use crate::prelude::*;

#[test]
fn new_writes_manifest_beside_main_source() {
    let p = Project::empty();
    p.file("blink.c", "int main() {}\n");

    p.side().args(&["project", "new", "blink.c"]).passes().stdout_has("blink.side");
    assert_eq!(p.read("blink.side"), "blink.c\n");
}

#[test]
fn new_keeps_existing_manifest() {
    let p = Project::with_files(&["blink.c", "sub.spin"]);

    p.side().args(&["project", "new", "blink.c"]).passes();
    assert_eq!(p.read("blink.side"), "blink.c\nsub.spin\n");
}

#[test]
fn show_lists_files_references_and_options() {
    let p = Project::with_files(&["blink.c", "sub.spin", "-../shared", ">memtype=XMMC"]);

    p.side()
        .args(&["project", "show", "blink.side"])
        .passes()
        .stdout_has("blink.c (main)")
        .stdout_has("sub.spin")
        .stdout_has("-../shared")
        .stdout_has("memtype=XMMC");
}

#[test]
fn show_json_has_typed_options() {
    let p = Project::with_files(&["blink.c", ">compiler=C++", ">-Wall"]);

    let run = p.side().args(&["project", "show", "blink.side", "-o", "json"]).passes();
    let json = run.json();
    assert_eq!(json["files"][0]["name"], "blink.c");
    assert_eq!(json["options"]["compiler"], "C++");
    assert_eq!(json["options"]["flags"][0], "warn-all");
}

#[test]
fn add_copies_external_file_into_project() {
    let p = Project::with_files(&["blink.c"]);
    let outside = tempfile::tempdir().unwrap();
    let lib = outside.path().join("lib.c");
    std::fs::write(&lib, "int lib;\n").unwrap();

    p.side()
        .args(&["project", "add", "blink.side"])
        .args(&[&lib])
        .passes()
        .stdout_has("Added lib.c");

    assert_eq!(p.read("lib.c"), "int lib;\n");
    assert_eq!(p.read("blink.side"), "blink.c\nlib.c\n");
}

#[test]
fn add_twice_is_reported() {
    let p = Project::with_files(&["blink.c", "lib.c"]);

    p.side()
        .args(&["project", "add", "blink.side", "lib.c"])
        .passes()
        .stdout_has("already in the project");
}

#[test]
fn remove_drops_entry_but_not_main() {
    let p = Project::with_files(&["blink.c", "lib.c"]);

    p.side().args(&["project", "remove", "blink.side", "lib.c"]).passes();
    assert_eq!(p.read("blink.side"), "blink.c\n");

    p.side()
        .args(&["project", "remove", "blink.side", "blink.c"])
        .fails()
        .stderr_has("main file");
}

#[test]
fn set_and_flag_rewrite_options_after_files() {
    let p = Project::with_files(&["blink.c", "lib.c"]);

    p.side().args(&["project", "set", "blink.side", "memtype", "CMM"]).passes();
    p.side().args(&["project", "flag", "blink.side", "math-lib"]).passes().stdout_has("math-lib on");

    assert_eq!(
        p.read("blink.side"),
        "blink.c\nlib.c\n>compiler=C\n>memtype=CMM\n>optimization=-Os\n>-lm\n"
    );

    p.side().args(&["project", "flag", "blink.side", "-lm", "--off"]).passes();
    assert!(!p.read("blink.side").contains(">-lm"));
}

#[test]
fn unknown_option_key_fails() {
    let p = Project::with_files(&["blink.c"]);

    p.side().args(&["project", "set", "blink.side", "board", "HUB"]).fails();
    p.side().args(&["project", "flag", "blink.side", "turbo"]).fails();
}
