// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side build` against a fake toolchain.

use crate::prelude::*;

#[test]
fn c_project_compiles_and_reports_size() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();

    p.side()
        .args(&["build", "blink.side"])
        .passes()
        .stdout_has("Project Directory:")
        .stdout_has("propeller-elf-gcc -o a.out -Os -mlmm blink.c")
        .stdout_has("Compiled 2K Bytes")
        .stdout_has("Building with propeller-elf-gcc done.");

    assert_eq!(p.calls(), vec!["propeller-elf-gcc -o a.out -Os -mlmm blink.c"]);
}

#[test]
fn spin_object_is_compiled_converted_then_linked() {
    let p = Project::with_files(&["blink.c", "sub.spin"]);
    p.toolchain();

    p.side().args(&["build", "blink.side"]).passes();

    let calls = p.calls();
    assert_eq!(calls.len(), 3, "{calls:?}");
    assert_eq!(calls[0], "bstc -c sub.spin");
    assert_eq!(
        calls[1],
        "propeller-elf-objcopy -I binary -B propeller -O propeller-elf-gcc sub.dat sub_firmware.o"
    );
    assert!(calls[2].starts_with("propeller-elf-gcc -o a.out"));
    assert!(calls[2].contains("sub_firmware.o"));
}

#[test]
fn error_text_with_zero_exit_halts() {
    let p = Project::with_files(&["blink.c", "sub.spin"]);
    p.toolchain();
    p.tool("bstc", "echo 'sub.spin(4): error: undefined symbol'");

    p.side()
        .args(&["build", "blink.side"])
        .exits_with(1)
        .stdout_has("undefined symbol")
        .stdout_has("bstc Error.");

    assert_eq!(p.calls(), vec!["bstc -c sub.spin"]);
}

#[test]
fn warning_text_continues() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    p.tool(
        "propeller-elf-gcc",
        "echo 'blink.c:3: warning: unused variable'; head -c 10 /dev/zero > a.out",
    );

    p.side()
        .args(&["build", "blink.side"])
        .passes()
        .stdout_has("propeller-elf-gcc Compiled OK with Warning(s). done.");
}

#[test]
fn nonzero_exit_is_unknown_error() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    p.tool("propeller-elf-gcc", "exit 4");

    p.side()
        .args(&["build", "blink.side"])
        .exits_with(1)
        .stdout_has("propeller-elf-gcc Unknown Error: 4");
}

#[test]
fn missing_tool_fails_to_launch() {
    let p = Project::with_files(&["blink.c"]);

    p.side().args(&["build", "blink.side"]).exits_with(1).stderr_has("could not start");
}

#[test]
fn missing_manifest_fails() {
    let p = Project::empty();

    p.side()
        .args(&["build", "nope.side"])
        .exits_with(1)
        .stderr_has("cannot read project manifest");
}

#[test]
fn build_transcript_is_logged() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();

    p.side().args(&["build", "blink.side"]).passes();

    let log = p.read(".side/build.log");
    assert!(log.contains("[propeller-elf-gcc] propeller-elf-gcc -o a.out"), "{log}");
}

#[test]
fn cpp_project_links_with_cpp_driver() {
    let p = Project::with_files(&["blink.cpp", ">compiler=C++"]);
    p.toolchain();

    p.side().args(&["build", "blink.side"]).passes().stdout_has("-fno-rtti");
    assert!(p.calls()[0].starts_with("propeller-elf-c++ "));
}

#[test]
fn json_report_describes_build() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();

    let run = p.side().args(&["build", "blink.side", "-o", "json"]).passes();
    let report = run.json();
    assert_eq!(report["succeeded"], true);
    assert_eq!(report["program_size"], 2400);
    assert_eq!(report["steps"].as_array().unwrap().len(), 1);
    assert_eq!(report["steps"][0]["outcome"]["outcome"], "ok");
}

#[test]
fn json_report_names_failed_tool() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    p.tool("propeller-elf-gcc", "exit 4");

    let run = p.side().args(&["build", "blink.side", "-o", "json"]).exits_with(1);
    let report = run.json();
    assert_eq!(report["succeeded"], false);
    assert_eq!(report["failed_tool"], "propeller-elf-gcc");
}

#[test]
fn tool_dir_can_come_from_environment() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();

    cli()
        .env("SIDE_TOOL_DIR", p.tool_dir())
        .current_dir(&p.src())
        .args(&["build", "blink.side"])
        .passes();
}

#[test]
fn change_directory_flag_resolves_project() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();

    cli()
        .args(&["-C"])
        .args(&[p.src()])
        .args(&["--tool-dir"])
        .args(&[p.tool_dir()])
        .args(&["build", "blink.side"])
        .passes();
}
