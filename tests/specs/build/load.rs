// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side run` and `side burn`.

use crate::prelude::*;

fn loader_config(p: &Project) -> std::path::PathBuf {
    p.write_config("loader_includes = \"/opt/parallax/propeller-load\"\n")
}

#[test]
fn run_loads_image_into_ram() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    let config = loader_config(&p);

    p.side()
        .args(&["--config"])
        .args(&[config])
        .args(&["run", "blink.side", "--board", "QUICKSTART", "--port", "/dev/ttyUSB0"])
        .passes()
        .stdout_has("done.");

    let calls = p.calls();
    let image = p.src().join("a.out");
    assert_eq!(
        calls[1],
        format!(
            "propeller-load -b QUICKSTART -p /dev/ttyUSB0 -I /opt/parallax/propeller-load {} -r",
            image.display()
        )
    );
}

#[test]
fn burn_writes_eeprom() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    let config = loader_config(&p);

    p.side()
        .args(&["--config"])
        .args(&[config])
        .env("SIDE_BOARD", "QUICKSTART")
        .env("SIDE_PORT", "/dev/ttyUSB0")
        .args(&["burn", "blink.side"])
        .passes();

    assert!(p.calls()[1].ends_with(" -e"));
}

#[test]
fn load_without_board_does_not_build() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    let config = loader_config(&p);

    p.side()
        .args(&["--config"])
        .args(&[config])
        .args(&["run", "blink.side", "--port", "/dev/ttyUSB0"])
        .exits_with(1)
        .stderr_has("no board selected");

    assert!(p.calls().is_empty());
}

#[test]
fn failed_build_is_not_loaded() {
    let p = Project::with_files(&["blink.c"]);
    p.toolchain();
    p.tool("propeller-elf-gcc", "echo 'blink.c:1: error: expected ;'");
    let config = loader_config(&p);

    p.side()
        .args(&["--config"])
        .args(&[config])
        .args(&["run", "blink.side", "--board", "HUB", "--port", "COM1"])
        .exits_with(1);

    assert_eq!(p.calls().len(), 1);
}
