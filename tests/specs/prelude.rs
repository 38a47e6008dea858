// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a sandboxed project directory with a fake toolchain and
//! fluent assertions over `side` runs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

/// `side` with a clean environment and no user config.
pub fn cli() -> Cmd {
    let mut cmd = assert_cmd::Command::cargo_bin("side").unwrap();
    for var in ["SIDE_CONFIG", "SIDE_TOOL_DIR", "SIDE_BOARD", "SIDE_PORT", "COLOR"] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd.env("SIDE_CONFIG", "/nonexistent/side/config.toml");
    Cmd { cmd }
}

pub struct Cmd {
    cmd: assert_cmd::Command,
}

impl Cmd {
    pub fn args<S: AsRef<std::ffi::OsStr>>(mut self, args: &[S]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    pub fn passes(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(run.output.status.success(), "expected success\n{}", run.dump());
        run
    }

    pub fn fails(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(!run.output.status.success(), "expected failure\n{}", run.dump());
        run
    }

    pub fn exits_with(mut self, code: i32) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert_eq!(run.output.status.code(), Some(code), "{}", run.dump());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.dump());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {needle:?}\n{}", self.dump());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.dump());
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }

    fn dump(&self) -> String {
        format!("--- stdout\n{}--- stderr\n{}", self.stdout(), self.stderr())
    }
}

/// A project directory plus a tool directory for fake toolchain scripts.
pub struct Project {
    root: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let project = Self { root: tempfile::tempdir().unwrap() };
        std::fs::create_dir_all(project.tool_dir()).unwrap();
        std::fs::create_dir_all(project.src()).unwrap();
        project
    }

    /// Project with `blink.side` listing `files` (first is main).
    pub fn with_files(files: &[&str]) -> Self {
        let project = Self::empty();
        let mut manifest = String::new();
        for f in files {
            manifest.push_str(f);
            manifest.push('\n');
            if !f.starts_with(['>', '-']) && !f.contains(" -> ") {
                project.file(f, "");
            }
        }
        project.file("blink.side", &manifest);
        project
    }

    pub fn src(&self) -> PathBuf {
        self.root.path().join("src")
    }

    pub fn tool_dir(&self) -> PathBuf {
        self.root.path().join("tools")
    }

    pub fn manifest(&self) -> PathBuf {
        self.src().join("blink.side")
    }

    pub fn calls_log(&self) -> PathBuf {
        self.tool_dir().join("calls.log")
    }

    /// Write a file relative to the project directory.
    pub fn file(&self, name: &str, contents: &str) {
        let path = self.src().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.src().join(name)).unwrap()
    }

    /// Install a fake tool. Every call is appended to the calls log as
    /// `<tool> <args>` before `body` runs in the invocation's cwd.
    #[cfg(unix)]
    pub fn tool(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = self.tool_dir().join(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> \"{}\"\n{body}\n",
            self.calls_log().display()
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Install the default toolchain: every tool succeeds silently and the
    /// compiler writes a 2400-byte `a.out` when linking.
    #[cfg(unix)]
    pub fn toolchain(&self) {
        self.tool(
            "propeller-elf-gcc",
            "case \" $* \" in *\" -o a.out \"*) head -c 2400 /dev/zero > a.out ;; esac",
        );
        self.tool("propeller-elf-c++", "head -c 1000 /dev/zero > a.out");
        self.tool("propeller-elf-as", "");
        self.tool("propeller-elf-objcopy", "");
        self.tool("bstc", "for a; do :; done; touch \"${a%.spin}.dat\"");
        self.tool("propeller-load", "");
    }

    pub fn write_config(&self, toml: &str) -> PathBuf {
        let path = self.root.path().join("config.toml");
        std::fs::write(&path, toml).unwrap();
        path
    }

    /// Tool names from the calls log, in order.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.calls_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// `side` pointed at this project's tool directory.
    pub fn side(&self) -> Cmd {
        cli().args(&["--tool-dir"]).args(&[self.tool_dir()]).current_dir(&self.src())
    }
}
