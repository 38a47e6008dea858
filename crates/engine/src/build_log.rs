// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build transcript on disk, restarted by every build.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::time_fmt::format_utc_now;

/// Session directory inside a project.
pub const SESSION_DIR: &str = ".side";

/// Transcript path for a project directory: `<dir>/.side/build.log`.
pub fn build_log_path(project_dir: &Path) -> PathBuf {
    project_dir.join(SESSION_DIR).join("build.log")
}

/// Logger for build transcripts.
///
/// Writes human-readable timestamped lines:
///   `2026-01-30T08:14:09Z [propeller-elf-gcc] message`
///
/// Each `append()` call opens, writes, and closes the file.
pub struct BuildLogger {
    path: PathBuf,
}

impl BuildLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a log line.
    ///
    /// Failures are logged via tracing but do not propagate; a broken log
    /// file must not break the build.
    pub fn append(&self, tool: &str, message: &str) {
        if let Err(e) = self.write_line(tool, message) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write build log");
        }
    }

    /// Empty the transcript so it holds only the next build.
    pub fn truncate(&self) {
        if let Err(e) = self.reset() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to reset build log");
        }
    }

    /// Append captured tool output as a fenced block.
    ///
    /// Format:
    /// ```text
    /// {timestamp} [{tool}] ```{label}
    /// {content}
    /// {timestamp} [{tool}] ```
    /// ```
    pub fn append_fenced(&self, tool: &str, label: &str, content: &str) {
        if let Err(e) = self.write_fenced(tool, label, content) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write build log");
        }
    }

    fn open(&self) -> std::io::Result<fs::File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }

    fn reset(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
        Ok(())
    }

    fn write_fenced(&self, tool: &str, label: &str, content: &str) -> std::io::Result<()> {
        let mut file = self.open()?;
        writeln!(file, "{} [{}] ```{}", format_utc_now(), tool, label)?;
        write!(file, "{}", content)?;
        if !content.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{} [{}] ```", format_utc_now(), tool)?;
        Ok(())
    }

    fn write_line(&self, tool: &str, message: &str) -> std::io::Result<()> {
        let mut file = self.open()?;
        writeln!(file, "{} [{}] {}", format_utc_now(), tool, message)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "build_log_tests.rs"]
mod tests;
