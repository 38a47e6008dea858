// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console rendering of build transcripts and query results.

use clap::ValueEnum;
use parking_lot::Mutex;
use serde::Serialize;
use side_core::TagLocation;
use side_engine::BuildSink;

use crate::color;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints the build transcript to stdout and remembers the status line.
///
/// In JSON mode nothing is echoed; the caller prints the report instead.
pub struct ConsoleSink {
    echo: bool,
    status: Mutex<Option<String>>,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { echo: format == OutputFormat::Text, status: Mutex::new(None) }
    }

    pub fn last_status(&self) -> Option<String> {
        self.status.lock().clone()
    }
}

impl BuildSink for ConsoleSink {
    fn command(&self, _tool: &str, line: &str) {
        if self.echo {
            println!("{}", color::literal(line));
        }
    }

    fn output(&self, _tool: &str, text: &str) {
        if self.echo {
            print!("{}", with_newline(text));
        }
    }

    fn note(&self, text: &str) {
        if self.echo {
            println!("{}", color::context(text));
        }
    }

    fn status(&self, text: &str) {
        tracing::debug!(status = text, "status");
        *self.status.lock() = Some(text.to_string());
    }
}

fn with_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

/// `file:line` with a 1-based line, as editors expect.
pub fn format_location(location: &TagLocation) -> String {
    format!("{}:{}", location.file.display(), location.line + 1)
}

/// Color a final status line by how the build ended.
pub fn format_status(status: &str, succeeded: bool) -> String {
    if !succeeded {
        color::error(status)
    } else if status.contains("Warning") {
        color::warning(status)
    } else {
        color::header(status)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
