// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project manifest (`.side` file) reading and rendering.
//!
//! The manifest is line oriented:
//!
//! ```text
//! main.c
//! helper.c
//! blink.spin
//! shared.c -> /opt/lib/shared.c
//! -/opt/propgcc/include
//! >memtype=LMM
//! >-Wall
//! ```
//!
//! The first file entry is the main source. Lines starting with `>` are
//! option lines, lines starting with `-` are external references stored
//! verbatim. A file entry containing ` -> ` links a short name to an
//! absolute target that is never joined to the project directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Marker for option lines.
pub const OPTION_MARKER: char = '>';

/// Marker for external reference lines.
pub const REFERENCE_MARKER: char = '-';

/// Separator between a linked entry's short name and its target.
pub const FILE_LINK: &str = " -> ";

/// A source file listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestEntry {
    /// Path relative to the project directory.
    Local { name: String },
    /// Short name linked to an already-resolved target path.
    Linked { name: String, target: String },
}

impl ManifestEntry {
    fn parse(line: &str) -> Self {
        match line.split_once(FILE_LINK) {
            Some((name, target)) => ManifestEntry::Linked {
                name: name.trim().to_string(),
                target: target.trim().to_string(),
            },
            None => ManifestEntry::Local { name: line.to_string() },
        }
    }

    /// Name as shown in the project tree.
    pub fn name(&self) -> &str {
        match self {
            ManifestEntry::Local { name } | ManifestEntry::Linked { name, .. } => name,
        }
    }

    /// Path handed to external tools. Linked targets are used verbatim.
    pub fn resolve(&self, project_dir: &Path) -> PathBuf {
        match self {
            ManifestEntry::Local { name } => project_dir.join(name),
            ManifestEntry::Linked { target, .. } => PathBuf::from(target),
        }
    }

    /// Path relative to the build working directory.
    pub fn build_path(&self) -> &str {
        match self {
            ManifestEntry::Local { name } => name,
            ManifestEntry::Linked { target, .. } => target,
        }
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestEntry::Local { name } => write!(f, "{name}"),
            ManifestEntry::Linked { name, target } => write!(f, "{name}{FILE_LINK}{target}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    File(ManifestEntry),
    Reference(String),
}

/// Parsed project manifest.
///
/// Non-option lines keep their relative order; option lines are kept
/// separately and always rendered after them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    lines: Vec<Line>,
    options: Vec<String>,
}

impl Manifest {
    /// Parse manifest text. Blank lines are dropped.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Manifest::default();
        for raw in text.lines() {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                continue;
            }
            if let Some(option) = line.strip_prefix(OPTION_MARKER) {
                manifest.options.push(option.to_string());
            } else if line.starts_with(REFERENCE_MARKER) {
                manifest.lines.push(Line::Reference(line.to_string()));
            } else {
                manifest.lines.push(Line::File(ManifestEntry::parse(line)));
            }
        }
        manifest
    }

    /// A new manifest listing only the main file.
    pub fn with_main(main: &str) -> Self {
        Manifest {
            lines: vec![Line::File(ManifestEntry::parse(main))],
            options: Vec::new(),
        }
    }

    /// File entries in manifest order.
    pub fn files(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.lines.iter().filter_map(|l| match l {
            Line::File(entry) => Some(entry),
            Line::Reference(_) => None,
        })
    }

    /// The program's main source file.
    pub fn main_file(&self) -> Option<&ManifestEntry> {
        self.files().next()
    }

    /// Option lines without the leading marker.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// External reference lines, verbatim.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            Line::Reference(r) => Some(r.as_str()),
            Line::File(_) => None,
        })
    }

    pub fn contains_file(&self, name: &str) -> bool {
        self.files().any(|e| e.name() == name)
    }

    /// Append a file entry. Returns false if it was already listed.
    pub fn add_file(&mut self, name: &str) -> bool {
        let entry = ManifestEntry::parse(name);
        if self.contains_file(entry.name()) {
            return false;
        }
        self.lines.push(Line::File(entry));
        true
    }

    /// Remove a file entry. The main file is never removed.
    pub fn remove_file(&mut self, name: &str) -> bool {
        let main = self.main_file().map(|e| e.name().to_string());
        if main.as_deref() == Some(name) {
            return false;
        }
        let before = self.lines.len();
        self.lines.retain(|l| !matches!(l, Line::File(e) if e.name() == name));
        self.lines.len() != before
    }

    /// Replace the option set. Leading markers in `options` are tolerated.
    pub fn set_options<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options = options
            .into_iter()
            .map(|o| o.as_ref().trim_start_matches(OPTION_MARKER).to_string())
            .filter(|o| !o.is_empty())
            .collect();
    }

    /// Render back to manifest text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::File(entry) => out.push_str(&entry.to_string()),
                Line::Reference(r) => out.push_str(r),
            }
            out.push('\n');
        }
        for option in &self.options {
            out.push(OPTION_MARKER);
            out.push_str(option);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
