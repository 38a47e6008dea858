// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tag index records (`ctags --format=1` lines).
//!
//! Each line is `symbol<TAB>file<TAB>locator`. The locator is either a
//! 1-based line number or a search pattern such as `/^void foo() {$/`.
//! Lines starting with `!` are index metadata.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where a tag's definition lives inside its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Locator {
    /// 1-based line number as written by the generator.
    Line(usize),
    /// Literal text with delimiters, anchors and escapes removed.
    Pattern(String),
}

impl Locator {
    pub fn parse(field: &str) -> Self {
        let field = field.trim_end_matches(";\"").trim();
        if let Ok(n) = field.parse::<usize>() {
            return Locator::Line(n);
        }
        Locator::Pattern(normalize_pattern(field))
    }

    /// 0-based line index of the definition in `text`.
    ///
    /// Patterns are matched from the last line backward, so a definition that
    /// follows its forward declaration wins. This is a best-effort bias, not a
    /// guarantee.
    pub fn find_in(&self, text: &str) -> Option<usize> {
        match self {
            Locator::Line(n) => Some(n.saturating_sub(1)),
            Locator::Pattern(pattern) => {
                let lines: Vec<&str> = text.lines().collect();
                lines.iter().rposition(|line| line.contains(pattern.as_str()))
            }
        }
    }
}

fn normalize_pattern(field: &str) -> String {
    let mut p = field;
    for delim in ['/', '?'] {
        if p.len() >= 2 && p.starts_with(delim) && p.ends_with(delim) {
            p = &p[1..p.len() - 1];
            break;
        }
    }
    let p = p.strip_prefix('^').unwrap_or(p);
    let p = match p.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => p,
    };
    let mut out = String::with_capacity(p.len());
    let mut chars = p.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('/' | '\\' | '?' | '$' | '^')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// One parsed tag index line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    pub symbol: String,
    pub file: String,
    pub locator: Locator,
}

impl TagRecord {
    /// Parse a tag line. Metadata and lines with fewer than three fields
    /// yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        if line.starts_with('!') {
            return None;
        }
        let mut fields = line.splitn(3, '\t');
        let symbol = fields.next()?;
        let file = fields.next()?;
        let locator = fields.next()?;
        if symbol.is_empty() || file.is_empty() {
            return None;
        }
        Some(TagRecord {
            symbol: symbol.to_string(),
            file: file.to_string(),
            locator: Locator::parse(locator),
        })
    }

    /// Defining file, resolved against `base` when relative.
    pub fn path(&self, base: &Path) -> PathBuf {
        let file = Path::new(&self.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            base.join(file)
        }
    }
}

/// Whether a tag line defines exactly `symbol`.
///
/// The symbol must be followed by a space or tab, so `foo` never matches a
/// `foobar` line.
pub fn line_defines(line: &str, symbol: &str) -> bool {
    if symbol.is_empty() || line.starts_with('!') {
        return false;
    }
    match line.strip_prefix(symbol) {
        Some(rest) => rest.starts_with([' ', '\t']),
        None => false,
    }
}

/// A resolved jump target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLocation {
    pub file: PathBuf,
    /// 0-based line index.
    pub line: usize,
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
