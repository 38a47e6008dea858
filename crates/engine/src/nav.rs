// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jump-back stack for tag navigation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use side_core::TagLocation;

use crate::build_log::SESSION_DIR;

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corrupt tag stack {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Stack file for a project directory: `<dir>/.side/tagstack.json`.
pub fn session_path(project_dir: &Path) -> PathBuf {
    project_dir.join(SESSION_DIR).join("tagstack.json")
}

/// LIFO of locations the user jumped away from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStack {
    entries: Vec<TagLocation>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a location and return the new depth.
    pub fn push(&mut self, location: TagLocation) -> usize {
        self.entries.push(location);
        self.entries.len()
    }

    pub fn pop(&mut self) -> Option<TagLocation> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a saved stack. A missing file is an empty stack.
    pub fn load(path: &Path) -> Result<Self, NavError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(NavError::Io { path: path.to_path_buf(), source }),
        };
        serde_json::from_str(&text)
            .map_err(|source| NavError::Parse { path: path.to_path_buf(), source })
    }

    pub fn save(&self, path: &Path) -> Result<(), NavError> {
        let io = |source| NavError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| NavError::Parse { path: path.to_path_buf(), source })?;
        std::fs::write(path, json).map_err(io)
    }
}

#[cfg(test)]
#[path = "nav_tests.rs"]
mod tests;
