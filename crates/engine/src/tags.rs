// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Symbol tag index: generation through `ctags` and lookup.

use std::path::{Path, PathBuf};

use side_adapters::{ToolAdapter, ToolError};
use side_core::{
    line_defines, BuildError, Project, StepExit, TagLocation, TagRecord, ToolInvocation, ToolKind,
    ToolchainConfig,
};
use tracing::Instrument;

/// Index file name inside the project directory.
pub const TAG_FILE: &str = "tags";

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("tag generator not found: {}", .0.display())]
    GeneratorMissing(PathBuf),

    #[error("cannot read project manifest {}: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Launch(#[from] ToolError),

    #[error("tag generator crashed")]
    GeneratorCrashed,

    #[error("no tag index at {}; run `side tags build` first", .0.display())]
    TagIndexMissing(PathBuf),

    #[error("tag not found: {0}")]
    TagNotFound(String),

    #[error("tagged file does not exist: {}", .0.display())]
    SymbolFileMissing(PathBuf),

    #[error("malformed tag line: {0}")]
    MalformedTag(String),
}

impl TagError {
    /// Whether this is a lookup miss rather than an operational failure.
    pub fn is_miss(&self) -> bool {
        matches!(self, TagError::TagNotFound(_) | TagError::TagIndexMissing(_))
    }
}

/// Tag index of one project directory.
pub struct TagIndex<T: ToolAdapter> {
    generator: PathBuf,
    tools: T,
    dir: PathBuf,
}

impl<T: ToolAdapter> TagIndex<T> {
    pub fn new(config: &ToolchainConfig, tools: T, project_dir: impl Into<PathBuf>) -> Self {
        Self { generator: config.program(ToolKind::TagGenerator), tools, dir: project_dir.into() }
    }

    /// Whether the generator is available. Lookup works without it.
    pub fn enabled(&self) -> bool {
        self.tools.exists(&self.generator)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(TAG_FILE)
    }

    /// Regenerate the index for every file the manifest lists.
    ///
    /// Returns the generator's exit code.
    pub async fn build_index(&self, manifest: &Path) -> Result<i32, TagError> {
        if !self.enabled() {
            return Err(TagError::GeneratorMissing(self.generator.clone()));
        }
        let project = Project::open(manifest).map_err(|e| match e {
            BuildError::ManifestUnreadable { path, source } => {
                TagError::ManifestUnreadable { path, source }
            }
            other => TagError::ManifestUnreadable {
                path: manifest.to_path_buf(),
                source: std::io::Error::other(other.to_string()),
            },
        })?;

        let mut args = vec!["--format=1".to_string()];
        args.extend(project.source_paths().iter().map(|p| p.display().to_string()));
        let invocation = ToolInvocation::new(&self.generator, args, project.dir());

        let span = tracing::info_span!("tags.build", project = %manifest.display());
        let result = self.tools.invoke(&invocation).instrument(span.clone()).await?;
        match result.exit {
            StepExit::Normal(code) => {
                tracing::info!(parent: &span, code, "tag index generated");
                Ok(code)
            }
            StepExit::Crashed => Err(TagError::GeneratorCrashed),
        }
    }

    /// First index line defining exactly `symbol`.
    pub fn find_tag(&self, symbol: &str) -> Option<String> {
        let text = read_lossy(&self.index_path()).ok()?;
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .find(|l| line_defines(l, symbol))
            .map(str::to_string)
    }

    /// Resolve a tag line to a file and 0-based line.
    pub fn resolve_location(&self, tag_line: &str) -> Result<TagLocation, TagError> {
        let record =
            TagRecord::parse(tag_line).ok_or_else(|| TagError::MalformedTag(tag_line.to_string()))?;
        let file = record.path(&self.dir);
        let text = read_lossy(&file).map_err(|_| TagError::SymbolFileMissing(file.clone()))?;
        let line = record
            .locator
            .find_in(&text)
            .ok_or_else(|| TagError::TagNotFound(record.symbol.clone()))?;
        tracing::debug!(symbol = %record.symbol, file = %file.display(), line, "tag resolved");
        Ok(TagLocation { file, line })
    }

    /// `find_tag` then `resolve_location`.
    pub fn lookup(&self, symbol: &str) -> Result<TagLocation, TagError> {
        let index = self.index_path();
        if !index.is_file() {
            return Err(TagError::TagIndexMissing(index));
        }
        let line = self.find_tag(symbol).ok_or_else(|| TagError::TagNotFound(symbol.to_string()))?;
        self.resolve_location(&line)
    }
}

/// Sources and indexes are often Latin-1; undecodable bytes become U+FFFD.
fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
