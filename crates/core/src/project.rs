// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Active project session: the single owner of a loaded manifest.

use std::path::{Path, PathBuf};

use crate::action::{short_name, LINK_OUTPUT};
use crate::error::BuildError;
use crate::manifest::{Manifest, ManifestEntry};
use crate::options::ProjectOptions;

/// Manifest file extension.
pub const PROJECT_EXTENSION: &str = "side";

/// Generated files that are never copied into a project.
const GENERATED_EXTENSIONS: [&str; 5] = ["cog", "dat", "o", "out", "side"];

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(transparent)]
    Open(#[from] BuildError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is the main file and cannot be removed")]
    MainFile(String),

    #[error("{0} is not part of the project")]
    NotListed(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ProjectError + '_ {
    move |source| ProjectError::Io { path: path.to_path_buf(), source }
}

#[derive(Debug, Clone)]
pub struct Project {
    path: PathBuf,
    dir: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Read a manifest from disk.
    pub fn open(path: &Path) -> Result<Self, BuildError> {
        if path.as_os_str().is_empty() {
            return Err(BuildError::ManifestUnreadable {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty path"),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| {
            BuildError::ManifestUnreadable { path: path.to_path_buf(), source }
        })?;
        Ok(Self::from_manifest(path, Manifest::parse(&text)))
    }

    pub fn from_manifest(path: &Path, manifest: Manifest) -> Self {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self { path: path.to_path_buf(), dir, manifest }
    }

    /// Open or create the project whose main file is `main_source`.
    ///
    /// The manifest is `<stem>.side` beside the source and initially lists
    /// only the source's file name.
    pub fn create(main_source: &Path) -> Result<Self, ProjectError> {
        let stem = main_source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let main_name = main_source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = main_source.with_file_name(format!("{stem}.{PROJECT_EXTENSION}"));
        if path.exists() {
            return Ok(Self::open(&path)?);
        }
        let project = Self::from_manifest(&path, Manifest::with_main(&main_name));
        project.save()?;
        tracing::info!(path = %path.display(), main = %main_name, "created project");
        Ok(project)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Project source directory; working directory for build steps.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn main_file(&self) -> Result<&ManifestEntry, BuildError> {
        self.manifest
            .main_file()
            .ok_or_else(|| BuildError::NoMainFile { path: self.path.clone() })
    }

    pub fn options(&self) -> ProjectOptions {
        ProjectOptions::from_lines(self.manifest.options())
    }

    pub fn set_options(&mut self, options: &ProjectOptions) {
        self.manifest.set_options(options.to_lines());
    }

    /// Entries as passed to build tools, relative to [`Project::dir`].
    pub fn build_entries(&self) -> Vec<String> {
        self.manifest.files().map(|e| e.build_path().to_string()).collect()
    }

    /// Absolute-or-project-relative paths of every listed file.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.manifest.files().map(|e| e.resolve(&self.dir)).collect()
    }

    /// Linked program image.
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(LINK_OUTPUT)
    }

    /// Add a file. Files outside the project directory are copied in unless
    /// they are generated artifacts. Returns false when already listed.
    pub fn add_file(&mut self, source: &Path) -> Result<bool, ProjectError> {
        let name = short_name(&source.to_string_lossy()).to_string();
        if self.manifest.contains_file(&name) {
            return Ok(false);
        }
        let dest = self.dir.join(&name);
        let inside = source.parent().map(|p| same_dir(p, &self.dir)).unwrap_or(true);
        if !inside && !is_generated(&name) && source.exists() {
            std::fs::copy(source, &dest).map_err(io_err(&dest))?;
            tracing::debug!(from = %source.display(), to = %dest.display(), "copied into project");
        }
        Ok(self.manifest.add_file(&name))
    }

    pub fn remove_file(&mut self, name: &str) -> Result<(), ProjectError> {
        if self.manifest.main_file().map(|e| e.name()) == Some(name) {
            return Err(ProjectError::MainFile(name.to_string()));
        }
        if !self.manifest.remove_file(name) {
            return Err(ProjectError::NotListed(name.to_string()));
        }
        Ok(())
    }

    /// Rewrite the manifest file.
    pub fn save(&self) -> Result<(), ProjectError> {
        std::fs::write(&self.path, self.manifest.render()).map_err(io_err(&self.path))
    }
}

fn is_generated(name: &str) -> bool {
    match Path::new(name).extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            GENERATED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a.as_os_str().is_empty() {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
