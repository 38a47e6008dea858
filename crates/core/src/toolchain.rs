// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Toolchain configuration and tool invocations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::action::ToolKind;
use crate::error::BuildError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Paths and names of the external toolchain.
///
/// Passed explicitly to the orchestrator and the tag index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Directory holding the toolchain binaries. Tools are looked up on
    /// `PATH` when unset.
    pub tool_dir: Option<PathBuf>,
    pub compiler: String,
    pub spin_compiler: String,
    pub assembler: String,
    pub objcopy: String,
    pub loader: String,
    pub ctags: String,
    /// Board configuration folder handed to the loader (`-I`).
    pub loader_includes: Option<PathBuf>,
    pub board: Option<String>,
    pub port: Option<String>,
    /// Send a desktop notification when a build halts.
    pub notify: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            tool_dir: None,
            compiler: "propeller-elf-gcc".to_string(),
            spin_compiler: "bstc".to_string(),
            assembler: "propeller-elf-as".to_string(),
            objcopy: "propeller-elf-objcopy".to_string(),
            loader: "propeller-load".to_string(),
            ctags: "ctags".to_string(),
            loader_includes: None,
            board: None,
            port: None,
            notify: false,
        }
    }
}

impl ToolchainConfig {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no toolchain config, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Default config location: `<config dir>/side/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("side").join("config.toml"))
    }

    /// Configured program name for a tool.
    pub fn name(&self, tool: ToolKind) -> &str {
        match tool {
            ToolKind::SpinCompiler => &self.spin_compiler,
            ToolKind::ObjCopy => &self.objcopy,
            ToolKind::Assembler => &self.assembler,
            ToolKind::Compiler => &self.compiler,
            ToolKind::Loader => &self.loader,
            ToolKind::TagGenerator => &self.ctags,
        }
    }

    /// Program path for a tool, inside `tool_dir` when one is configured.
    pub fn program(&self, tool: ToolKind) -> PathBuf {
        self.program_named(self.name(tool))
    }

    /// Program path for an explicit name.
    pub fn program_named(&self, name: &str) -> PathBuf {
        let file = format!("{name}{}", std::env::consts::EXE_SUFFIX);
        match &self.tool_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }

    /// Compiler driver for C++ projects: the trailing `gcc` component of
    /// the compiler name becomes `c++`.
    pub fn cpp_compiler(&self) -> String {
        match self.compiler.rfind('-') {
            Some(i) => format!("{}c++", &self.compiler[..=i]),
            None => "c++".to_string(),
        }
    }

    /// Working directory for the loader.
    pub fn loader_dir(&self) -> Option<&Path> {
        self.tool_dir.as_deref()
    }

    /// Preconditions for any build step.
    pub fn check_build(&self) -> Result<(), BuildError> {
        if self.compiler.trim().is_empty() {
            return Err(BuildError::ToolchainIncomplete(
                "no compiler configured; set `compiler` in the toolchain config".to_string(),
            ));
        }
        Ok(())
    }

    /// Preconditions for the loader.
    pub fn check_load(&self) -> Result<(), BuildError> {
        if self.loader_includes.is_none() {
            return Err(BuildError::ToolchainIncomplete(
                "no loader folder configured; set `loader_includes`".to_string(),
            ));
        }
        if self.board.is_none() {
            return Err(BuildError::ToolchainIncomplete("no board selected".to_string()));
        }
        if self.port.is_none() {
            return Err(BuildError::ToolchainIncomplete("no serial port selected".to_string()));
        }
        Ok(())
    }
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args, cwd: cwd.into() }
    }

    /// Short program name for status messages.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Command line as written to the build log.
    pub fn command_line(&self) -> String {
        let mut line = self.tool_name();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[cfg(test)]
#[path = "toolchain_tests.rs"]
mod tests;
