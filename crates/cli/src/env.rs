// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Toolchain config resolution from flags, environment and the config file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use side_core::ToolchainConfig;

pub const CONFIG_VAR: &str = "SIDE_CONFIG";
pub const TOOL_DIR_VAR: &str = "SIDE_TOOL_DIR";
pub const BOARD_VAR: &str = "SIDE_BOARD";
pub const PORT_VAR: &str = "SIDE_PORT";
pub const LOG_VAR: &str = "SIDE_LOG";

/// Config file location: `--config`, then `SIDE_CONFIG`, then the user
/// config directory.
pub fn config_path(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    match std::env::var_os(CONFIG_VAR) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => ToolchainConfig::default_path(),
    }
}

/// Apply `SIDE_*` overrides. Empty values are ignored.
pub fn apply_env(config: &mut ToolchainConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
    if let Some(dir) = var(TOOL_DIR_VAR) {
        config.tool_dir = Some(PathBuf::from(dir));
    }
    if let Some(board) = var(BOARD_VAR) {
        config.board = Some(board);
    }
    if let Some(port) = var(PORT_VAR) {
        config.port = Some(port);
    }
}

/// Resolve the effective toolchain config. Flags win over the environment,
/// which wins over the file.
pub fn load_config(
    config_flag: Option<&Path>,
    tool_dir_flag: Option<&Path>,
) -> Result<ToolchainConfig> {
    let mut config = match config_path(config_flag) {
        Some(path) => ToolchainConfig::load(&path)?,
        None => ToolchainConfig::default(),
    };
    apply_env(&mut config, |name| std::env::var(name).ok());
    if let Some(dir) = tool_dir_flag {
        config.tool_dir = Some(dir.to_path_buf());
    }
    config.tool_dir = config.tool_dir.map(|dir| absolute(&dir));
    tracing::debug!(?config, "toolchain config resolved");
    Ok(config)
}

/// Anchor a relative path at the current directory. Tools run with other
/// working directories, so paths handed to them must not be relative.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
