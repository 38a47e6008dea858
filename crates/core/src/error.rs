// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build pipeline error taxonomy.
//!
//! Every variant halts the pipeline. Warnings are not errors; they surface as
//! [`crate::StepOutcome::WarningOk`].

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot read project manifest {}: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("project manifest {} lists no main file", path.display())]
    NoMainFile { path: PathBuf },

    #[error("toolchain incomplete: {0}")]
    ToolchainIncomplete(String),

    #[error("{tool} could not start: {message}")]
    ProcessLaunchFailed { tool: String, message: String },

    #[error("{tool} did not finish: {message}")]
    ProcessDidNotFinish { tool: String, message: String },

    #[error("{tool} crashed")]
    ToolCrashed { tool: String },

    #[error("{tool} reported an error")]
    ToolReportedError { tool: String },

    #[error("{tool} unknown error: {code}")]
    ToolReportedUnknownExit { tool: String, code: i32 },

    #[error("{tool} produced unexpected output")]
    ToolReportedOutput { tool: String },
}

impl BuildError {
    /// Name of the tool the failure is attributed to, if any.
    pub fn tool(&self) -> Option<&str> {
        match self {
            BuildError::ProcessLaunchFailed { tool, .. }
            | BuildError::ProcessDidNotFinish { tool, .. }
            | BuildError::ToolCrashed { tool }
            | BuildError::ToolReportedError { tool }
            | BuildError::ToolReportedUnknownExit { tool, .. }
            | BuildError::ToolReportedOutput { tool } => Some(tool),
            BuildError::ManifestUnreadable { .. }
            | BuildError::NoMainFile { .. }
            | BuildError::ToolchainIncomplete(_) => None,
        }
    }
}
