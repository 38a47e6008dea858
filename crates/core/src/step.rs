// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step results and outcome classification.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// How a tool process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum StepExit {
    Normal(i32),
    /// Killed by a signal or otherwise terminated abnormally.
    Crashed,
}

/// Captured result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStepResult {
    pub exit: StepExit,
    /// Standard output followed by standard error.
    pub output: String,
    #[serde(skip)]
    pub duration: Duration,
}

impl BuildStepResult {
    pub fn new(exit: StepExit, output: impl Into<String>) -> Self {
        Self { exit, output: output.into(), duration: Duration::ZERO }
    }

    pub fn success(output: impl Into<String>) -> Self {
        Self::new(StepExit::Normal(0), output)
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.exit {
            StepExit::Normal(code) => Some(code),
            StepExit::Crashed => None,
        }
    }
}

/// Classified result of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "code", rename_all = "snake_case")]
pub enum StepOutcome {
    Crashed,
    Error,
    UnknownError(i32),
    WarningOk,
    Ok,
}

impl StepOutcome {
    /// Whether the pipeline stops after this step.
    pub fn halts(&self) -> bool {
        matches!(self, StepOutcome::Crashed | StepOutcome::Error | StepOutcome::UnknownError(_))
    }

    /// Status line text for a step run by `tool`.
    pub fn status_message(&self, tool: &str) -> String {
        match self {
            StepOutcome::Crashed => "Compiler Crashed".to_string(),
            StepOutcome::Error => format!("{tool} Error."),
            StepOutcome::UnknownError(code) => format!("{tool} Unknown Error: {code}"),
            StepOutcome::WarningOk => format!("{tool} Compiled OK with Warning(s)."),
            StepOutcome::Ok => tool.to_string(),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Crashed => f.write_str("crashed"),
            StepOutcome::Error => f.write_str("error"),
            StepOutcome::UnknownError(code) => write!(f, "unknown error ({code})"),
            StepOutcome::WarningOk => f.write_str("ok with warnings"),
            StepOutcome::Ok => f.write_str("ok"),
        }
    }
}

/// How captured output is judged for a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Classify through the pipeline's [`OutcomePolicy`].
    #[default]
    Sniff,
    /// Any captured output fails the step. Used for tools that print
    /// diagnostics without a failing exit code.
    Strict,
}

/// Classifies a finished step.
///
/// Implementations can replace the text heuristic with structured
/// diagnostics without touching the orchestrator.
pub trait OutcomePolicy: Send + Sync {
    fn classify(&self, result: &BuildStepResult) -> StepOutcome;
}

/// Exit code plus case-insensitive "error"/"warning" text matching.
///
/// Priority: crash, "error" in output, nonzero exit, "warning" in output,
/// otherwise ok. A success message that mentions "error" is misread as a
/// failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSniffPolicy;

impl OutcomePolicy for TextSniffPolicy {
    fn classify(&self, result: &BuildStepResult) -> StepOutcome {
        let code = match result.exit {
            StepExit::Crashed => return StepOutcome::Crashed,
            StepExit::Normal(code) => code,
        };
        let text = result.output.to_lowercase();
        if text.contains("error") {
            StepOutcome::Error
        } else if code != 0 {
            StepOutcome::UnknownError(code)
        } else if text.contains("warning") {
            StepOutcome::WarningOk
        } else {
            StepOutcome::Ok
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
