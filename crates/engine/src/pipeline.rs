// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build pipeline orchestrator.
//!
//! Runs the classified pre-link steps in order, then the link step, then
//! optionally the loader. The first halting step stops the pipeline; there
//! is no retry and no cancellation.
//!
//! ```text
//! Idle → Classifying → Invoking(i) → Aggregating(i) → Invoking(i+1) …
//!                                                   ↘ Halted
//!      … → LinkInvoking → LinkAggregating → Done
//!                                         ↘ LoaderInvoking → Done
//!                                         ↘ Halted
//! ```

use std::fmt;

use serde::Serialize;
use side_adapters::{NotifyAdapter, ToolAdapter, ToolError};
use side_core::{
    BuildError, BuildPlan, BuildStepResult, Language, OutcomePolicy, OutputPolicy, Project,
    StepExit, StepOutcome, TextSniffPolicy, ToolInvocation, ToolKind, ToolchainConfig,
};

use tracing::Instrument;

use crate::sink::BuildSink;

/// Orchestrator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum BuildPhase {
    Idle,
    Classifying,
    Invoking(usize),
    Aggregating(usize),
    LinkInvoking,
    LinkAggregating,
    LoaderInvoking,
    Done,
    Halted(String),
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildPhase::Idle => f.write_str("idle"),
            BuildPhase::Classifying => f.write_str("classifying"),
            BuildPhase::Invoking(i) => write!(f, "invoking step {i}"),
            BuildPhase::Aggregating(i) => write!(f, "aggregating step {i}"),
            BuildPhase::LinkInvoking => f.write_str("linking"),
            BuildPhase::LinkAggregating => f.write_str("aggregating link"),
            BuildPhase::LoaderInvoking => f.write_str("loading"),
            BuildPhase::Done => f.write_str("done"),
            BuildPhase::Halted(reason) => write!(f, "halted: {reason}"),
        }
    }
}

/// What the loader does with the linked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Load into RAM and run.
    Run,
    /// Write to EEPROM.
    Burn,
}

impl LoadMode {
    fn args(&self) -> &'static [&'static str] {
        match self {
            LoadMode::Run => &["-r"],
            LoadMode::Burn => &["-e"],
        }
    }
}

/// One finished tool invocation.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub tool: String,
    pub command: String,
    pub result: BuildStepResult,
    pub outcome: StepOutcome,
}

/// Everything a build run produced.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    /// Visited states, ending in a terminal state.
    pub phases: Vec<BuildPhase>,
    pub steps: Vec<StepRecord>,
    pub program_size: Option<u64>,
    #[serde(skip)]
    pub error: Option<BuildError>,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.state() == &BuildPhase::Done
    }

    /// Current (last visited) state.
    pub fn state(&self) -> &BuildPhase {
        self.phases.last().unwrap_or(&BuildPhase::Idle)
    }

    pub fn error(&self) -> Option<&BuildError> {
        self.error.as_ref()
    }

    fn enter(&mut self, phase: BuildPhase) {
        tracing::debug!(%phase, "build phase");
        self.phases.push(phase);
    }
}

struct Halt;

/// Drives external tools through a project's build.
pub struct Pipeline<T: ToolAdapter, N: NotifyAdapter> {
    config: ToolchainConfig,
    tools: T,
    notify: N,
    policy: Box<dyn OutcomePolicy>,
}

impl<T: ToolAdapter, N: NotifyAdapter> Pipeline<T, N> {
    pub fn new(config: ToolchainConfig, tools: T, notify: N) -> Self {
        Self { config, tools, notify, policy: Box::new(TextSniffPolicy) }
    }

    /// Replace the outcome classification policy.
    pub fn with_policy(mut self, policy: impl OutcomePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Build the project: pre-link steps, then link.
    pub async fn build(&self, project: &Project, sink: &dyn BuildSink) -> BuildReport {
        sink.begin();
        let mut report = BuildReport::default();
        report.enter(BuildPhase::Idle);
        let mut status = String::from("Building with");
        if self.build_steps(project, sink, &mut report, &mut status).await.is_ok() {
            status.push_str(" done.");
            sink.status(&status);
            report.enter(BuildPhase::Done);
        }
        report
    }

    /// Build, then hand the image to the loader.
    pub async fn build_and_load(
        &self,
        project: &Project,
        mode: LoadMode,
        sink: &dyn BuildSink,
    ) -> BuildReport {
        sink.begin();
        let mut report = BuildReport::default();
        report.enter(BuildPhase::Idle);
        let mut status = String::from("Building with");

        if let Err(e) = self.config.check_load() {
            self.halt(&mut report, sink, e, "").await;
            return report;
        }
        if self.build_steps(project, sink, &mut report, &mut status).await.is_err() {
            return report;
        }

        report.enter(BuildPhase::LoaderInvoking);
        status.push_str(" Loading ... ");
        sink.status(&status);
        let invocation = self.loader_invocation(project, mode);
        if self.run_step(&invocation, OutputPolicy::Sniff, sink, &mut report, &mut status).await.is_ok()
        {
            status.push_str(" done.");
            sink.status(&status);
            report.enter(BuildPhase::Done);
        }
        report
    }

    async fn build_steps(
        &self,
        project: &Project,
        sink: &dyn BuildSink,
        report: &mut BuildReport,
        status: &mut String,
    ) -> Result<(), Halt> {
        sink.note(&format!("Project Directory: {}", project.dir().display()));
        sink.status(status);

        if let Err(e) = self.config.check_build() {
            return Err(self.halt(report, sink, e, "").await);
        }
        if let Err(e) = project.main_file() {
            return Err(self.halt(report, sink, e, "").await);
        }

        report.enter(BuildPhase::Classifying);
        let plan = BuildPlan::classify(&project.build_entries());
        tracing::info!(
            project = %project.path().display(),
            steps = plan.steps.len(),
            link_inputs = plan.link_inputs.len(),
            "build plan ready"
        );

        for (i, step) in plan.steps.iter().enumerate() {
            report.enter(BuildPhase::Invoking(i));
            let invocation = ToolInvocation::new(
                self.config.program(step.tool),
                step.args.clone(),
                project.dir(),
            );
            self.run_step(&invocation, step.policy, sink, report, status).await?;
        }

        report.enter(BuildPhase::LinkInvoking);
        let options = project.options();
        let compiler = match options.compiler {
            Language::C => self.config.program(ToolKind::Compiler),
            Language::Cpp => self.config.program_named(&self.config.cpp_compiler()),
        };
        let invocation = ToolInvocation::new(compiler, plan.link_args(&options), project.dir());
        self.run_step(&invocation, OutputPolicy::Sniff, sink, report, status).await?;

        if let Ok(meta) = std::fs::metadata(project.output_path()) {
            let bytes = meta.len();
            report.program_size = Some(bytes);
            sink.program_size(bytes);
            sink.note(&format!("Compiled {}K Bytes", bytes / 1000));
        }
        Ok(())
    }

    fn loader_invocation(&self, project: &Project, mode: LoadMode) -> ToolInvocation {
        let mut args = Vec::new();
        if let Some(board) = &self.config.board {
            args.push("-b".to_string());
            args.push(board.clone());
        }
        if let Some(port) = &self.config.port {
            args.push("-p".to_string());
            args.push(port.clone());
        }
        if let Some(includes) = &self.config.loader_includes {
            args.push("-I".to_string());
            args.push(includes.display().to_string());
        }
        args.push(project.output_path().display().to_string());
        args.extend(mode.args().iter().map(|a| a.to_string()));
        let cwd = self.config.loader_dir().unwrap_or(project.dir());
        ToolInvocation::new(self.config.program(ToolKind::Loader), args, cwd)
    }

    /// Invoke one tool and aggregate its result.
    async fn run_step(
        &self,
        invocation: &ToolInvocation,
        policy: OutputPolicy,
        sink: &dyn BuildSink,
        report: &mut BuildReport,
        status: &mut String,
    ) -> Result<StepOutcome, Halt> {
        let tool = invocation.tool_name();
        let command = invocation.command_line();

        sink.progress(0);
        sink.progress(5);
        sink.flush_buffers();
        sink.progress(10);
        sink.command(&tool, &command);
        sink.progress(15);

        let span = tracing::info_span!("build.step", tool = %tool);
        let result = match self.tools.invoke(invocation).instrument(span).await {
            Ok(result) => result,
            Err(e) => {
                let err = match e {
                    ToolError::LaunchFailed { source, .. } => BuildError::ProcessLaunchFailed {
                        tool: tool.clone(),
                        message: source.to_string(),
                    },
                    ToolError::DidNotFinish { source, .. } => BuildError::ProcessDidNotFinish {
                        tool: tool.clone(),
                        message: source.to_string(),
                    },
                };
                return Err(self.halt(report, sink, err, "").await);
            }
        };
        sink.progress(50);
        sink.progress(60);

        if !result.output.is_empty() {
            sink.output(&tool, &result.output);
        }

        let aggregating = match report.state() {
            BuildPhase::Invoking(i) => Some(BuildPhase::Aggregating(*i)),
            BuildPhase::LinkInvoking => Some(BuildPhase::LinkAggregating),
            _ => None,
        };
        if let Some(phase) = aggregating {
            report.enter(phase);
        }

        // A crash outranks stray output on strict steps.
        let strict_failure = policy == OutputPolicy::Strict
            && result.exit != StepExit::Crashed
            && !result.output.trim().is_empty();
        let outcome = if strict_failure { StepOutcome::Error } else { self.policy.classify(&result) };
        tracing::info!(tool = %tool, %outcome, exit = ?result.exit, "step finished");

        let output = result.output.clone();
        report.steps.push(StepRecord { tool: tool.clone(), command, result, outcome });

        if outcome.halts() {
            sink.status(&outcome.status_message(&tool));
            let err = match outcome {
                StepOutcome::Crashed => BuildError::ToolCrashed { tool },
                StepOutcome::UnknownError(code) => BuildError::ToolReportedUnknownExit { tool, code },
                _ if strict_failure => BuildError::ToolReportedOutput { tool },
                _ => BuildError::ToolReportedError { tool },
            };
            return Err(self.halt(report, sink, err, &output).await);
        }

        match outcome {
            StepOutcome::WarningOk => *status = outcome.status_message(&tool),
            _ => {
                status.push(' ');
                status.push_str(&tool);
            }
        }
        sink.status(status);
        sink.progress(100);
        Ok(outcome)
    }

    /// Enter `Halted`, tell the user, and record the error.
    async fn halt(
        &self,
        report: &mut BuildReport,
        sink: &dyn BuildSink,
        err: BuildError,
        output: &str,
    ) -> Halt {
        sink.progress(100);
        tracing::warn!(error = %err, tool = err.tool().unwrap_or("-"), "build halted");
        let title = match &err {
            BuildError::ToolCrashed { .. } => "Compiler Crashed",
            _ => "Build Error",
        };
        let message =
            if output.is_empty() { err.to_string() } else { format!("{err}\n{output}") };
        if let Err(e) = self.notify.notify(title, &message).await {
            tracing::warn!(error = %e, "failed to notify");
        }
        if !matches!(
            &err,
            BuildError::ToolCrashed { .. }
                | BuildError::ToolReportedError { .. }
                | BuildError::ToolReportedUnknownExit { .. }
                | BuildError::ToolReportedOutput { .. }
        ) {
            sink.status(&err.to_string());
        }
        report.enter(BuildPhase::Halted(err.to_string()));
        report.error = Some(err);
        Halt
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
