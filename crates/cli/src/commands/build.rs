// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side build`, `side run`, `side burn`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use side_adapters::{DesktopNotifyAdapter, NoopNotifyAdapter, NotifyAdapter, ProcessToolAdapter};
use side_core::{BuildError, Project, ToolchainConfig};
use side_engine::{
    build_log_path, BuildLogger, BuildPhase, BuildReport, LoadMode, Pipeline, StepRecord,
};

use crate::env;
use crate::exit_error::ExitError;
use crate::output::{self, ConsoleSink, OutputFormat};

#[derive(Args)]
pub struct BuildArgs {
    /// Project manifest (`.side` file)
    pub project: PathBuf,

    #[arg(long = "output", short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(Args)]
pub struct LoadArgs {
    /// Project manifest (`.side` file)
    pub project: PathBuf,

    /// Board type passed to the loader
    #[arg(long)]
    pub board: Option<String>,

    /// Serial port of the board
    #[arg(long)]
    pub port: Option<String>,

    #[arg(long = "output", short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    succeeded: bool,
    state: &'a BuildPhase,
    phases: &'a [BuildPhase],
    steps: &'a [StepRecord],
    program_size: Option<u64>,
    status: Option<String>,
    error: Option<String>,
    failed_tool: Option<&'a str>,
}

pub async fn handle_build(args: BuildArgs, config: ToolchainConfig) -> Result<()> {
    run(config, &args.project, None, args.output).await
}

pub async fn handle_load(args: LoadArgs, mode: LoadMode, mut config: ToolchainConfig) -> Result<()> {
    if args.board.is_some() {
        config.board = args.board;
    }
    if args.port.is_some() {
        config.port = args.port;
    }
    run(config, &args.project, Some(mode), args.output).await
}

async fn run(
    config: ToolchainConfig,
    manifest: &std::path::Path,
    mode: Option<LoadMode>,
    format: OutputFormat,
) -> Result<()> {
    let project =
        Project::open(&env::absolute(manifest)).map_err(|e| ExitError::halted(e.to_string()))?;
    if config.notify {
        execute(config, DesktopNotifyAdapter::new(), &project, mode, format).await
    } else {
        execute(config, NoopNotifyAdapter, &project, mode, format).await
    }
}

async fn execute<N: NotifyAdapter>(
    config: ToolchainConfig,
    notify: N,
    project: &Project,
    mode: Option<LoadMode>,
    format: OutputFormat,
) -> Result<()> {
    let pipeline = Pipeline::new(config, ProcessToolAdapter::new(), notify);
    let sink = (ConsoleSink::new(format), BuildLogger::new(build_log_path(project.dir())));

    let report = match mode {
        Some(mode) => pipeline.build_and_load(project, mode, &sink).await,
        None => pipeline.build(project, &sink).await,
    };
    let status = sink.0.last_status();
    report_result(&report, status, format)
}

fn report_result(report: &BuildReport, status: Option<String>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(status) = &status {
                println!("{}", output::format_status(status, report.succeeded()));
            }
        }
        OutputFormat::Json => output::print_json(&ReportJson {
            succeeded: report.succeeded(),
            state: report.state(),
            phases: &report.phases,
            steps: &report.steps,
            program_size: report.program_size,
            status,
            error: report.error().map(|e| e.to_string()),
            failed_tool: report.error().and_then(BuildError::tool),
        })?,
    }
    match report.error() {
        Some(err) => Err(ExitError::halted(err.to_string()).into()),
        None => Ok(()),
    }
}
