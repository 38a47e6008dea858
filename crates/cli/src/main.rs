// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `side`: build, load and navigate Propeller projects from the terminal.

mod color;
mod commands;
mod env;
mod exit_error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use side_engine::LoadMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{build, project, tags};
use crate::exit_error::ExitError;

#[derive(Parser)]
#[command(
    name = "side",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SIDE_BUILD_HASH"), ")"),
    about = "Build, load and navigate Propeller C/Spin projects",
    styles = color::styles(),
)]
struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', global = true)]
    directory: Option<PathBuf>,

    /// Directory holding the toolchain binaries
    #[arg(long, global = true)]
    tool_dir: Option<PathBuf>,

    /// Toolchain config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and link a project
    Build(build::BuildArgs),
    /// Build, then load into RAM and run
    Run(build::LoadArgs),
    /// Build, then write to EEPROM
    Burn(build::LoadArgs),
    /// Create and edit project manifests
    Project(project::ProjectArgs),
    /// Symbol index and navigation
    Tags(tags::TagsArgs),
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(env::LOG_VAR)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", color::error(&exit.message));
                }
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("{} {err:#}", color::error("error:"));
                std::process::exit(1);
            }
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = || env::load_config(cli.config.as_deref(), cli.tool_dir.as_deref());
    match command {
        Commands::Build(args) => build::handle_build(args, config()?).await,
        Commands::Run(args) => build::handle_load(args, LoadMode::Run, config()?).await,
        Commands::Burn(args) => build::handle_load(args, LoadMode::Burn, config()?).await,
        Commands::Project(args) => project::handle(args.command),
        Commands::Tags(args) => tags::handle(args.command, &config()?).await,
    }
}
