// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side tags`: symbol index and jump-back navigation.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use side_adapters::ProcessToolAdapter;
use side_core::{Project, TagLocation, ToolchainConfig};
use side_engine::{session_path, TagError, TagIndex, TagStack};

use crate::color;
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Subcommand)]
pub enum TagsCommand {
    /// Regenerate the tag index for every project file
    Build { project: PathBuf },
    /// Look up a symbol's definition
    Find {
        project: PathBuf,
        symbol: String,
        #[arg(long = "output", short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Resolve a symbol and push a location onto the jump-back stack
    Jump {
        project: PathBuf,
        symbol: String,
        /// Location to return to (`file:line`); the target is pushed when omitted
        #[arg(long, value_parser = parse_location)]
        from: Option<TagLocation>,
    },
    /// Pop the most recent location off the jump-back stack
    Back { project: PathBuf },
    /// Empty the jump-back stack
    Clear { project: PathBuf },
}

#[derive(Serialize)]
struct FindJson<'a> {
    symbol: &'a str,
    tag: &'a str,
    location: &'a TagLocation,
}

pub async fn handle(command: TagsCommand, config: &ToolchainConfig) -> Result<()> {
    match command {
        TagsCommand::Build { project } => {
            let index = index_for(config, &project)?;
            let code = index.build_index(&env::absolute(&project)).await?;
            if code != 0 {
                return Err(ExitError::halted(format!("tag generator exited with code {code}")).into());
            }
            println!("Tags written to {}", color::literal(&index.index_path().display().to_string()));
        }
        TagsCommand::Find { project, symbol, output } => {
            let index = index_for(config, &project)?;
            let tag = index.find_tag(&symbol).ok_or_else(|| {
                let path = index.index_path();
                if path.is_file() {
                    lookup_error(TagError::TagNotFound(symbol.clone()))
                } else {
                    lookup_error(TagError::TagIndexMissing(path))
                }
            })?;
            let location = index.resolve_location(&tag).map_err(lookup_error)?;
            match output {
                OutputFormat::Text => println!("{}", output::format_location(&location)),
                OutputFormat::Json => {
                    output::print_json(&FindJson { symbol: &symbol, tag: &tag, location: &location })?
                }
            }
        }
        TagsCommand::Jump { project, symbol, from } => {
            let index = index_for(config, &project)?;
            let location = index.lookup(&symbol).map_err(lookup_error)?;
            let path = session_path(&project_dir(&project)?);
            let mut stack = TagStack::load(&path)?;
            let depth = stack.push(from.unwrap_or_else(|| location.clone()));
            stack.save(&path)?;
            tracing::info!(%symbol, depth, "jumped to tag");
            println!("{}", output::format_location(&location));
        }
        TagsCommand::Back { project } => {
            let path = session_path(&project_dir(&project)?);
            let mut stack = TagStack::load(&path)?;
            let location = stack.pop().ok_or_else(|| ExitError::miss("tag stack is empty"))?;
            stack.save(&path)?;
            println!("{}", output::format_location(&location));
        }
        TagsCommand::Clear { project } => {
            let path = session_path(&project_dir(&project)?);
            let mut stack = TagStack::load(&path)?;
            stack.clear();
            stack.save(&path)?;
            println!("Tag stack cleared");
        }
    }
    Ok(())
}

fn project_dir(manifest: &Path) -> Result<PathBuf> {
    Ok(Project::open(&env::absolute(manifest))?.dir().to_path_buf())
}

fn index_for(config: &ToolchainConfig, manifest: &Path) -> Result<TagIndex<ProcessToolAdapter>> {
    Ok(TagIndex::new(config, ProcessToolAdapter::new(), project_dir(manifest)?))
}

/// Misses exit with the tag-miss code; anything else stays an error.
fn lookup_error(err: TagError) -> anyhow::Error {
    if err.is_miss() {
        ExitError::miss(err.to_string()).into()
    } else {
        err.into()
    }
}

/// Parse `file:line` with a 1-based line.
fn parse_location(s: &str) -> Result<TagLocation> {
    let (file, line) = s.rsplit_once(':').ok_or_else(|| anyhow!("expected FILE:LINE"))?;
    let line: usize = line.parse().map_err(|_| anyhow!("invalid line number: {line}"))?;
    Ok(TagLocation { file: PathBuf::from(file), line: line.saturating_sub(1) })
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
