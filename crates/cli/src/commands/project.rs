// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side project`: manifest management commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use side_core::{short_name, Flag, ManifestEntry, Project, ProjectOptions};

use crate::color;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project for a main source file (opens it if it exists)
    New {
        /// Main source file; the manifest is written beside it
        main: PathBuf,
    },
    /// Show files, references and options
    Show {
        project: PathBuf,
        #[arg(long = "output", short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Add a file, copying it into the project directory when needed
    Add { project: PathBuf, file: PathBuf },
    /// Remove a file (the main file cannot be removed)
    Remove { project: PathBuf, file: String },
    /// Set a `key=value` option (compiler, memtype, optimization, cflags, lflags)
    Set { project: PathBuf, key: String, value: String },
    /// Turn a compiler or linker flag on or off
    Flag {
        project: PathBuf,
        /// Flag name (e.g. warn-all, math-lib) or its argument (e.g. -Wall)
        #[arg(allow_hyphen_values = true)]
        flag: String,
        /// Turn the flag off
        #[arg(long)]
        off: bool,
    },
}

#[derive(Serialize)]
struct ProjectJson<'a> {
    path: &'a Path,
    dir: &'a Path,
    files: Vec<&'a ManifestEntry>,
    references: Vec<&'a str>,
    options: ProjectOptions,
}

pub fn handle(command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::New { main } => {
            let project = Project::create(&main)?;
            println!("{}", project.path().display());
        }
        ProjectCommand::Show { project, output } => {
            let project = Project::open(&project)?;
            show(&project, output)?;
        }
        ProjectCommand::Add { project, file } => {
            let mut project = Project::open(&project)?;
            let name = short_name(&file.to_string_lossy()).to_string();
            if project.add_file(&file)? {
                project.save()?;
                println!("Added {}", color::literal(&name));
            } else {
                println!("{} is already in the project", color::literal(&name));
            }
        }
        ProjectCommand::Remove { project, file } => {
            let mut project = Project::open(&project)?;
            project.remove_file(&file)?;
            project.save()?;
            println!("Removed {}", color::literal(&file));
        }
        ProjectCommand::Set { project, key, value } => {
            let mut project = Project::open(&project)?;
            let mut options = project.options();
            options.set(&key, &value)?;
            project.set_options(&options);
            project.save()?;
            println!("{key}={value}");
        }
        ProjectCommand::Flag { project, flag, off } => {
            let mut project = Project::open(&project)?;
            let flag: Flag = flag.parse()?;
            let mut options = project.options();
            options.set_flag(flag, !off);
            project.set_options(&options);
            project.save()?;
            println!("{} {}", flag, if off { "off" } else { "on" });
        }
    }
    Ok(())
}

fn show(project: &Project, format: OutputFormat) -> Result<()> {
    let manifest = project.manifest();
    match format {
        OutputFormat::Json => output::print_json(&ProjectJson {
            path: project.path(),
            dir: project.dir(),
            files: manifest.files().collect(),
            references: manifest.references().collect(),
            options: project.options(),
        }),
        OutputFormat::Text => {
            println!("{} {}", color::header("Project:"), project.path().display());
            println!("{} {}", color::header("Directory:"), project.dir().display());
            println!("{}", color::header("Files:"));
            for (i, entry) in manifest.files().enumerate() {
                let main = if i == 0 { color::context(" (main)") } else { String::new() };
                println!("  {entry}{main}");
            }
            let references: Vec<&str> = manifest.references().collect();
            if !references.is_empty() {
                println!("{}", color::header("References:"));
                for r in references {
                    println!("  {r}");
                }
            }
            println!("{}", color::header("Options:"));
            for line in project.options().to_lines() {
                println!("  {line}");
            }
            Ok(())
        }
    }
}
