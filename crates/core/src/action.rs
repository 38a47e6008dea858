// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build step classification.
//!
//! Maps each manifest entry to the toolchain stage it needs and the
//! intermediate artifacts it produces. Classification drains a growing work
//! list: artifacts appended by one stage (`foo.spin` → `foo.dat`) are
//! classified again before anything is linked.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::options::ProjectOptions;
use crate::step::OutputPolicy;

/// Output image produced by the link step.
pub const LINK_OUTPUT: &str = "a.out";

/// Build action inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildAction {
    /// `.spin` through the Spin compiler into a `.dat` image.
    AssembleSpin,
    /// `.dat` image wrapped into a relocatable `_firmware.o`.
    ObjectCopy,
    /// `.s` through the GNU assembler.
    AssembleGas,
    /// `.cogc` compiled for the cog memory model.
    CompileCogc,
    /// Handed straight to the link step.
    Link,
}

impl BuildAction {
    /// Classify by extension, case-insensitively.
    pub fn for_path(path: &str) -> Self {
        match extension(path).map(str::to_ascii_lowercase).as_deref() {
            Some("spin") => BuildAction::AssembleSpin,
            Some("dat") => BuildAction::ObjectCopy,
            Some("s") => BuildAction::AssembleGas,
            Some("cogc") => BuildAction::CompileCogc,
            _ => BuildAction::Link,
        }
    }
}

/// Which configured tool runs a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    SpinCompiler,
    ObjCopy,
    Assembler,
    Compiler,
    Loader,
    TagGenerator,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolKind::SpinCompiler => "spin-compiler",
            ToolKind::ObjCopy => "objcopy",
            ToolKind::Assembler => "assembler",
            ToolKind::Compiler => "compiler",
            ToolKind::Loader => "loader",
            ToolKind::TagGenerator => "tag-generator",
        };
        f.write_str(name)
    }
}

/// A file queued for a build action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    pub path: String,
    pub action: BuildAction,
}

impl WorkItem {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let action = BuildAction::for_path(&path);
        Self { path, action }
    }
}

/// One tool invocation scheduled ahead of the link step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub source: String,
    pub action: BuildAction,
    pub tool: ToolKind,
    pub args: Vec<String>,
    pub policy: OutputPolicy,
}

/// Fully drained work list: pre-link steps in order plus link inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub steps: Vec<PlannedStep>,
    pub link_inputs: Vec<String>,
}

impl BuildPlan {
    /// Classify `entries` (manifest order, main file first).
    pub fn classify<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut plan = BuildPlan::default();
        let mut queued: Vec<String> = entries.iter().map(|e| e.as_ref().to_string()).collect();
        let mut work: VecDeque<WorkItem> = queued.iter().cloned().map(WorkItem::new).collect();

        while let Some(item) = work.pop_front() {
            let path = item.path;
            match item.action {
                BuildAction::AssembleSpin => {
                    plan.steps.push(PlannedStep {
                        source: path.clone(),
                        action: BuildAction::AssembleSpin,
                        tool: ToolKind::SpinCompiler,
                        args: vec!["-c".to_string(), short_name(&path).to_string()],
                        policy: OutputPolicy::Sniff,
                    });
                    let dat = format!("{}.dat", strip_extension(&path));
                    if !is_present(&dat, &queued, &plan.link_inputs) {
                        queued.push(dat.clone());
                        work.push_back(WorkItem::new(dat));
                    }
                }
                BuildAction::ObjectCopy => {
                    let object = format!("{}_firmware.o", strip_extension(&path));
                    plan.steps.push(PlannedStep {
                        source: path.clone(),
                        action: BuildAction::ObjectCopy,
                        tool: ToolKind::ObjCopy,
                        args: vec![
                            "-I".to_string(),
                            "binary".to_string(),
                            "-B".to_string(),
                            "propeller".to_string(),
                            "-O".to_string(),
                            "propeller-elf-gcc".to_string(),
                            path.clone(),
                            object.clone(),
                        ],
                        policy: OutputPolicy::Sniff,
                    });
                    plan.append_link_input(object, &queued);
                }
                BuildAction::AssembleGas => {
                    let object = format!("{}.o", strip_extension(&path));
                    plan.steps.push(PlannedStep {
                        source: path.clone(),
                        action: BuildAction::AssembleGas,
                        tool: ToolKind::Assembler,
                        args: vec!["-o".to_string(), object.clone(), path.clone()],
                        policy: OutputPolicy::Sniff,
                    });
                    plan.append_link_input(object, &queued);
                }
                BuildAction::CompileCogc => {
                    let cog = format!("{}.cog", short_name(strip_extension(&path)));
                    plan.steps.push(PlannedStep {
                        source: path.clone(),
                        action: BuildAction::CompileCogc,
                        tool: ToolKind::Compiler,
                        args: vec![
                            "-r".to_string(),
                            "-Os".to_string(),
                            "-mcog".to_string(),
                            "-o".to_string(),
                            cog.clone(),
                            "-xc".to_string(),
                            path.clone(),
                        ],
                        policy: OutputPolicy::Strict,
                    });
                    plan.steps.push(PlannedStep {
                        source: cog.clone(),
                        action: BuildAction::CompileCogc,
                        tool: ToolKind::ObjCopy,
                        args: vec![
                            "--localize-text".to_string(),
                            "--rename-section".to_string(),
                            format!(".text={cog}"),
                            cog.clone(),
                        ],
                        policy: OutputPolicy::Strict,
                    });
                    plan.link_inputs.push(cog);
                }
                BuildAction::Link => plan.link_inputs.push(path),
            }
        }
        plan
    }

    fn append_link_input(&mut self, artifact: String, queued: &[String]) {
        if !is_present(&artifact, queued, &self.link_inputs) {
            self.link_inputs.push(artifact);
        }
    }

    /// Arguments for the compiler's link invocation.
    ///
    /// Only inputs the compiler driver understands (`.c*`, `.o*`) are passed;
    /// headers and other project files are dropped.
    pub fn link_args(&self, options: &ProjectOptions) -> Vec<String> {
        let mut args = vec!["-o".to_string(), LINK_OUTPUT.to_string()];
        args.extend(options.compile_args());
        args.extend(self.link_inputs.iter().filter(|i| is_link_input(i)).cloned());
        args.extend(options.link_args());
        args
    }
}

/// An artifact counts as present when a known entry ends with its file name.
fn is_present(artifact: &str, queued: &[String], linked: &[String]) -> bool {
    let name = short_name(artifact).to_lowercase();
    queued.iter().chain(linked).any(|k| k.to_lowercase().ends_with(&name))
}

fn is_link_input(name: &str) -> bool {
    matches!(name.find(".c"), Some(i) if i > 0) || matches!(name.find(".o"), Some(i) if i > 0)
}

/// File name without any directory component. Both separators are accepted.
pub fn short_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn extension(path: &str) -> Option<&str> {
    let name = short_name(path);
    match name.rfind('.') {
        Some(i) if i > 0 => Some(&name[i + 1..]),
        _ => None,
    }
}

fn strip_extension(path: &str) -> &str {
    match extension(path) {
        Some(ext) => &path[..path.len() - ext.len() - 1],
        None => path,
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
