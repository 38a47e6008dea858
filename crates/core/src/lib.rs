// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! side-core: project model and build rules for the `side` toolchain front end

pub mod action;
pub mod error;
pub mod manifest;
pub mod options;
pub mod project;
pub mod step;
pub mod tag;
pub mod toolchain;

pub use action::{short_name, BuildAction, BuildPlan, PlannedStep, ToolKind, WorkItem, LINK_OUTPUT};
pub use error::BuildError;
pub use manifest::{Manifest, ManifestEntry};
pub use options::{Flag, Language, OptionError, ProjectOptions};
pub use project::{Project, ProjectError, PROJECT_EXTENSION};
pub use step::{BuildStepResult, OutcomePolicy, OutputPolicy, StepExit, StepOutcome, TextSniffPolicy};
pub use tag::{line_defines, Locator, TagLocation, TagRecord};
pub use toolchain::{ConfigError, ToolInvocation, ToolchainConfig};
