// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! side-engine: build orchestration and tag navigation

mod build_log;
mod nav;
mod pipeline;
mod sink;
mod tags;
mod time_fmt;

pub use build_log::{build_log_path, BuildLogger, SESSION_DIR};
pub use nav::{session_path, NavError, TagStack};
pub use pipeline::{BuildPhase, BuildReport, LoadMode, Pipeline, StepRecord};
pub use sink::BuildSink;
pub use tags::{TagError, TagIndex, TAG_FILE};

#[cfg(any(test, feature = "test-support"))]
pub use sink::{RecordingSink, SinkEvent};
