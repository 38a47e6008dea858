// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! side-adapters: external collaborators of the build engine

pub mod notify;
pub mod tool;

pub use notify::{DesktopNotifyAdapter, NoopNotifyAdapter, NotifyAdapter, NotifyError};
pub use tool::{ProcessToolAdapter, ToolAdapter, ToolError};

#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use tool::{FakeToolAdapter, ToolCall};
