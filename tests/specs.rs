// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `side` binary.
//!
//! Toolchains are shell scripts in a temp directory, so most specs are
//! unix-only.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli"]
mod cli {
    mod help;
}

#[cfg(unix)]
#[path = "specs/build"]
mod build {
    mod load;
    mod pipeline;
}

#[path = "specs/project"]
mod project {
    mod manage;
}

#[cfg(unix)]
#[path = "specs/tags"]
mod tags {
    mod navigate;
}
