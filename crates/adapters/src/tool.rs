// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Toolchain process invocation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use side_core::{BuildStepResult, StepExit, ToolInvocation};
use thiserror::Error;
use tracing::Instrument;

/// Errors launching or awaiting a tool process.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{} could not start: {source}", program.display())]
    LaunchFailed {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{} did not finish: {source}", program.display())]
    DidNotFinish {
        program: PathBuf,
        source: std::io::Error,
    },
}

/// Adapter for running external toolchain programs
#[async_trait]
pub trait ToolAdapter: Clone + Send + Sync + 'static {
    /// Run to completion and capture merged output.
    async fn invoke(&self, invocation: &ToolInvocation) -> Result<BuildStepResult, ToolError>;

    /// Whether `program` can be found.
    fn exists(&self, program: &Path) -> bool;
}

/// Runs tools as child processes on the tokio runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessToolAdapter;

impl ProcessToolAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolAdapter for ProcessToolAdapter {
    async fn invoke(&self, invocation: &ToolInvocation) -> Result<BuildStepResult, ToolError> {
        let start = Instant::now();
        let span = tracing::info_span!(
            "tool.invoke",
            program = %invocation.program.display(),
            args = ?invocation.args,
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        let output = async {
            let mut process = tokio::process::Command::new(&invocation.program);
            process.args(&invocation.args);
            process.current_dir(&invocation.cwd);
            process.stdin(std::process::Stdio::null());
            process.stdout(std::process::Stdio::piped());
            process.stderr(std::process::Stdio::piped());

            let child = match process.spawn() {
                Ok(child) => child,
                Err(source) => {
                    return Err(ToolError::LaunchFailed { program: invocation.program.clone(), source })
                }
            };
            tracing::debug!(pid = child.id(), "tool started");

            child.wait_with_output().await.map_err(|source| ToolError::DidNotFinish {
                program: invocation.program.clone(),
                source,
            })
        }
        .instrument(span.clone())
        .await?;

        let duration = start.elapsed();
        let exit = match output.status.code() {
            Some(code) => StepExit::Normal(code),
            None => StepExit::Crashed,
        };
        span.record("exit_code", output.status.code().unwrap_or(-1));
        span.record("duration_ms", duration.as_millis() as u64);
        tracing::debug!(parent: &span, "tool finished");

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(BuildStepResult { exit, output: text, duration })
    }

    fn exists(&self, program: &Path) -> bool {
        let has_dir = program.parent().is_some_and(|p| !p.as_os_str().is_empty());
        if has_dir {
            return program.is_file();
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
            .unwrap_or(false)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ToolAdapter, ToolError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use side_core::{BuildStepResult, StepExit, ToolInvocation};
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded invocation
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ToolCall {
        pub program: String,
        pub args: Vec<String>,
        pub cwd: PathBuf,
    }

    #[derive(Debug, Clone)]
    enum Scripted {
        Finish { exit: StepExit, output: String, writes: Vec<(PathBuf, String)> },
        LaunchFails,
        NeverFinishes,
    }

    #[derive(Default)]
    struct FakeToolState {
        calls: Vec<ToolCall>,
        scripted: HashMap<String, VecDeque<Scripted>>,
        missing: HashSet<String>,
    }

    /// Fake tool adapter for testing.
    ///
    /// Responses are scripted per program file name and consumed in order;
    /// an unscripted call succeeds silently.
    #[derive(Clone, Default)]
    pub struct FakeToolAdapter {
        inner: Arc<Mutex<FakeToolState>>,
    }

    fn key(program: &Path) -> String {
        program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    impl FakeToolAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        fn push(&self, program: &str, scripted: Scripted) {
            self.inner
                .lock()
                .scripted
                .entry(program.to_string())
                .or_default()
                .push_back(scripted);
        }

        /// Script the next call of `program` to exit normally.
        pub fn respond(&self, program: &str, code: i32, output: &str) -> &Self {
            self.push(
                program,
                Scripted::Finish {
                    exit: StepExit::Normal(code),
                    output: output.to_string(),
                    writes: Vec::new(),
                },
            );
            self
        }

        /// Script the next call of `program` to crash.
        pub fn crash(&self, program: &str) -> &Self {
            self.crash_with_output(program, "")
        }

        /// Script the next call of `program` to print `output`, then crash.
        pub fn crash_with_output(&self, program: &str, output: &str) -> &Self {
            self.push(
                program,
                Scripted::Finish {
                    exit: StepExit::Crashed,
                    output: output.to_string(),
                    writes: Vec::new(),
                },
            );
            self
        }

        /// Script the next call of `program` to succeed and write a file
        /// (relative to the invocation's working directory).
        pub fn respond_writing(&self, program: &str, file: &str, contents: &str) -> &Self {
            self.push(
                program,
                Scripted::Finish {
                    exit: StepExit::Normal(0),
                    output: String::new(),
                    writes: vec![(PathBuf::from(file), contents.to_string())],
                },
            );
            self
        }

        pub fn fail_launch(&self, program: &str) -> &Self {
            self.push(program, Scripted::LaunchFails);
            self
        }

        pub fn fail_wait(&self, program: &str) -> &Self {
            self.push(program, Scripted::NeverFinishes);
            self
        }

        /// Make `exists` report `program` as absent.
        pub fn set_missing(&self, program: &str) -> &Self {
            self.inner.lock().missing.insert(program.to_string());
            self
        }

        /// All recorded invocations
        pub fn calls(&self) -> Vec<ToolCall> {
            self.inner.lock().calls.clone()
        }

        /// Program names in invocation order
        pub fn programs(&self) -> Vec<String> {
            self.inner.lock().calls.iter().map(|c| c.program.clone()).collect()
        }
    }

    #[async_trait]
    impl ToolAdapter for FakeToolAdapter {
        async fn invoke(&self, invocation: &ToolInvocation) -> Result<BuildStepResult, ToolError> {
            let program = key(&invocation.program);
            let scripted = {
                let mut inner = self.inner.lock();
                inner.calls.push(ToolCall {
                    program: program.clone(),
                    args: invocation.args.clone(),
                    cwd: invocation.cwd.clone(),
                });
                inner.scripted.get_mut(&program).and_then(VecDeque::pop_front)
            };
            match scripted {
                None => Ok(BuildStepResult::success("")),
                Some(Scripted::Finish { exit, output, writes }) => {
                    for (file, contents) in writes {
                        let path = invocation.cwd.join(file);
                        std::fs::write(&path, contents).map_err(|source| {
                            ToolError::DidNotFinish { program: invocation.program.clone(), source }
                        })?;
                    }
                    Ok(BuildStepResult::new(exit, output))
                }
                Some(Scripted::LaunchFails) => Err(ToolError::LaunchFailed {
                    program: invocation.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                }),
                Some(Scripted::NeverFinishes) => Err(ToolError::DidNotFinish {
                    program: invocation.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::Interrupted, "wait failed"),
                }),
            }
        }

        fn exists(&self, program: &Path) -> bool {
            !self.inner.lock().missing.contains(&key(program))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeToolAdapter, ToolCall};

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
