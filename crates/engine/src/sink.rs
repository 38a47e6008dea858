// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where a running build reports to: transcript, progress and status line.

use crate::build_log::BuildLogger;

/// Receiver of build progress.
///
/// Only the transcript methods are required; progress, status and buffer
/// flushing default to no-ops for front ends without those surfaces.
pub trait BuildSink: Send + Sync {
    /// A new build starts; previous transcript content is stale.
    fn begin(&self) {}

    /// A tool command line, written before the tool runs.
    fn command(&self, tool: &str, line: &str);

    /// Captured tool output, written after the tool finishes.
    fn output(&self, tool: &str, text: &str);

    /// Free-form transcript line.
    fn note(&self, text: &str);

    /// Progress of the current step, 0..=100.
    fn progress(&self, _percent: u8) {}

    /// Replace the status line.
    fn status(&self, _text: &str) {}

    /// Size of the linked program image.
    fn program_size(&self, _bytes: u64) {}

    /// Save unsaved editor buffers before a tool reads sources.
    fn flush_buffers(&self) {}
}

impl BuildSink for BuildLogger {
    fn begin(&self) {
        self.truncate();
    }

    fn command(&self, tool: &str, line: &str) {
        self.append(tool, line);
    }

    fn output(&self, tool: &str, text: &str) {
        self.append_fenced(tool, "output", text);
    }

    fn note(&self, text: &str) {
        self.append("side", text);
    }
}

/// Fan out to two sinks.
impl<A: BuildSink, B: BuildSink> BuildSink for (A, B) {
    fn begin(&self) {
        self.0.begin();
        self.1.begin();
    }

    fn command(&self, tool: &str, line: &str) {
        self.0.command(tool, line);
        self.1.command(tool, line);
    }

    fn output(&self, tool: &str, text: &str) {
        self.0.output(tool, text);
        self.1.output(tool, text);
    }

    fn note(&self, text: &str) {
        self.0.note(text);
        self.1.note(text);
    }

    fn progress(&self, percent: u8) {
        self.0.progress(percent);
        self.1.progress(percent);
    }

    fn status(&self, text: &str) {
        self.0.status(text);
        self.1.status(text);
    }

    fn program_size(&self, bytes: u64) {
        self.0.program_size(bytes);
        self.1.program_size(bytes);
    }

    fn flush_buffers(&self) {
        self.0.flush_buffers();
        self.1.flush_buffers();
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod recording {
    use super::BuildSink;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded sink call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SinkEvent {
        Begin,
        Command { tool: String, line: String },
        Output { tool: String, text: String },
        Note(String),
        Progress(u8),
        Status(String),
        ProgramSize(u64),
        Flush,
    }

    /// Sink that records every call for assertions
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<SinkEvent>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<SinkEvent> {
            self.events.lock().clone()
        }

        /// Command lines in order
        pub fn commands(&self) -> Vec<String> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    SinkEvent::Command { line, .. } => Some(line.clone()),
                    _ => None,
                })
                .collect()
        }

        /// Last status line, if any
        pub fn last_status(&self) -> Option<String> {
            self.events.lock().iter().rev().find_map(|e| match e {
                SinkEvent::Status(s) => Some(s.clone()),
                _ => None,
            })
        }

        fn push(&self, event: SinkEvent) {
            self.events.lock().push(event);
        }
    }

    impl BuildSink for RecordingSink {
        fn begin(&self) {
            self.push(SinkEvent::Begin);
        }

        fn command(&self, tool: &str, line: &str) {
            self.push(SinkEvent::Command { tool: tool.to_string(), line: line.to_string() });
        }

        fn output(&self, tool: &str, text: &str) {
            self.push(SinkEvent::Output { tool: tool.to_string(), text: text.to_string() });
        }

        fn note(&self, text: &str) {
            self.push(SinkEvent::Note(text.to_string()));
        }

        fn progress(&self, percent: u8) {
            self.push(SinkEvent::Progress(percent));
        }

        fn status(&self, text: &str) {
            self.push(SinkEvent::Status(text.to_string()));
        }

        fn program_size(&self, bytes: u64) {
            self.push(SinkEvent::ProgramSize(bytes));
        }

        fn flush_buffers(&self) {
            self.push(SinkEvent::Flush);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::{RecordingSink, SinkEvent};
