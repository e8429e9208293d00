//! Events emitted by a single command invocation.

use serde::Serialize;

/// Exit status reported after a failed launch or a runtime failure.
pub const FAILURE_STATUS: i32 = 1;

/// One item of an invocation's output sequence.
///
/// Every non-empty sequence ends with exactly one `ExitStatus`. A failed
/// invocation emits `LaunchError` immediately before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OutputEvent {
    /// A line read from standard output, terminator included when present.
    #[serde(rename = "stdout")]
    StdoutLine(String),
    /// A line read from standard error, terminator included when present.
    #[serde(rename = "stderr")]
    StderrLine(String),
    /// The invocation could not be started or failed while running.
    LaunchError(String),
    /// Final status of the invocation.
    ExitStatus(i32),
}

impl OutputEvent {
    /// Whether this event ends the sequence.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ExitStatus(_))
    }
}
