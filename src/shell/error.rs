//! Failures that can end an invocation early.
//!
//! None of these reach the caller as an `Err`: the engine turns them into a
//! `LaunchError` event followed by a failure exit status.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    /// The shell process could not be created.
    #[error("failed to spawn `{program}` in {}: {source}", .cwd.display())]
    Spawn {
        program: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The child was spawned but one of its pipes is missing.
    #[error("{stream} pipe unavailable after spawn")]
    StreamSetup { stream: &'static str },

    /// Anything else that goes wrong while the command runs.
    #[error("{context}: {source}")]
    Runtime {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    pub(crate) fn runtime(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Runtime {
            context: context.into(),
            source,
        }
    }
}
