//! Public entry point: `ShellEngine::execute`.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::debug;

use crate::context::{CommandInvocation, EngineState};

use super::event::OutputEvent;
use super::launcher::ShellConfig;
use super::multiplexer::{Invocation, LaunchRequest};

/// Lazy, single-pass sequence of events for one invocation.
///
/// Nothing is spawned until the first poll. Dropping the stream before it
/// ends kills the child and stops both pumps.
pub struct OutputStream {
    inner: BoxStream<'static, OutputEvent>,
}

impl OutputStream {
    fn empty() -> Self {
        Self {
            inner: stream::empty().boxed(),
        }
    }

    fn from_invocation(invocation: Invocation) -> Self {
        let inner = stream::unfold(invocation, |mut invocation| async move {
            let event = invocation.next_event().await?;
            Some((event, invocation))
        })
        .fuse()
        .boxed();
        Self { inner }
    }
}

impl Stream for OutputStream {
    type Item = OutputEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

/// Runs shell commands for one session.
///
/// Each engine has its own working directory and history; separate engines
/// never affect each other. One invocation in flight at a time is the
/// intended usage.
#[derive(Debug)]
pub struct ShellEngine {
    config: ShellConfig,
    state: EngineState,
}

impl Default for ShellEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellEngine {
    /// Engine in the process's current directory, shell taken from the environment.
    pub fn new() -> Self {
        Self {
            config: ShellConfig::from_env(),
            state: EngineState::default(),
        }
    }

    pub fn with_config(config: ShellConfig, cwd: impl Into<PathBuf>) -> Self {
        Self {
            config,
            state: EngineState::new(cwd),
        }
    }

    /// Run `command` through the shell and stream its output.
    ///
    /// A blank command is ignored: the returned stream is empty and nothing
    /// is recorded. Otherwise the invocation is recorded immediately, even if
    /// the launch later fails.
    pub fn execute(&mut self, command: &str) -> OutputStream {
        if command.trim().is_empty() {
            return OutputStream::empty();
        }

        let cwd = self.state.record_launch(command);
        debug!(command, history_len = self.state.history().len(), "recorded invocation");

        OutputStream::from_invocation(Invocation::new(LaunchRequest {
            config: self.config.clone(),
            command: command.to_string(),
            cwd,
        }))
    }

    pub fn cwd(&self) -> &Path {
        self.state.cwd()
    }

    /// Set the directory later invocations run in. Running ones are unaffected.
    pub fn set_cwd(&mut self, path: impl Into<PathBuf>) {
        self.state.update_cwd(path);
    }

    pub fn history(&self) -> &[CommandInvocation] {
        self.state.history().all()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}
