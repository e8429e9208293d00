//! Append-only ledger of command invocations.
//!
//! Every call to `execute` with a non-empty command lands here before the
//! process is spawned, including launches that go on to fail. Entries are
//! never evicted, deduplicated or modified.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// One recorded command launch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    command: String,
    timestamp: DateTime<Local>,
    cwd: PathBuf,
}

impl CommandInvocation {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Working directory the command was launched in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<CommandInvocation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an invocation.
    pub fn record(&mut self, command: String, timestamp: DateTime<Local>, cwd: PathBuf) {
        self.entries.push(CommandInvocation {
            command,
            timestamp,
            cwd,
        });
    }

    /// All invocations in the order they were recorded.
    pub fn all(&self) -> &[CommandInvocation] {
        &self.entries
    }

    /// The command text of the `back`-th most recent entry (0 = latest).
    pub fn nth_recent(&self, back: usize) -> Option<&str> {
        let len = self.entries.len();
        if back >= len {
            return None;
        }
        Some(self.entries[len - 1 - back].command())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
