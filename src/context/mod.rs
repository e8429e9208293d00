//! Session state shared across command invocations.
//!
//! Holds the working directory new commands are launched in and the ledger
//! of everything that has been launched so far.

mod cwd;
mod history;


use std::path::{Path, PathBuf};

use chrono::Local;

pub use cwd::CurrentDir;
pub use history::{CommandInvocation, History};

/// State owned by one engine instance for the lifetime of a session.
#[derive(Clone, Debug, Default)]
pub struct EngineState {
    cwd: CurrentDir,
    history: History,
}

impl EngineState {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: CurrentDir::new(cwd),
            history: History::new(),
        }
    }

    pub fn cwd(&self) -> &Path {
        self.cwd.path()
    }

    /// Change the directory future invocations launch in.
    pub fn update_cwd(&mut self, new_path: impl Into<PathBuf>) {
        self.cwd.update(new_path);
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record `command` as launched now, in the current directory.
    ///
    /// Returns the directory it was recorded with, which is the one the
    /// launch must use.
    pub fn record_launch(&mut self, command: &str) -> PathBuf {
        let cwd = self.cwd.path().to_path_buf();
        self.history
            .record(command.to_string(), Local::now(), cwd.clone());
        cwd
    }
}
