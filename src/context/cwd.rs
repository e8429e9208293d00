//! Working directory tracked per engine instance.
//!
//! Commands run inside this directory rather than the process's own, so
//! independent engines never see each other's changes.

use std::env;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentDir {
    path: PathBuf,
}

impl Default for CurrentDir {
    fn default() -> Self {
        Self::capture().unwrap_or_else(|| Self::new("."))
    }
}

impl CurrentDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Capture the current working directory of the process.
    pub fn capture() -> Option<Self> {
        env::current_dir().ok().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn update(&mut self, new_path: impl Into<PathBuf>) {
        self.path = new_path.into();
    }
}
