//! Process launching through the host shell.

use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

use super::error::ExecError;

/// Environment variable that overrides the shell program.
pub const SHELL_ENV_VAR: &str = "CTF_TOOLKIT_SHELL";

/// Which shell runs command lines, and how it is told to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    /// Shell executable, resolved through `PATH` when not absolute.
    pub program: String,
    /// Flag that makes the shell run a single command line.
    pub flag: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        if cfg!(windows) {
            Self {
                program: "cmd".to_string(),
                flag: "/C".to_string(),
            }
        } else {
            Self {
                program: "/bin/sh".to_string(),
                flag: "-c".to_string(),
            }
        }
    }
}

impl ShellConfig {
    /// Default config, with the program taken from `CTF_TOOLKIT_SHELL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(program) = std::env::var(SHELL_ENV_VAR) {
            let program = program.trim();
            if !program.is_empty() {
                config.program = program.to_string();
            }
        }
        config
    }
}

/// A running child with both output pipes taken.
pub(crate) struct Launched {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Spawn `command` through the configured shell inside `cwd`.
///
/// The child is killed if the returned handle is dropped before it exits.
pub(crate) fn launch(config: &ShellConfig, command: &str, cwd: &Path) -> Result<Launched, ExecError> {
    debug!(command, cwd = %cwd.display(), shell = %config.program, "launching");

    let mut child = Command::new(&config.program)
        .arg(&config.flag)
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: config.program.clone(),
            cwd: cwd.to_path_buf(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or(ExecError::StreamSetup { stream: "stdout" })?;
    let stderr = child
        .stderr
        .take()
        .ok_or(ExecError::StreamSetup { stream: "stderr" })?;

    Ok(Launched { child, stdout, stderr })
}
