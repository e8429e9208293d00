//! Command execution engine.
//!
//! Runs one shell command line at a time as a child process and turns its
//! standard output and standard error into a single stream of
//! [`OutputEvent`]s, delivered line by line while the command is running.
//!
//! Internally each invocation has three cooperating parts:
//! - the launcher spawns the shell in the engine's working directory;
//! - two pumps (one per pipe) push decoded lines into FIFO buffers;
//! - the multiplexer drains both buffers into one sequence and finishes it
//!   with the process's exit status.
//!
//! Failures never surface as `Err`: they become a `LaunchError` event
//! followed by `ExitStatus(1)`.

mod engine;
mod error;
mod event;
mod launcher;
mod multiplexer;
mod pump;


pub use engine::{OutputStream, ShellEngine};
pub use error::ExecError;
pub use event::{FAILURE_STATUS, OutputEvent};
pub use launcher::{SHELL_ENV_VAR, ShellConfig};
