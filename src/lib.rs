//! ctf-toolkit - an interactive command runner with live output streaming
//!
//! This library provides the core functionality for ctf-toolkit, including:
//! - A command execution engine that streams stdout/stderr line by line
//! - Session context (working directory, command history)
//! - The terminal UI and its key handling
//! - A headless runner for scripting
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use ctf_toolkit::shell::{OutputEvent, ShellEngine};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut engine = ShellEngine::new();
//!     engine.set_cwd("/tmp");
//!
//!     let mut events = engine.execute("ls -la");
//!     while let Some(event) = events.next().await {
//!         match event {
//!             OutputEvent::StdoutLine(line) => print!("{}", line),
//!             OutputEvent::StderrLine(line) => eprint!("{}", line),
//!             OutputEvent::LaunchError(message) => eprintln!("error: {}", message),
//!             OutputEvent::ExitStatus(code) => println!("exit {}", code),
//!         }
//!     }
//!
//!     assert_eq!(engine.history().len(), 1);
//! }
//! ```

pub mod app;
pub mod cli;
pub mod context;
pub mod event;
pub mod shell;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::App;
pub use context::{CommandInvocation, EngineState};
pub use shell::{OutputEvent, OutputStream, ShellConfig, ShellEngine};
