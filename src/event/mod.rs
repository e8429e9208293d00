//! User input events.
//!
//! Terminal input is read on a dedicated thread so the main loop can wait on
//! keystrokes and command output at the same time without blocking either.
//!
//! # Submodules
//!
//! - `terminal`: key handling for the terminal pane

pub mod terminal;

use std::io::Result;
use std::thread;

use tokio::sync::mpsc::{self, Receiver};

/// Type alias for user input events from the terminal.
pub type UserEvent = crossterm::event::Event;

/// Initializes the user event stream.
///
/// Spawns a thread that forwards `crossterm::event::read()` results into a
/// bounded channel. The thread ends once the receiver is dropped.
pub fn init_user_event() -> Receiver<Result<UserEvent>> {
    let (tx, rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            if tx.blocking_send(crossterm::event::read()).is_err() {
                break;
            }
        }
    });
    rx
}
