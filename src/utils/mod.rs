//! Utility modules for common functionality.
//!
//! Logging configuration and the drop guard used to restore the terminal.

pub mod guard;
pub mod logger;
