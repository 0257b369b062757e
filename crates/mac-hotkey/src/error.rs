//! Error types and result alias for the mac-hotkey crate.
use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;

/// Error variants produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying OS provided an error.
    #[error("OS error: {0}")]
    OsError(String),
    /// Event tap could not be created or initialized.
    #[error("Event tap failed to start")]
    EventTapStart,
    /// The OS refused a hotkey registration, usually because another process
    /// already owns the combination.
    #[error("Hotkey {id} registration failed (status {status})")]
    Registration {
        /// Binding id that failed.
        id: u32,
        /// OS status code.
        status: i32,
    },
    /// The application event handler could not be installed.
    #[error("Hotkey handler install failed (status {0})")]
    HandlerInstall(i32),
}
