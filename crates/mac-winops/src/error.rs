use std::result::Result as StdResult;

use thiserror::Error;

/// Errors that can occur during window operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Accessibility permission is required but not granted.
    #[error("Accessibility permission missing")]
    Permission,

    /// Failed to create an Accessibility API application element.
    #[error("Failed to create AX application element")]
    AppElement,

    /// An Accessibility API operation failed with the given error code.
    #[error("AX operation failed: code {0}")]
    AxCode(i32),

    /// The AX element became invalid (e.g., window closed) during the operation.
    #[error("AX element invalid (window gone)")]
    WindowGone,

    /// Operation must be executed on the main thread.
    #[error("Operation requires main thread")]
    MainThread,

    /// Failed to activate the application.
    #[error("Activation failed")]
    ActivationFailed,
}

/// Result alias for this crate.
pub type Result<T> = StdResult<T, Error>;
