//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
/// Errors produced while loading or parsing a configuration.
pub enum Error {
    #[error("Read error at {}: {message}", path.display())]
    /// I/O or filesystem read error.
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
    #[error("Config parse error at line {line}, column {col}: {message}")]
    /// The file is not valid settings JSON.
    Parse {
        /// Path associated with the parse error, if loaded from disk.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
    },
    /// No home directory to resolve the default path against.
    #[error("HOME is not set")]
    NoHome,
}

impl Error {
    /// Build a parse error from a serde_json error.
    pub(crate) fn from_json(path: Option<PathBuf>, e: &serde_json::Error) -> Self {
        Self::Parse {
            path,
            line: e.line(),
            col: e.column(),
            message: e.to_string(),
        }
    }
}
