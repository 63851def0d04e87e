//! Error types for shelf_core.
//!
//! Only whole-run failures live here. Per-file outcomes (skipped files,
//! destination conflicts, per-file I/O errors) are recorded in the
//! [`Report`](crate::Report) and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using shelf_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an operation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A scan root could not be read at all.
    #[error("Root directory unreadable: {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid digest format or encoding.
    #[error("Invalid digest: {reason}")]
    InvalidDigest { reason: String },
}

impl Error {
    /// Create a RootUnreadable error.
    pub fn root_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::RootUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidDigest error.
    pub fn invalid_digest(reason: impl Into<String>) -> Self {
        Error::InvalidDigest {
            reason: reason.into(),
        }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}
