//! # Error Handling
//!
//! This module defines the centralized error type for `git-sync`. It uses the
//! `thiserror` library to build an `Error` enum covering every failure the
//! sync pipeline can hit, each with enough context to act on.
//!
//! ## Key Components
//!
//! - **`Error`**: one variant per failure kind:
//!   - configuration problems (missing source or destination, unreadable
//!     config file, bad glob),
//!   - fetch failures from the `git clone` invocation,
//!   - mirror failures while replacing the destination tree,
//!   - marker failures while writing package-marker files.
//!
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! No variant is ever swallowed: every error is logged by the caller and
//! propagated so the process exits with a failure status.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for git-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The run is not configured well enough to start.
    ///
    /// Raised before any fetch happens, so nothing on disk is touched.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration
        hint: Option<String>,
    },

    /// The `git clone` invocation could not be started or exited non-zero.
    #[error("Fetch failed: `{command}` exited with {status}: {stderr}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Fetch {
        command: String,
        status: String,
        stderr: String,
        /// Optional hint for how to resolve the failure
        hint: Option<String>,
    },

    /// A filesystem operation failed while replacing the destination tree.
    ///
    /// The destination may be left partially written.
    #[error("Mirror error at '{}': {message}", path.display())]
    Mirror { path: PathBuf, message: String },

    /// A package-marker file could not be written.
    #[error("Marker error at '{}': {message}", path.display())]
    Marker { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for a `Config` error without a hint.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            hint: None,
        }
    }

    pub(crate) fn mirror(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Mirror {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn marker(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Marker {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
