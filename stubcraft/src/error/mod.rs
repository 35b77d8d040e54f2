//! Error types and error handling
//!
//! A destination that already exists is not an error. It is reported through
//! [`MaterializeOutcome::Conflict`](crate::scaffold::MaterializeOutcome).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the generation pipeline
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Generation pipeline error type
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Malformed field specification
    #[error("Invalid field specification near '{token}': {message}")]
    Parse {
        /// The offending token
        token: String,
        /// What is wrong with it
        message: String,
    },

    /// Missing fields file or stub
    #[error("{what} not found: {}", path.display())]
    NotFound {
        /// Kind of resource that was looked up
        what: &'static str,
        /// Where it was looked up
        path: PathBuf,
    },

    /// Filesystem failure while creating directories or writing output
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being touched when the failure occurred
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenerationError {
    /// Build a [`GenerationError::Parse`] for the given token
    #[must_use]
    pub fn parse(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            token: token.into(),
            message: message.into(),
        }
    }

    /// Build a [`GenerationError::Io`] for the given path
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
