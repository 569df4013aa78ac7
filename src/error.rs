//! Error types for modelgen.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for model generation.
#[derive(Debug, Error)]
pub enum GenError {
    /// A required setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The connection string could not be understood.
    #[error("Invalid connection string at position {position}: {message}")]
    Dsn { position: usize, message: String },

    /// Could not reach the database.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The metadata query or row decoding failed.
    #[error("Query error: {0}")]
    Query(String),

    /// A generated file could not be created or written.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection string error at the given position.
    pub fn dsn(position: usize, message: impl Into<String>) -> Self {
        Self::Dsn {
            position,
            message: message.into(),
        }
    }

    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for modelgen operations.
pub type GenResult<T> = Result<T, GenError>;
