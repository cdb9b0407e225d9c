//! Error types for file staging operations

use std::path::PathBuf;

/// Result alias used across the staging crate
pub type Result<T> = std::result::Result<T, StagingError>;

/// Errors that can occur while staging, reloading or writing back a file
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// Opening, reading, seeking or writing a stream failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path of the file the stream belonged to
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The record has no file handle bound to it
    #[error("Record is not bound to a file")]
    Unbound,

    /// No record with this path is held by the registry
    #[error("No staged record for {0}")]
    NotRegistered(PathBuf),

    /// A replacement record does not belong to the slot it should replace
    #[error("Record path mismatch: expected {expected}, found {found}")]
    PathMismatch {
        /// Path of the registered record
        expected: PathBuf,
        /// Path of the replacement record
        found: PathBuf,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl StagingError {
    /// Wraps an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StagingError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the IO error kind when this is an IO failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            StagingError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration sources could not be parsed or deserialized
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value was parsed but is not acceptable
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
