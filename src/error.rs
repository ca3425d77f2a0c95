//! Error handling for station aggregation runs.
//!
//! Provides error types with context for input reading, record parsing,
//! configuration validation, and worker pool failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at line {line_number}: {reason} (line: {line:?})")]
    MalformedRecord {
        line_number: u64,
        line: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Ingestion task failed: {reason}")]
    TaskFailed { reason: String },
}

impl StatsError {
    /// Create an I/O error tied to the input path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_malformed_record(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
