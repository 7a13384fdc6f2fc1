use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize events: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("stored snapshot '{key}' is not readable: {source}")]
    CorruptStorage {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a form submission is refused. Nothing is written when one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Start time is required")]
    MissingStartTime,

    #[error("End time is required")]
    MissingEndTime,

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid {field} time '{value}' (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
