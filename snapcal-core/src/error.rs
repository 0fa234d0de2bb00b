//! Error types for snapcal.

use std::fmt;

use thiserror::Error;

/// Which timestamp of an event failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeField::Start => write!(f, "start"),
            TimeField::End => write!(f, "end"),
        }
    }
}

/// Errors that can occur in snapcal operations.
#[derive(Error, Debug)]
pub enum SnapcalError {
    #[error("Invalid {field} time: \"{value}\"")]
    InvalidTimestamp { field: TimeField, value: String },

    #[error("Event \"{title}\" ends before it starts")]
    EndBeforeStart { title: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Could not read model response: {0}")]
    Extract(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not write file: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for snapcal operations.
pub type SnapcalResult<T> = Result<T, SnapcalError>;
