//! Error types for the sentinel-iforest engine

use thiserror::Error;

/// Result type alias for sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Main error type for the sentinel-iforest crate
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("Invalid configuration: {name} = {value}, {reason}")]
    InvalidConfiguration {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(String),
}

impl SentinelError {
    /// Shorthand for the validation failures surfaced by training and building.
    pub(crate) fn invalid_config(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SentinelError::InvalidConfiguration {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for SentinelError {
    fn from(err: csv::Error) -> Self {
        SentinelError::CsvError(err.to_string())
    }
}
