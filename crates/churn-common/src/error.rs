//! Error types for churn dataset preparation.

use thiserror::Error;

/// Result type alias for churn dataset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for churn dataset preparation.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration validation failed: {0}")]
    Validation(String),

    // Input errors (20-29)
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("line {line}: unparseable date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: unparseable number '{value}' in column '{column}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}: unparseable label '{value}'")]
    InvalidLabel { line: u64, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Validation(_) => 11,
            Error::MissingColumn { .. } => 20,
            Error::InvalidDate { .. } => 21,
            Error::InvalidNumber { .. } => 22,
            Error::InvalidLabel { .. } => 23,
            Error::Csv(_) => 24,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// True when the error stems from the content of an input file rather
    /// than from configuration or the filesystem.
    pub fn is_input_error(&self) -> bool {
        match self {
            Error::Csv(e) => !matches!(e.kind(), csv::ErrorKind::Io(_)),
            _ => (20..30).contains(&self.code()),
        }
    }
}
