//! Exit codes for the churn-label and churn-extract binaries.
//!
//! Exit codes communicate operation outcome without requiring output parsing.

use churn_common::Error;

/// Exit codes for pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed and all outputs were written
    Clean = 0,

    /// Configuration error
    ConfigError = 10,

    /// Malformed input (missing columns, unparseable cells)
    InputError = 11,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code reported for a failed run.
    pub fn for_error(err: &Error) -> Self {
        if err.is_input_error() {
            return ExitCode::InputError;
        }
        match err {
            Error::Config(_) | Error::Validation(_) => ExitCode::ConfigError,
            Error::Io(_) | Error::Csv(_) => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}
