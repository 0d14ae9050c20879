//! Semantic validation of a loaded pipeline configuration.

use crate::pipeline::PipelineConfig;
use thiserror::Error;

/// Longest churn window accepted, in days.
pub const MAX_CHURN_WINDOW_DAYS: u32 = 36_500;

/// A configuration that parses but cannot drive a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("column name for '{setting}' is empty")]
    EmptyColumn { setting: String },

    #[error("column name '{name}' is used for both '{first}' and '{second}'")]
    DuplicateColumn {
        name: String,
        first: String,
        second: String,
    },

    #[error("delimiter {0:?} is not a single ASCII character")]
    NonAsciiDelimiter(char),

    #[error("delimiter {0:?} is reserved by the CSV format")]
    ReservedDelimiter(char),

    #[error("churn window of {0} days exceeds the maximum of {MAX_CHURN_WINDOW_DAYS}")]
    ChurnWindowTooLarge(u32),

    #[error("unsupported config schema version {0}")]
    UnsupportedSchema(String),
}

pub type ValidationResult = Result<(), ValidationError>;

/// Check a configuration, reporting the first problem found.
pub fn validate_config(config: &PipelineConfig) -> ValidationResult {
    if let Some(version) = &config.schema_version {
        let major = version.split('.').next().unwrap_or_default();
        let supported = crate::CONFIG_SCHEMA_VERSION
            .split('.')
            .next()
            .unwrap_or_default();
        if major != supported {
            return Err(ValidationError::UnsupportedSchema(version.clone()));
        }
    }

    let entries = config.columns.entries();
    for (i, (setting, name)) in entries.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyColumn {
                setting: setting.to_string(),
            });
        }
        if let Some((other, _)) = entries[..i].iter().find(|(_, n)| n == name) {
            return Err(ValidationError::DuplicateColumn {
                name: name.to_string(),
                first: other.to_string(),
                second: setting.to_string(),
            });
        }
    }

    let delimiter = config.csv.delimiter;
    if !delimiter.is_ascii() {
        return Err(ValidationError::NonAsciiDelimiter(delimiter));
    }
    if matches!(delimiter, '"' | '\n' | '\r') {
        return Err(ValidationError::ReservedDelimiter(delimiter));
    }

    if config.labeler.churn_window_days > MAX_CHURN_WINDOW_DAYS {
        return Err(ValidationError::ChurnWindowTooLarge(
            config.labeler.churn_window_days,
        ));
    }

    Ok(())
}
