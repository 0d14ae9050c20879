//! Churn dataset preparation configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the pipeline configuration file
//! - Config resolution (CLI → env → user config dir → defaults)
//! - Semantic validation

pub mod pipeline;
pub mod resolve;
pub mod validate;

pub use pipeline::{
    ColumnNames, CsvFormat, DecimalSeparator, ExtractorConfig, LabelerConfig, PipelineConfig,
};
pub use resolve::{resolve_config, ConfigError, ConfigSource, ResolvedConfig, CONFIG_ENV_VAR};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

impl From<ConfigError> for churn_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(e) => churn_common::Error::Validation(e.to_string()),
            other => churn_common::Error::Config(other.to_string()),
        }
    }
}

impl From<ValidationError> for churn_common::Error {
    fn from(err: ValidationError) -> Self {
        churn_common::Error::Validation(err.to_string())
    }
}
