//! Config resolution: CLI path → environment → user config dir → defaults.

use crate::pipeline::PipelineConfig;
use crate::validate::{validate_config, ValidationError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "CHURNPREP_CONFIG";

/// File name looked up in the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Errors raised while locating or loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line.
    Cli(PathBuf),
    /// The `CHURNPREP_CONFIG` environment variable.
    Env(PathBuf),
    /// `<config_dir>/churnprep/config.json`.
    UserDir(PathBuf),
    /// Nothing found; built-in defaults.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Cli(p) => write!(f, "cli:{}", p.display()),
            ConfigSource::Env(p) => write!(f, "env:{}", p.display()),
            ConfigSource::UserDir(p) => write!(f, "user:{}", p.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// A validated configuration and its origin.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: PipelineConfig,
    pub source: ConfigSource,
}

/// Default location of the per-user config file.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("churnprep").join(CONFIG_FILE_NAME))
}

/// Resolve the configuration for this process.
///
/// An explicitly named file (CLI or env) must exist; the per-user file is
/// optional.
pub fn resolve_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_from(cli_path, env_path, user_config_path())
}

/// Resolution with every lookup location passed in.
pub fn resolve_from(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let source = if let Some(path) = cli_path {
        ConfigSource::Cli(path.to_path_buf())
    } else if let Some(path) = env_path {
        ConfigSource::Env(path)
    } else {
        match user_path {
            Some(path) if path.is_file() => ConfigSource::UserDir(path),
            _ => ConfigSource::Defaults,
        }
    };

    let config = match &source {
        ConfigSource::Cli(path) | ConfigSource::Env(path) | ConfigSource::UserDir(path) => {
            load_config(path)?
        }
        ConfigSource::Defaults => PipelineConfig::default(),
    };
    validate_config(&config)?;
    debug!(%source, "configuration resolved");

    Ok(ResolvedConfig { config, source })
}

/// Read and parse one config file.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
