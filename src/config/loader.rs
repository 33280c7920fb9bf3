//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Origin base URL, e.g. `https://example.com`.
pub const ENV_TARGET: &str = "PROXY_PASS";
/// Optional TOML file loaded before environment overrides.
pub const ENV_CONFIG_PATH: &str = "RELAY_CONFIG";
pub const ENV_TIMEOUT_SECS: &str = "RELAY_TIMEOUT_SECS";
pub const ENV_PLATFORM_CEILING_SECS: &str = "RELAY_PLATFORM_CEILING_SECS";
pub const ENV_MAX_REDIRECTS: &str = "RELAY_MAX_REDIRECTS";
pub const ENV_LOG_FORMAT: &str = "RELAY_LOG_FORMAT";
pub const ENV_BIND_ADDRESS: &str = "RELAY_BIND_ADDRESS";
/// Setting this also turns the metrics endpoint on.
pub const ENV_METRICS_ADDRESS: &str = "RELAY_METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error(
        "Validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let mut config = read_file(path)?;
    config.normalize();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration for one invocation from the process environment.
pub fn from_env() -> Result<ProxyConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration using an arbitrary variable lookup.
///
/// Precedence is defaults, then the TOML file named by `RELAY_CONFIG`,
/// then individual variables.
pub fn from_lookup<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut config = match var(ENV_CONFIG_PATH) {
        Some(path) => read_file(Path::new(&path))?,
        None => ProxyConfig::default(),
    };

    if let Some(target) = var(ENV_TARGET) {
        config.upstream.target_base = target;
    }
    if let Some(value) = var(ENV_TIMEOUT_SECS) {
        config.timeouts.upstream_secs = parse_env(ENV_TIMEOUT_SECS, value)?;
    }
    if let Some(value) = var(ENV_PLATFORM_CEILING_SECS) {
        config.timeouts.platform_ceiling_secs = Some(parse_env(ENV_PLATFORM_CEILING_SECS, value)?);
    }
    if let Some(value) = var(ENV_MAX_REDIRECTS) {
        config.upstream.max_redirects = parse_env(ENV_MAX_REDIRECTS, value)?;
    }
    if let Some(value) = var(ENV_LOG_FORMAT) {
        config.observability.log_format = match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    key: ENV_LOG_FORMAT,
                    value,
                })
            }
        };
    }
    if let Some(address) = var(ENV_BIND_ADDRESS) {
        config.listener.bind_address = address;
    }
    if let Some(address) = var(ENV_METRICS_ADDRESS) {
        config.observability.metrics_address = address;
        config.observability.metrics_enabled = true;
    }

    config.normalize();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}
