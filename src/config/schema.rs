//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Origin used when nothing else is configured.
pub const FALLBACK_TARGET_BASE: &str = "https://www.baidu.com";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream origin settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Local listener (only used by the HTTP host adapter).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Build a config pointing at the given origin, everything else defaulted.
    pub fn for_target(target_base: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.upstream.target_base = target_base.into();
        config.normalize();
        config
    }

    /// Scheme + host of the origin, without a trailing slash.
    pub fn target_base(&self) -> &str {
        &self.upstream.target_base
    }

    /// Canonicalize values that have an equivalent spelling.
    pub fn normalize(&mut self) {
        let trimmed = self.upstream.target_base.trim().trim_end_matches('/');
        self.upstream.target_base = trimmed.to_string();
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin base URL (e.g., "https://example.com").
    pub target_base: String,

    /// Maximum number of redirects followed transparently.
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target_base: FALLBACK_TARGET_BASE.to_string(),
            max_redirects: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Overall upstream request timeout in seconds.
    pub upstream_secs: u64,

    /// Hard execution limit imposed by the host platform, if known.
    pub platform_ceiling_secs: Option<u64>,

    /// Time reserved under the platform ceiling for assembling the response.
    pub headroom_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 25,
            platform_ceiling_secs: None,
            headroom_secs: 5,
        }
    }
}

/// Listener configuration for the local HTTP host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest inbound request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 6 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.target_base(), FALLBACK_TARGET_BASE);
        assert_eq!(config.upstream.max_redirects, 10);
        assert_eq!(config.timeouts.upstream_secs, 25);
        assert!(config.timeouts.platform_ceiling_secs.is_none());
    }

    #[test]
    fn test_for_target_trims_trailing_slash() {
        let config = ProxyConfig::for_target("https://example.com/");
        assert_eq!(config.target_base(), "https://example.com");
    }

    #[test]
    fn test_partial_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            target_base = "https://origin.test"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.target_base(), "https://origin.test");
        assert_eq!(config.upstream.max_redirects, 10);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
