//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the origin is an absolute http(s) URL with a host
//! - Validate value ranges (timeouts > 0, sane redirect cap)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

const MAX_REDIRECT_CAP: usize = 50;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target base '{0}' is not a valid absolute URL")]
    InvalidTargetBase(String),

    #[error("target base '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("target base '{0}' has no host")]
    MissingHost(String),

    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,

    #[error("max_redirects {0} exceeds the limit of 50")]
    TooManyRedirects(usize),

    #[error("headroom of {headroom}s leaves no time under the {ceiling}s platform ceiling")]
    NoHeadroom { ceiling: u64, headroom: u64 },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = config.target_base();
    match Url::parse(base) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::UnsupportedScheme(base.to_string()));
            }
            if url.host_str().map_or(true, str::is_empty) {
                errors.push(ValidationError::MissingHost(base.to_string()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidTargetBase(base.to_string())),
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.upstream.max_redirects > MAX_REDIRECT_CAP {
        errors.push(ValidationError::TooManyRedirects(config.upstream.max_redirects));
    }

    if let Some(ceiling) = config.timeouts.platform_ceiling_secs {
        if config.timeouts.headroom_secs >= ceiling {
            errors.push(ValidationError::NoHeadroom {
                ceiling,
                headroom: config.timeouts.headroom_secs,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
