//! Timeout enforcement.
//!
//! # Responsibilities
//! - Derive the upstream deadline for one invocation
//! - Keep that deadline under the host platform's hard execution limit
//!
//! # Design Decisions
//! - The configured upstream timeout is an upper bound, never extended
//! - With a known platform ceiling, `headroom_secs` is reserved for rewriting and
//!   assembling the response
//! - Timed-out requests surface as `UpstreamError::Timeout` (502)

use std::time::Duration;

use crate::config::TimeoutConfig;

/// Deadline applied to the whole upstream exchange, redirects included.
pub fn effective_timeout(config: &TimeoutConfig) -> Duration {
    let configured = config.upstream_secs;
    let secs = match config.platform_ceiling_secs {
        Some(ceiling) => configured.min(ceiling.saturating_sub(config.headroom_secs)),
        None => configured,
    };
    Duration::from_secs(secs.max(1))
}
