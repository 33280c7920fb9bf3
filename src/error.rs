//! Error taxonomy for the relay pipeline.
//!
//! # Design Decisions
//! - Transport failures are classified once, at the upstream boundary
//!   (`net::upstream::classify`); everything downstream only sees `UpstreamError`
//! - The `Display` output of `UpstreamError` is the exact client-facing body
//! - Rewrite failures never escape the rewriter; they downgrade to "leave as-is"

use thiserror::Error;

/// Classified failure while forwarding a request to the origin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Name resolution for the origin host failed.
    #[error("Target server not found: {url}")]
    NotFound { url: String },

    /// The origin actively refused the TCP connection.
    #[error("Connection refused to: {url}")]
    ConnectionRefused { url: String },

    /// Deadline exceeded, or the redirect cap was hit.
    #[error("Request timeout to: {url}")]
    Timeout { url: String },

    /// Anything else that went wrong on the way to or back from the origin.
    #[error("Proxy failed: {message}")]
    Other { message: String },
}

impl UpstreamError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::ConnectionRefused { .. } => "connection_refused",
            Self::Timeout { .. } => "timeout",
            Self::Other { .. } => "other",
        }
    }
}

/// Failure inside the link rewriter. Never surfaced to the client.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' has no host")]
    MissingHost(String),

    #[error("cannot resolve '{reference}': {source}")]
    Resolve {
        reference: String,
        #[source]
        source: url::ParseError,
    },
}
