//! Link rewriting for textual response bodies.
//!
//! # Data Flow
//! ```text
//! upstream body + content-type
//!     → is_rewritable? (text/*, json, xml, javascript)   no → bytes untouched
//!     → UTF-8 decode                                     err → bytes untouched
//!     → attributes.rs (href/src/action)
//!     → css.rs (url(), @import)  [text/css only]
//!     → UTF-8 re-encode
//! ```
//!
//! # Design Decisions
//! - Best effort: a rewrite problem never fails the response
//! - A single bad reference is skipped, the rest of the document is still processed
//! - Root-relative references anchor at the origin, others at the current page

pub mod attributes;
pub mod css;
pub mod resolve;

use std::borrow::Cow;

use bytes::Bytes;

use crate::observability::metrics;
pub use resolve::RewriteContext;

const TEXTUAL_TYPES: &[&str] = &[
    "text/",
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-javascript",
];

/// Whether bodies of this content type are scanned for links.
pub fn is_rewritable(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    TEXTUAL_TYPES.iter().any(|t| content_type.contains(t))
}

fn is_stylesheet(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/css")
}

/// Body to transmit for an upstream response.
///
/// Returns `body` itself (a cheap clone) whenever nothing was rewritten.
pub fn rewrite_body(body: &Bytes, content_type: &str, ctx: &RewriteContext) -> Bytes {
    if body.is_empty() || !is_rewritable(content_type) {
        return body.clone();
    }

    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(content_type = %content_type, error = %e, "Failed to process text content");
            metrics::record_rewrite("decode_failed");
            return body.clone();
        }
    };

    let mut rewritten = attributes::rewrite_attributes(text, ctx);
    if is_stylesheet(content_type) {
        if let Cow::Owned(updated) = css::rewrite_urls(&rewritten, ctx) {
            rewritten = Cow::Owned(updated);
        }
        if let Cow::Owned(updated) = css::rewrite_imports(&rewritten, ctx) {
            rewritten = Cow::Owned(updated);
        }
    }

    match rewritten {
        Cow::Borrowed(_) => {
            metrics::record_rewrite("unchanged");
            body.clone()
        }
        Cow::Owned(updated) => {
            metrics::record_rewrite("rewritten");
            Bytes::from(updated)
        }
    }
}
