//! `href` / `src` / `action` attribute rewriting.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::rewrite::resolve::{has_prefix, RewriteContext};

/// Values that already point somewhere on their own.
const SKIPPED_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "//",
    "#",
    "javascript:",
    "mailto:",
    "tel:",
    "data:",
];

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:href|src|action)=["']([^"']*)["']"#).expect("attribute pattern is valid")
});

/// Rewrite every quoted link attribute in `text`.
///
/// Only the value between the quotes changes. A value that cannot be resolved
/// is left exactly as it was.
pub fn rewrite_attributes<'a>(text: &'a str, ctx: &RewriteContext) -> Cow<'a, str> {
    ATTRIBUTE.replace_all(text, |caps: &Captures| {
        let original = &caps[0];
        let Some(value) = caps.get(1) else {
            return original.to_string();
        };
        let offset = caps.get(0).map_or(0, |m| m.start());
        let url = value.as_str();

        if has_prefix(url, SKIPPED_PREFIXES) {
            return original.to_string();
        }

        match ctx.resolve(url) {
            Ok(absolute) => {
                if url.starts_with('/') {
                    tracing::debug!(from = %url, to = %absolute, "Root-relative fix");
                } else {
                    tracing::debug!(from = %url, to = %absolute, "Relative fix");
                }
                let start = value.start() - offset;
                let end = value.end() - offset;
                format!("{}{}{}", &original[..start], absolute, &original[end..])
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to resolve URL");
                original.to_string()
            }
        }
    })
}
