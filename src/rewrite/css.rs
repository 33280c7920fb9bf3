//! Stylesheet reference rewriting: `url(...)` and string-form `@import`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::rewrite::resolve::{has_prefix, RewriteContext};

const SKIPPED_PREFIXES: &[&str] = &["http://", "https://", "//", "data:"];

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(['"]?([^'")\s]+)['"]?\)"#).expect("url() pattern is valid")
});

static CSS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)@import\s+(["'])([^"']+)["']"#).expect("@import pattern is valid")
});

/// Rewrite `url(...)` references; output is always `url("absolute")`.
pub fn rewrite_urls<'a>(text: &'a str, ctx: &RewriteContext) -> Cow<'a, str> {
    CSS_URL.replace_all(text, |caps: &Captures| {
        let original = &caps[0];
        let url = &caps[1];
        if has_prefix(url, SKIPPED_PREFIXES) {
            return original.to_string();
        }
        match ctx.resolve(url) {
            Ok(absolute) => {
                tracing::debug!(from = %url, to = %absolute, "CSS URL fix");
                format!("url(\"{}\")", absolute)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to resolve CSS URL");
                original.to_string()
            }
        }
    })
}

/// Rewrite `@import "x.css"` / `@import 'x.css'`, keeping the original quote.
pub fn rewrite_imports<'a>(text: &'a str, ctx: &RewriteContext) -> Cow<'a, str> {
    CSS_IMPORT.replace_all(text, |caps: &Captures| {
        let original = &caps[0];
        let quote = &caps[1];
        let url = &caps[2];
        if has_prefix(url, SKIPPED_PREFIXES) {
            return original.to_string();
        }
        match ctx.resolve(url) {
            Ok(absolute) => {
                tracing::debug!(from = %url, to = %absolute, "CSS import fix");
                format!("@import {quote}{absolute}{quote}")
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to resolve CSS import");
                original.to_string()
            }
        }
    })
}
