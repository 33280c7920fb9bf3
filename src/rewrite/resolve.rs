//! Reference resolution against the origin.

use url::Url;

use crate::error::RewriteError;

/// Where the current document lives and which origin it belongs to.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    page: Url,
    origin: String,
}

impl RewriteContext {
    /// `page_url` is the full URL of the fetched document, `target_base` the
    /// configured origin.
    pub fn new(page_url: &str, target_base: &str) -> Result<Self, RewriteError> {
        let page = Url::parse(page_url).map_err(|source| RewriteError::InvalidBase {
            url: page_url.to_string(),
            source,
        })?;
        let base = Url::parse(target_base).map_err(|source| RewriteError::InvalidBase {
            url: target_base.to_string(),
            source,
        })?;
        let host = base
            .host_str()
            .ok_or_else(|| RewriteError::MissingHost(target_base.to_string()))?;
        let origin = match base.port() {
            Some(port) => format!("{}://{}:{}", base.scheme(), host, port),
            None => format!("{}://{}", base.scheme(), host),
        };
        Ok(Self { page, origin })
    }

    pub fn page(&self) -> &Url {
        &self.page
    }

    /// `scheme://host[:port]` of the origin.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute form of `reference`.
    ///
    /// Root-relative references are glued onto the origin verbatim; anything
    /// else is resolved against the page per RFC 3986.
    pub fn resolve(&self, reference: &str) -> Result<String, RewriteError> {
        if reference.starts_with('/') {
            return Ok(format!("{}{}", self.origin, reference));
        }
        self.page
            .join(reference)
            .map(String::from)
            .map_err(|source| RewriteError::Resolve {
                reference: reference.to_string(),
                source,
            })
    }
}

/// ASCII case-insensitive `starts_with` over a prefix list.
pub(crate) fn has_prefix(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
