//! Middleware configuration.

use std::time::Duration;

use pin_protocol::{
    CACHE_COOKIE, CONTEXT_COOKIE, DEFAULT_COOKIE_PATH, DEFAULT_MAX_AGE_SECS, SameSite, SetCookie,
};

/// Cookie names, attributes and path filtering for [`PinLayer`](crate::PinLayer).
#[derive(Debug, Clone)]
pub struct PinConfig {
    /// Cookie (and query parameter) holding `<context>--<status>`
    pub context_cookie: String,
    /// Cookie holding the base64 cache mapping
    pub cache_cookie: String,
    /// Cookie path
    pub path: String,
    /// Cookie max-age (whole seconds are emitted)
    pub max_age: Duration,
    /// Add the `Secure` attribute
    pub secure: bool,
    /// Add a `SameSite` attribute
    pub same_site: Option<SameSite>,
    /// Requests under these path prefixes bypass the middleware entirely
    pub ignored_prefixes: Vec<String>,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            context_cookie: CONTEXT_COOKIE.into(),
            cache_cookie: CACHE_COOKIE.into(),
            path: DEFAULT_COOKIE_PATH.into(),
            max_age: Duration::from_secs(DEFAULT_MAX_AGE_SECS),
            secure: false,
            same_site: None,
            ignored_prefixes: Vec::new(),
        }
    }
}

impl PinConfig {
    pub fn with_ignored_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_prefixes.push(prefix.into());
        self
    }

    /// Whether `path` is an ignored prefix or lies beneath one. Matching is
    /// by whole path segments: `/health` covers `/health/db`, not
    /// `/healthcheck`.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored_prefixes.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            if prefix.is_empty() {
                return false;
            }
            match path.strip_prefix(prefix) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }

    /// Build a `Set-Cookie` carrying this config's attributes.
    pub fn cookie(&self, name: &str, value: impl Into<String>) -> SetCookie {
        SetCookie {
            name: name.to_string(),
            value: value.into(),
            path: self.path.clone(),
            max_age: self.max_age.as_secs(),
            http_only: true,
            secure: self.secure,
            same_site: self.same_site,
        }
    }
}
