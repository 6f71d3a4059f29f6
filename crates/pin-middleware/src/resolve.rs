//! Inbound resolution: query string / cookies → current, previous, cache.
//!
//! Nothing here fails. Malformed input degrades to a fresh context or an
//! empty cache.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use pin_context::RequestScope;
use pin_protocol::{CacheMapping, ContextPayload, ContextToken, decode_cache, find_cookie};
use tracing::debug;

use crate::config::PinConfig;

/// How the routing context for a request was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Previous response was a redirect: current and previous are both the
    /// inbound context.
    Sticky,
    /// Inbound payload became previous; current is fresh.
    Advanced,
    /// A bare token (no status) became previous; current is fresh.
    Seeded,
    /// Nothing usable arrived; both are fresh.
    Fresh,
}

/// Resolved state for one request, before the handler runs.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub current: ContextToken,
    pub previous: ContextToken,
    pub cache: CacheMapping,
    pub resolution: Resolution,
}

impl Inbound {
    pub fn into_scope(self) -> RequestScope {
        RequestScope::new(self.current, self.previous, self.cache)
    }
}

pub fn resolve_inbound(config: &PinConfig, uri: &Uri, headers: &HeaderMap) -> Inbound {
    let raw = query_param(uri, &config.context_cookie)
        .or_else(|| find_cookie(headers, &config.context_cookie));
    let (current, previous, resolution) = resolve_context(raw.as_deref());

    let cache = find_cookie(headers, &config.cache_cookie)
        .map(|raw| resolve_cache(&raw))
        .unwrap_or_default();

    Inbound {
        current,
        previous,
        cache,
        resolution,
    }
}

/// Returns `(current, previous, resolution)` for a raw inbound value.
pub fn resolve_context(raw: Option<&str>) -> (ContextToken, ContextToken, Resolution) {
    let Some(raw) = raw else {
        return (ContextToken::generate(), ContextToken::generate(), Resolution::Fresh);
    };

    match ContextPayload::decode(raw) {
        Ok(payload) if payload.is_sticky() => {
            (payload.context.clone(), payload.context, Resolution::Sticky)
        }
        Ok(payload) => (ContextToken::generate(), payload.context, Resolution::Advanced),
        Err(pin_protocol::ProtocolError::MissingDelimiter) => match ContextToken::parse(raw) {
            Ok(seed) => (ContextToken::generate(), seed, Resolution::Seeded),
            Err(e) => {
                debug!("Ignoring context seed: {e}");
                (ContextToken::generate(), ContextToken::generate(), Resolution::Fresh)
            }
        },
        Err(e) => {
            debug!("Ignoring context payload: {e}");
            (ContextToken::generate(), ContextToken::generate(), Resolution::Fresh)
        }
    }
}

pub fn resolve_cache(raw: &str) -> CacheMapping {
    decode_cache(raw).unwrap_or_else(|e| {
        debug!("Ignoring cache cookie: {e}");
        CacheMapping::new()
    })
}

fn query_param(uri: &Uri, name: &str) -> Option<String> {
    uri.query()?;
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(mut params)| params.remove(name))
        .filter(|value| !value.is_empty())
}
