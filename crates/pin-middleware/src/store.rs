//! Outbound encoding: request scope + status → `Set-Cookie` entries.

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use pin_context::{RequestScope, ScopeState};
use pin_protocol::{ContextPayload, ContextToken, SetCookie, encode_cache};
use tracing::{debug, warn};

use crate::config::PinConfig;

/// Append the context cookie and, when the cache is non-empty, the cache
/// cookie. Each goes in its own `Set-Cookie` entry.
pub fn store_outbound(
    config: &PinConfig,
    scope: &RequestScope,
    status: StatusCode,
    headers: &mut HeaderMap,
) {
    let ScopeState { current, cache, .. } = scope.snapshot();
    let current = current.unwrap_or_else(ContextToken::generate);

    let payload = ContextPayload::new(current, status);
    append(headers, config.cookie(&config.context_cookie, payload.encode()));

    if cache.is_empty() {
        return;
    }
    debug!("Persisting {} cache entries", cache.len());
    append(headers, config.cookie(&config.cache_cookie, encode_cache(&cache)));
}

fn append(headers: &mut HeaderMap, cookie: SetCookie) {
    match cookie.to_header_value() {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => warn!("Dropping unrepresentable cookie {}: {e}", cookie.name),
    }
}
