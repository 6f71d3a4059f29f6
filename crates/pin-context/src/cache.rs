//! Cache store surface over the request scope's mapping.

use std::time::Duration;

use pin_protocol::CacheMapping;
use serde_json::Value;

use crate::scope;

/// Options accepted by [`CacheStore::write`].
///
/// `expires_in` is recognized but [`CookieStore`] ignores it: the cache
/// cookie's max-age bounds every entry's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub expires_in: Option<Duration>,
}

impl WriteOptions {
    pub fn expires_in(duration: Duration) -> Self {
        Self {
            expires_in: Some(duration),
        }
    }
}

/// Key/value store used by the routing proxy.
pub trait CacheStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<Value>;

    /// Insert or overwrite `key`. Returns whether the write was accepted.
    fn write(&self, key: &str, value: Value, options: &WriteOptions) -> bool;
}

/// Store backed by the running execution unit's mapping.
///
/// Inside a request the mapping is the one decoded from the cache cookie
/// and written back to it on the way out.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieStore;

impl CookieStore {
    pub fn new() -> Self {
        Self
    }

    pub fn snapshot(&self) -> CacheMapping {
        scope::ambient().cache_snapshot()
    }

    pub fn clear(&self) {
        scope::ambient().clear_cache();
    }
}

impl CacheStore for CookieStore {
    fn read(&self, key: &str) -> Option<Value> {
        scope::ambient().cache_get(key)
    }

    fn write(&self, key: &str, value: Value, _options: &WriteOptions) -> bool {
        scope::ambient().cache_insert(key, value);
        true
    }
}
