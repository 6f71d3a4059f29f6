//! Request scope - per-request state shared by the middleware and handlers.
//!
//! One scope is created per request and handed to handler code two ways:
//! explicitly, through the request extensions, and ambiently, through a
//! tokio task-local installed around the handler future. Tasks never see
//! each other's scope, even on pooled worker threads.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use pin_protocol::{CacheMapping, ContextToken};
use serde_json::Value;

/// Raw state behind a [`RequestScope`].
#[derive(Debug, Clone, Default)]
pub struct ScopeState {
    /// Context in effect for this request
    pub current: Option<ContextToken>,
    /// Context inherited from the previous request
    pub previous: Option<ContextToken>,
    /// Key/value side-cache, round-tripped through the cache cookie
    pub cache: CacheMapping,
}

/// Cheaply clonable handle to one request's pinning state.
///
/// The lock is only held for the duration of a synchronous closure, never
/// across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    state: Arc<Mutex<ScopeState>>,
}

impl RequestScope {
    pub fn new(current: ContextToken, previous: ContextToken, cache: CacheMapping) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScopeState {
                current: Some(current),
                previous: Some(previous),
                cache,
            })),
        }
    }

    /// Run `f` with exclusive access to the state. The lock is not
    /// reentrant: `f` must not touch this scope through any other accessor.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut ScopeState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Copy of the whole state, taken under one lock.
    pub fn snapshot(&self) -> ScopeState {
        self.with(|state| state.clone())
    }

    pub fn current(&self) -> Option<ContextToken> {
        self.state.lock().current.clone()
    }

    pub fn previous(&self) -> Option<ContextToken> {
        self.state.lock().previous.clone()
    }

    pub fn set_current(&self, token: ContextToken) {
        self.state.lock().current = Some(token);
    }

    pub fn set_previous(&self, token: ContextToken) {
        self.state.lock().previous = Some(token);
    }

    /// Replace the current context with a fresh one, e.g. after a write
    /// went to the primary. Returns the new token.
    pub fn advance(&self) -> ContextToken {
        let token = ContextToken::generate();
        self.set_current(token.clone());
        token
    }

    pub fn cache_get(&self, key: &str) -> Option<Value> {
        self.state.lock().cache.get(key).cloned()
    }

    pub fn cache_insert(&self, key: impl Into<String>, value: Value) {
        self.state.lock().cache.insert(key.into(), value);
    }

    pub fn cache_snapshot(&self) -> CacheMapping {
        self.state.lock().cache.clone()
    }

    pub fn replace_cache(&self, mapping: CacheMapping) {
        self.state.lock().cache = mapping;
    }

    pub fn clear_cache(&self) {
        self.state.lock().cache.clear();
    }

    /// Whether two handles point at the same request state.
    pub fn same_scope(&self, other: &RequestScope) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

tokio::task_local! {
    static ACTIVE: RequestScope;
}

thread_local! {
    static DETACHED: RequestScope = RequestScope::default();
}

/// Run `fut` with `scope` installed as the task's active scope.
pub async fn with_scope<F>(scope: RequestScope, fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE.scope(scope, fut).await
}

/// Synchronous counterpart of [`with_scope`].
pub fn with_scope_sync<R>(scope: RequestScope, f: impl FnOnce() -> R) -> R {
    ACTIVE.sync_scope(scope, f)
}

/// The scope installed for the running task, if any.
pub fn active() -> Option<RequestScope> {
    ACTIVE.try_with(Clone::clone).ok()
}

/// The active scope, or this thread's detached scope outside a request.
pub fn ambient() -> RequestScope {
    active().unwrap_or_else(|| DETACHED.with(Clone::clone))
}

/// Wipe this thread's detached scope.
pub fn reset_detached() {
    DETACHED.with(|scope| scope.with(|state| *state = ScopeState::default()));
}
