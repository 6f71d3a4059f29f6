//! Request-scoped pinning state.
//!
//! A [`RequestScope`] holds the current and previous routing context plus
//! the cache mapping for exactly one in-flight request. The middleware
//! installs it in a task-local slot so code deep inside a handler can reach
//! it through [`context`] and [`CookieStore`] without threading it through
//! every call. Outside a request, the same accessors fall back to a
//! per-thread detached scope.

pub mod cache;
pub mod context;
pub mod scope;

pub use cache::{CacheStore, CookieStore, WriteOptions};
pub use scope::{RequestScope, ScopeState};
