//! Ambient routing context accessor.
//!
//! The routing proxy asks "what is the current / previous context?" without
//! holding a reference to the request. These functions resolve against the
//! running task's [`RequestScope`](crate::RequestScope), or the thread's
//! detached scope when called outside a request.

use pin_protocol::ContextToken;
use tracing::debug;

use crate::scope;

pub fn generate() -> ContextToken {
    ContextToken::generate()
}

pub fn current() -> Option<ContextToken> {
    scope::ambient().current()
}

pub fn previous() -> Option<ContextToken> {
    scope::ambient().previous()
}

pub fn set_current(token: ContextToken) {
    scope::ambient().set_current(token);
}

pub fn set_previous(token: ContextToken) {
    scope::ambient().set_previous(token);
}

/// Start a new context generation. Call this after a write so later reads
/// in the cookie chain observe it.
pub fn advance() -> ContextToken {
    let token = scope::ambient().advance();
    debug!("Routing context advanced to {token}");
    token
}
