//! Replica pinning - wire formats
//!
//! Everything that crosses the HTTP boundary lives here: the routing
//! context token, the `<context>--<status>` cookie payload, the base64
//! cache payload and the `Cookie` / `Set-Cookie` header codecs.
//! This crate is the single source of truth for cookie names and
//! default attributes.

pub mod cache;
pub mod cookie;
pub mod error;
pub mod payload;
pub mod token;

pub use cache::{CacheMapping, decode_cache, encode_cache};
pub use cookie::{SameSite, SetCookie, find_cookie};
pub use error::ProtocolError;
pub use payload::ContextPayload;
pub use token::ContextToken;

/// Cookie (and query parameter) carrying the routing context payload.
pub const CONTEXT_COOKIE: &str = "_rpin_ctxt";

/// Cookie carrying the base64-encoded cache mapping.
pub const CACHE_COOKIE: &str = "_rpin_cache";

/// Default `max-age` for both cookies, in seconds.
pub const DEFAULT_MAX_AGE_SECS: u64 = 5;

/// Default cookie path.
pub const DEFAULT_COOKIE_PATH: &str = "/";
