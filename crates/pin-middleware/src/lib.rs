//! Replica pinning middleware
//!
//! A `tower` layer that sits in front of any HTTP service and:
//! - resolves the previous routing context from the query string or cookie
//! - installs a [`RequestScope`](pin_context::RequestScope) for the handler
//! - writes the current context (and a non-empty cache) back as cookies
//!
//! The layer is decoupled from the wrapped handler; anything implementing
//! `Service<Request<B>, Response = Response<R>>` can sit behind it.

pub mod config;
pub mod layer;
pub mod resolve;
pub mod store;

pub use config::PinConfig;
pub use layer::{PinLayer, PinService};
pub use resolve::{Inbound, Resolution, resolve_inbound};
pub use store::store_outbound;
