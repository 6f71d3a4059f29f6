//! Demo HTTP surface for the replica pinning middleware.
//!
//! The routes stand in for an application whose database proxy consults
//! the routing context: `/write` plays the part of a request that hit the
//! primary, `/context` shows what a follow-up read would observe.

use axum::extract::{Extension, Query};
use axum::response::{IntoResponse, Json, Redirect};
use axum::routing::{get, post};
use axum::Router;
use pin_context::{CacheStore, CookieStore, RequestScope, WriteOptions, context};
use pin_middleware::{PinConfig, PinLayer};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the demo router wrapped in the pinning layer.
pub fn app(config: PinConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/context", get(context_handler))
        .route("/write", post(write_handler))
        .route("/redirect", get(redirect_handler))
        .layer(PinLayer::new(config))
        .layer(TraceLayer::new_for_http())
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn context_handler(Extension(scope): Extension<RequestScope>) -> impl IntoResponse {
    let state = scope.snapshot();
    Json(json!({
        "current": state.current,
        "previous": state.previous,
        "cache": state.cache,
    }))
}

#[derive(Debug, Deserialize)]
struct WriteParams {
    key: Option<String>,
    value: Option<String>,
}

async fn write_handler(Query(params): Query<WriteParams>) -> impl IntoResponse {
    // A write went to the primary: later reads must not use an older snapshot.
    let current = context::advance();
    info!("Write recorded, context advanced to {current}");

    if let Some(key) = params.key {
        let value = params.value.map(Into::into).unwrap_or(serde_json::Value::Null);
        CookieStore::new().write(&key, value, &WriteOptions::default());
    }

    Json(json!({ "current": current }))
}

async fn redirect_handler() -> impl IntoResponse {
    Redirect::to("/context")
}
