//! Decode failures for the wire formats.
//!
//! None of these ever reach an HTTP client. The middleware maps every one
//! of them to a safe fallback (fresh context or empty cache).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("context payload has no `--` delimiter")]
    MissingDelimiter,

    #[error("invalid context token: {0:?}")]
    InvalidToken(String),

    #[error("invalid status in context payload: {0:?}")]
    InvalidStatus(String),

    #[error("cache payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cache payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache payload decoded to a non-object JSON value")]
    NotAMapping,
}
