//! Cache cookie codec: `base64(json(mapping))`.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::ProtocolError;

/// Request-scoped key/value side-cache. Ordered so encoding is deterministic.
pub type CacheMapping = BTreeMap<String, Value>;

pub fn encode_cache(mapping: &CacheMapping) -> String {
    // Serializing a map with string keys cannot fail.
    let json = serde_json::to_vec(mapping).unwrap_or_default();
    STANDARD.encode(json)
}

pub fn decode_cache(raw: &str) -> Result<CacheMapping, ProtocolError> {
    let bytes = STANDARD.decode(raw.trim())?;
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(object) => Ok(object.into_iter().collect()),
        _ => Err(ProtocolError::NotAMapping),
    }
}
