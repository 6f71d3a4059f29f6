//! Routing context tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Upper bound on the length of a token accepted from a client.
pub const MAX_TOKEN_LEN: usize = 128;

/// Opaque identifier for a routing decision generation.
///
/// Generated tokens are 32 lowercase hex characters. Tokens echoed back by
/// a client are accepted if they are cookie-safe and never contain the
/// payload delimiter `--`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextToken(String);

impl ContextToken {
    /// Generate a fresh, unique token.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Validate a client-supplied token.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_TOKEN_LEN
            && !raw.contains("--")
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(ProtocolError::InvalidToken(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContextToken {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContextToken> for String {
    fn from(token: ContextToken) -> Self {
        token.0
    }
}

impl AsRef<str> for ContextToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
