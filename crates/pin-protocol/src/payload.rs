//! The `<context>--<status>` context cookie payload.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;

use crate::error::ProtocolError;
use crate::token::ContextToken;

/// Separator between the context token and the status code.
pub const DELIMITER: &str = "--";

/// Context token plus the status of the response that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPayload {
    pub context: ContextToken,
    pub status: StatusCode,
}

impl ContextPayload {
    pub fn new(context: ContextToken, status: StatusCode) -> Self {
        Self { context, status }
    }

    /// Render as `<context>--<status>`.
    pub fn encode(&self) -> String {
        format!("{}{DELIMITER}{}", self.context, self.status.as_u16())
    }

    /// Parse `<context>--<status>`, splitting on the last delimiter.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let (context, status) = raw
            .rsplit_once(DELIMITER)
            .ok_or(ProtocolError::MissingDelimiter)?;

        if status.len() != 3 || !status.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::InvalidStatus(status.to_string()));
        }
        let code: u16 = status
            .parse()
            .map_err(|_| ProtocolError::InvalidStatus(status.to_string()))?;
        if !(100..=599).contains(&code) {
            return Err(ProtocolError::InvalidStatus(status.to_string()));
        }
        let status = StatusCode::from_u16(code)
            .map_err(|_| ProtocolError::InvalidStatus(status.to_string()))?;

        Ok(Self {
            context: ContextToken::parse(context)?,
            status,
        })
    }

    /// A redirect must not advance the routing context.
    pub fn is_sticky(&self) -> bool {
        self.status.is_redirection()
    }
}

impl fmt::Display for ContextPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ContextPayload {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
