//! Server token payload format.
//!
//! Authorization and refresh responses carry two token sub-objects, each
//! with a value and an expiry. Field names differ per deployment, so they
//! are configuration rather than protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Token;
use crate::error::{DomainError, DomainResult};

/// JSON field names used to read tokens from server responses.
///
/// The default layout is:
/// ```json
/// {
///   "access":  { "value": "A1", "expiresInSec": 3600 },
///   "refresh": { "value": "R1", "expiresAt": "2030-01-01T00:00:00Z" }
/// }
/// ```
/// Each token may carry either a relative lifetime or an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPayloadFormat {
    /// Name of the access token sub-object.
    pub access_field: String,
    /// Name of the refresh token sub-object.
    pub refresh_field: String,
    /// Name of the bearer value inside a sub-object.
    pub value_field: String,
    /// Name of the relative lifetime (seconds) inside a sub-object.
    pub expires_in_field: String,
    /// Name of the absolute RFC 3339 expiry inside a sub-object.
    pub expires_at_field: String,
}

impl Default for TokenPayloadFormat {
    fn default() -> Self {
        Self {
            access_field: "access".to_string(),
            refresh_field: "refresh".to_string(),
            value_field: "value".to_string(),
            expires_in_field: "expiresInSec".to_string(),
            expires_at_field: "expiresAt".to_string(),
        }
    }
}

impl TokenPayloadFormat {
    /// Reads the mandatory access token.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTokenPayload` if the sub-object is missing or invalid.
    pub fn access_token(&self, payload: &Value, now: DateTime<Utc>) -> DomainResult<Token> {
        self.token(payload, &self.access_field, now)?
            .ok_or_else(|| malformed(format!("missing `{}` object", self.access_field)))
    }

    /// Reads the refresh token, which some responses omit.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTokenPayload` if the sub-object is present but invalid.
    pub fn refresh_token(&self, payload: &Value, now: DateTime<Utc>) -> DomainResult<Option<Token>> {
        self.token(payload, &self.refresh_field, now)
    }

    fn token(&self, payload: &Value, field: &str, now: DateTime<Utc>) -> DomainResult<Option<Token>> {
        let root = payload
            .as_object()
            .ok_or_else(|| malformed("payload is not a JSON object"))?;

        let object = match root.get(field) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(object)) => object,
            Some(_) => return Err(malformed(format!("`{field}` is not an object"))),
        };

        let value = object
            .get(&self.value_field)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| malformed(format!("`{field}.{}` is missing or empty", self.value_field)))?;

        if let Some(lifetime) = object.get(&self.expires_in_field) {
            let secs = lifetime.as_i64().ok_or_else(|| {
                malformed(format!("`{field}.{}` is not an integer", self.expires_in_field))
            })?;
            return Token::expiring_in(value, secs, now)
                .map(Some)
                .ok_or_else(|| malformed(format!("`{field}.{}` is out of range", self.expires_in_field)));
        }

        if let Some(instant) = object.get(&self.expires_at_field) {
            let expires_at = instant
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .ok_or_else(|| {
                    malformed(format!("`{field}.{}` is not an RFC 3339 date", self.expires_at_field))
                })?
                .with_timezone(&Utc);
            return Ok(Some(Token::new(value, expires_at, now)));
        }

        Err(malformed(format!("`{field}` has no expiry")))
    }
}

fn malformed(message: impl Into<String>) -> DomainError {
    DomainError::MalformedTokenPayload(message.into())
}
