//! Application error types

use sentinel_domain::DomainError;
use thiserror::Error;

use crate::ports::TransportError;

/// Final outcome of a failed call.
///
/// `Clone` so that one refresh failure can be handed to every caller that
/// waited on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The call needs a token, and none can be obtained without a login
    /// (refresh disallowed by the caller, or no refresh token).
    #[error("authentication required")]
    AuthRequired,

    /// A refresh was attempted and failed, or the server kept rejecting the
    /// token after a refresh.
    #[error("authentication expired")]
    AuthExpired,

    /// An authorization or refresh response could not be parsed.
    #[error("malformed token payload: {0}")]
    MalformedTokenPayload(String),

    /// A successful response could not be parsed into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Non-auth HTTP failure (`status` set) or network failure (`status` empty).
    #[error("transport failure{}: {body}", status_suffix(.status))]
    Transport {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        /// Response body or network error description.
        body: String,
    },

    /// Tokens could not be written to durable storage.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The request could not be turned into a URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl RequestError {
    /// HTTP status of a transport failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the user has to log in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::AuthExpired)
    }
}

impl From<TransportError> for RequestError {
    fn from(error: TransportError) -> Self {
        Self::Transport {
            status: None,
            body: error.to_string(),
        }
    }
}

impl From<DomainError> for RequestError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::MalformedTokenPayload(message) => Self::MalformedTokenPayload(message),
            other => Self::InvalidRequest(other.to_string()),
        }
    }
}

/// Result type alias for pipeline operations.
pub type RequestResult<T> = Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transport_display() {
        let with_status = RequestError::Transport {
            status: Some(500),
            body: "boom".to_string(),
        };
        assert_eq!(with_status.to_string(), "transport failure (status 500): boom");
        assert_eq!(with_status.status(), Some(500));

        let network: RequestError = TransportError::Timeout { timeout_ms: 10 }.into();
        assert_eq!(network.status(), None);
        assert!(network.to_string().starts_with("transport failure: "));
    }

    #[test]
    fn test_domain_conversion() {
        let err: RequestError = DomainError::MalformedTokenPayload("x".to_string()).into();
        assert_eq!(err, RequestError::MalformedTokenPayload("x".to_string()));
        let err: RequestError = DomainError::InvalidUrl("y".to_string()).into();
        assert!(matches!(err, RequestError::InvalidRequest(_)));
    }

    #[test]
    fn test_requires_login() {
        assert!(RequestError::AuthExpired.requires_login());
        assert!(!RequestError::MalformedResponse(String::new()).requires_login());
    }
}
