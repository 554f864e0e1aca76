//! Access/refresh token pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Token, TokenPayloadFormat};
use crate::error::DomainResult;

/// The credentials an installation holds: an access token for requests and
/// a refresh token to obtain the next access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationData {
    /// Token attached to authenticated requests.
    pub access_token: Token,
    /// Token exchanged for a new pair once the access token expires.
    pub refresh_token: Token,
}

impl AuthorizationData {
    /// Creates a pair from two tokens.
    #[must_use]
    pub const fn new(access_token: Token, refresh_token: Token) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// Builds a pair from an authorization response.
    ///
    /// Both sub-objects are required.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTokenPayload` if either token is missing or invalid.
    pub fn from_payload(payload: &Value, format: &TokenPayloadFormat, now: DateTime<Utc>) -> DomainResult<Self> {
        let access_token = format.access_token(payload, now)?;
        let refresh_token = format
            .refresh_token(payload, now)?
            .ok_or_else(|| {
                crate::DomainError::MalformedTokenPayload(format!("missing `{}` object", format.refresh_field))
            })?;
        Ok(Self::new(access_token, refresh_token))
    }

    /// Builds the successor of this pair from a refresh response.
    ///
    /// A response without a refresh sub-object keeps the current refresh
    /// token. `self` is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTokenPayload` if the payload cannot be parsed.
    pub fn refreshed(&self, payload: &Value, format: &TokenPayloadFormat, now: DateTime<Utc>) -> DomainResult<Self> {
        let access_token = format.access_token(payload, now)?;
        let refresh_token = format
            .refresh_token(payload, now)?
            .unwrap_or_else(|| self.refresh_token.clone());
        Ok(Self::new(access_token, refresh_token))
    }

    /// Fully usable without any network call.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_valid_at(now) && self.refresh_token.is_valid_at(now)
    }

    /// Same as [`Self::is_valid_at`] against the wall clock.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// The refresh token can still be exchanged.
    #[must_use]
    pub fn can_refresh_at(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token.is_valid_at(now)
    }

    /// Access expired while the refresh token is still good.
    #[must_use]
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_valid_at(now) && self.can_refresh_at(now)
    }

    /// Summarizes the pair for display.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> AuthorizationStatus {
        if !self.access_token.is_issued() && !self.refresh_token.is_issued() {
            AuthorizationStatus::NotAuthenticated
        } else if self.access_token.is_valid_at(now) {
            AuthorizationStatus::Valid {
                seconds_remaining: self.access_token.seconds_until_expiry(now),
            }
        } else if self.can_refresh_at(now) {
            AuthorizationStatus::NeedsRefresh
        } else {
            AuthorizationStatus::Expired
        }
    }
}

/// Authorization state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// No tokens were ever issued to this installation.
    NotAuthenticated,
    /// The access token is usable.
    Valid {
        /// Seconds until the access token expires.
        seconds_remaining: i64,
    },
    /// The access token expired but can be refreshed silently.
    NeedsRefresh,
    /// Both tokens expired; a new login is required.
    Expired,
}

impl AuthorizationStatus {
    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::Valid { seconds_remaining } => {
                if *seconds_remaining > 3600 {
                    format!("Valid for {} hours", seconds_remaining / 3600)
                } else if *seconds_remaining > 60 {
                    format!("Valid for {} minutes", seconds_remaining / 60)
                } else {
                    format!("Valid for {seconds_remaining} seconds")
                }
            }
            Self::NeedsRefresh => "Expired (will auto-refresh)".to_string(),
            Self::Expired => "Expired, login required".to_string(),
        }
    }
}
