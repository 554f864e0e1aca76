//! Bearer token value type.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// An opaque bearer credential with its expiry.
///
/// Tokens are never mutated in place; a refresh produces a new `Token`
/// that replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The bearer string sent to the server.
    pub value: String,
    /// The instant from which the token is no longer usable.
    pub expires_at: DateTime<Utc>,
    /// When this token was issued or last replaced.
    pub updated_at: DateTime<Utc>,
}

impl Token {
    /// Creates a token from its parts.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
            updated_at,
        }
    }

    /// Creates a token issued at `now` that lives for `lifetime_secs` seconds.
    ///
    /// Returns `None` if the resulting instant is not representable.
    #[must_use]
    pub fn expiring_in(value: impl Into<String>, lifetime_secs: i64, now: DateTime<Utc>) -> Option<Self> {
        let expires_at = TimeDelta::try_seconds(lifetime_secs).and_then(|d| now.checked_add_signed(d))?;
        Some(Self::new(value, expires_at, now))
    }

    /// The "never issued" sentinel: empty value, epoch expiry.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            value: String::new(),
            expires_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Returns true if the token has ever been issued.
    #[must_use]
    pub fn is_issued(&self) -> bool {
        self.expires_at > DateTime::<Utc>::UNIX_EPOCH
    }

    /// Returns true if the token is usable at `now`.
    ///
    /// The comparison is exclusive: a token is already invalid at its
    /// expiry instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Returns true if the token is usable right now.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Seconds left before expiry (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::empty()
    }
}
