//! Authorization grants (one per login provider).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::AuthEndpoints;

/// Credential payload exchanged for an [`AuthorizationData`](super::AuthorizationData).
///
/// Variants differ only in the endpoint they target and the body they
/// send; the exchange itself is identical for all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthorizationGrant {
    /// Username and password login.
    Credentials {
        /// Account login.
        username: String,
        /// Account password.
        password: String,
    },
    /// Login by proving ownership of a wallet.
    Wallet {
        /// Wallet address.
        address: String,
        /// Signature of `message` by the wallet key.
        signature: String,
        /// The message that was signed.
        message: String,
    },
    /// Guest login bound to the installation.
    DeviceId {
        /// Stable identifier of the installation.
        device_id: String,
    },
    /// Exchange of a refresh token for a new pair.
    RefreshToken {
        /// The current refresh token value.
        refresh_token: String,
    },
}

impl AuthorizationGrant {
    /// Creates a username/password grant.
    #[must_use]
    pub fn credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a wallet grant.
    #[must_use]
    pub fn wallet(address: impl Into<String>, signature: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Wallet {
            address: address.into(),
            signature: signature.into(),
            message: message.into(),
        }
    }

    /// Creates a device grant.
    #[must_use]
    pub fn device_id(device_id: impl Into<String>) -> Self {
        Self::DeviceId {
            device_id: device_id.into(),
        }
    }

    /// Creates a refresh grant.
    #[must_use]
    pub fn refresh_token(refresh_token: impl Into<String>) -> Self {
        Self::RefreshToken {
            refresh_token: refresh_token.into(),
        }
    }

    /// Endpoint path this grant is posted to.
    #[must_use]
    pub fn endpoint<'a>(&self, endpoints: &'a AuthEndpoints) -> &'a str {
        match self {
            Self::Credentials { .. } => &endpoints.credentials,
            Self::Wallet { .. } => &endpoints.wallet,
            Self::DeviceId { .. } => &endpoints.device_id,
            Self::RefreshToken { .. } => &endpoints.refresh,
        }
    }

    /// JSON request body for this grant.
    #[must_use]
    pub fn to_body(&self) -> Value {
        match self {
            Self::Credentials { username, password } => json!({
                "username": username,
                "password": password,
            }),
            Self::Wallet {
                address,
                signature,
                message,
            } => json!({
                "address": address,
                "signature": signature,
                "message": message,
            }),
            Self::DeviceId { device_id } => json!({ "deviceId": device_id }),
            Self::RefreshToken { refresh_token } => json!({ "refreshToken": refresh_token }),
        }
    }

    /// Short name for logs; never includes secrets.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Credentials { .. } => "credentials",
            Self::Wallet { .. } => "wallet",
            Self::DeviceId { .. } => "device_id",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoints_per_variant() {
        let endpoints = AuthEndpoints::default();
        assert_eq!(
            AuthorizationGrant::credentials("u", "p").endpoint(&endpoints),
            "/auth/credentials"
        );
        assert_eq!(AuthorizationGrant::wallet("a", "s", "m").endpoint(&endpoints), "/auth/wallet");
        assert_eq!(AuthorizationGrant::device_id("d").endpoint(&endpoints), "/auth/device");
        assert_eq!(AuthorizationGrant::refresh_token("r").endpoint(&endpoints), "/auth/refresh");
    }

    #[test]
    fn test_bodies() {
        assert_eq!(
            AuthorizationGrant::credentials("neo", "trinity").to_body(),
            json!({"username": "neo", "password": "trinity"})
        );
        assert_eq!(
            AuthorizationGrant::refresh_token("R1").to_body(),
            json!({"refreshToken": "R1"})
        );
        assert_eq!(
            AuthorizationGrant::device_id("dev-1").to_body(),
            json!({"deviceId": "dev-1"})
        );
    }

    #[test]
    fn test_kind_has_no_secret() {
        let grant = AuthorizationGrant::credentials("neo", "trinity");
        assert_eq!(grant.kind(), "credentials");
    }
}
