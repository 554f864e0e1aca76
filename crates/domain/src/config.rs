//! Client configuration.
//!
//! Endpoint paths, header names and token field names vary per
//! deployment; everything here is plain data loaded by the
//! infrastructure layer.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::TokenPayloadFormat;
use crate::error::{DomainError, DomainResult};

/// Paths of the authorization endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEndpoints {
    /// Username/password login.
    pub credentials: String,
    /// Wallet signature login.
    pub wallet: String,
    /// Device identifier login.
    pub device_id: String,
    /// Refresh token exchange.
    pub refresh: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            credentials: "/auth/credentials".to_string(),
            wallet: "/auth/wallet".to_string(),
            device_id: "/auth/device".to_string(),
            refresh: "/auth/refresh".to_string(),
        }
    }
}

/// Settings for the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Authorization endpoints.
    pub endpoints: AuthEndpoints,
    /// Header carrying the bearer token.
    pub auth_header: String,
    /// Scheme placed before the token value.
    pub auth_scheme: String,
    /// Response statuses that mean "token rejected".
    pub auth_failure_statuses: Vec<u16>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Token field names in authorization responses.
    pub token_format: TokenPayloadFormat,
    /// Where the account record is stored. Defaults to the platform data dir.
    pub account_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoints: AuthEndpoints::default(),
            auth_header: "Authorization".to_string(),
            auth_scheme: "Bearer".to_string(),
            auth_failure_statuses: vec![401],
            timeout_ms: 30_000,
            token_format: TokenPayloadFormat::default(),
            account_file: None,
        }
    }
}

impl ClientConfig {
    /// Creates a default configuration pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Checks the configuration for obvious mistakes.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or
    /// the auth header name is empty.
    pub fn validate(&self) -> DomainResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "base URL must use http or https: {}",
                self.base_url
            )));
        }
        if self.auth_header.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration("auth_header must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns true if `status` means the server rejected the token.
    #[must_use]
    pub fn is_auth_failure(&self, status: u16) -> bool {
        self.auth_failure_statuses.contains(&status)
    }

    /// Header value carrying `token`.
    #[must_use]
    pub fn bearer_value(&self, token: &str) -> String {
        if self.auth_scheme.is_empty() {
            token.to_string()
        } else {
            format!("{} {token}", self.auth_scheme)
        }
    }

    /// Default per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolves a request path against the base URL.
    ///
    /// Absolute `http(s)://` paths must share the base URL's origin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if the result does not parse or points at
    /// another origin.
    pub fn endpoint_url(&self, path: &str, query: &BTreeMap<String, String>) -> DomainResult<Url> {
        let absolute = path.starts_with("http://") || path.starts_with("https://");
        let raw = if absolute {
            path.to_string()
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        };

        let mut url = Url::parse(&raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;
        if absolute {
            let base =
                Url::parse(&self.base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base_url)))?;
            if url.origin() != base.origin() {
                return Err(DomainError::InvalidUrl(format!(
                    "{raw} is outside the configured origin {}",
                    base.origin().ascii_serialization()
                )));
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }
}
