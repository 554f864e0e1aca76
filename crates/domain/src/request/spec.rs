//! Logical API request.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::HttpMethod;

/// A logical call to the API, before authentication is applied.
///
/// Built by the caller and consumed once by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the configured base URL
    pub path: String,
    /// Query string parameters
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// JSON body parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Attach a bearer token
    #[serde(default = "default_true")]
    pub use_auth: bool,
    /// Refresh an expired access token instead of failing
    #[serde(default = "default_true")]
    pub can_refresh_if_needed: bool,
    /// Overrides the configured timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

const fn default_true() -> bool {
    true
}

impl ApiRequest {
    /// Creates an authenticated request with refresh allowed.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
            use_auth: true,
            can_refresh_if_needed: true,
            timeout: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Sends the request without a bearer token.
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.use_auth = false;
        self
    }

    /// Fails with `AuthRequired` rather than refreshing an expired token.
    #[must_use]
    pub const fn without_refresh(mut self) -> Self {
        self.can_refresh_if_needed = false;
        self
    }

    /// Overrides the timeout for this request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
