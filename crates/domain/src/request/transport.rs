//! Wire-level request handed to the transport.

use std::time::Duration;

use serde_json::Value;

use super::HttpMethod;

/// A fully resolved HTTP request: absolute URL, final headers, body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: String,
    /// Headers in insertion order
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Request timeout
    pub timeout: Duration,
}

impl TransportRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Looks up a header value, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = TransportRequest::new(HttpMethod::Get, "https://x.io", Duration::from_secs(1))
            .with_header("Authorization", "Bearer A1");
        assert_eq!(request.header("authorization"), Some("Bearer A1"));
        assert_eq!(request.header("x-missing"), None);
    }
}
