//! HTTP transport port

use async_trait::async_trait;
use sentinel_domain::{TransportRequest, TransportResponse};
use thiserror::Error;

use crate::progress::ProgressReporter;

/// Network-level failures: no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The URL was rejected by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for issuing HTTP requests.
///
/// Any HTTP status, including 4xx/5xx, is a successful transport call;
/// classifying statuses is the pipeline's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the status and body.
    ///
    /// Download progress in `[0, 1]` is reported through `progress`.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no response could be obtained.
    async fn send(
        &self,
        request: &TransportRequest,
        progress: &ProgressReporter,
    ) -> Result<TransportResponse, TransportError>;
}
