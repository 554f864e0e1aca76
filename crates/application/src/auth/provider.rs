//! Authorization provider: exchanges a grant for a token pair.
//!
//! Every provider variant (credentials, wallet, device id, refresh token)
//! goes through the same POST and the same token parsing; the variant
//! only picks the endpoint and shapes the body.

use std::collections::BTreeMap;
use std::sync::Arc;

use sentinel_domain::{AuthorizationData, AuthorizationGrant, ClientConfig, HttpMethod, TransportRequest};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RequestError, RequestResult};
use crate::ports::{Clock, Transport};
use crate::progress::ProgressReporter;

/// Turns authorization grants into [`AuthorizationData`].
#[derive(Clone)]
pub struct AuthorizationProvider {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    config: Arc<ClientConfig>,
}

impl AuthorizationProvider {
    /// Creates a provider sharing the pipeline's transport and clock.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>, config: Arc<ClientConfig>) -> Self {
        Self {
            transport,
            clock,
            config,
        }
    }

    /// Logs in with `grant`.
    ///
    /// # Errors
    ///
    /// - `Transport` if the call fails or the server refuses the grant
    /// - `MalformedTokenPayload` if the response lacks either token
    pub async fn authorize(
        &self,
        grant: &AuthorizationGrant,
        progress: &ProgressReporter,
    ) -> RequestResult<AuthorizationData> {
        let payload = self.exchange(grant, progress).await?;
        Ok(AuthorizationData::from_payload(
            &payload,
            &self.config.token_format,
            self.clock.now(),
        )?)
    }

    /// Exchanges the refresh token of `current` for its successor.
    ///
    /// # Errors
    ///
    /// - `AuthExpired` if the call fails or the server refuses the token
    /// - `MalformedTokenPayload` if the response cannot be parsed
    pub async fn refresh(&self, current: &AuthorizationData) -> RequestResult<AuthorizationData> {
        let grant = AuthorizationGrant::refresh_token(current.refresh_token.value.clone());
        let payload = match self.exchange(&grant, &ProgressReporter::disabled()).await {
            Ok(payload) => payload,
            Err(RequestError::Transport { status, body }) => {
                warn!(?status, %body, "token refresh rejected");
                return Err(RequestError::AuthExpired);
            }
            Err(e) => return Err(e),
        };
        Ok(current.refreshed(&payload, &self.config.token_format, self.clock.now())?)
    }

    async fn exchange(&self, grant: &AuthorizationGrant, progress: &ProgressReporter) -> RequestResult<Value> {
        let endpoint = grant.endpoint(&self.config.endpoints);
        let url = self.config.endpoint_url(endpoint, &BTreeMap::new())?;
        let request = TransportRequest::new(HttpMethod::Post, url.as_str(), self.config.timeout())
            .with_body(Some(grant.to_body()));

        debug!(provider = grant.kind(), %url, "sending authorization request");
        let response = self.transport.send(&request, progress).await?;

        if !response.is_success() {
            return Err(RequestError::Transport {
                status: Some(response.status),
                body: response.body_text(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| RequestError::MalformedTokenPayload(e.to_string()))
    }
}
