//! Authenticated request pipeline
//!
//! Sends API calls, attaching a bearer token when the call needs one.
//! An expired access token, or a token the server rejects, is refreshed
//! transparently and the call is retried once.
//!
//! Only one refresh runs at a time. A call that finds the access token
//! expired either starts the refresh or waits on the one already in
//! flight; every waiter receives the same outcome. The refresh runs on its
//! own task, so it completes even if every caller loses interest, and its
//! tokens are persisted before any waiter is released.

use std::sync::Arc;

use parking_lot::Mutex;
use sentinel_domain::{
    ApiRequest, AuthorizationData, AuthorizationGrant, AuthorizationStatus, ClientConfig, TransportRequest,
    TransportResponse,
};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{AccountStore, AuthorizationProvider};
use crate::error::{RequestError, RequestResult};
use crate::ports::{Clock, Transport};
use crate::progress::ProgressReporter;

type RefreshOutcome = RequestResult<AuthorizationData>;

/// Handle on the refresh currently in flight.
#[derive(Clone)]
struct InFlight {
    id: u64,
    outcome: watch::Receiver<Option<RefreshOutcome>>,
}

#[derive(Default)]
struct RefreshSlot {
    next_id: u64,
    in_flight: Option<InFlight>,
}

/// What a call does after looking at the current tokens.
enum TokenStep {
    /// Dispatch with this access token value.
    Ready(String),
    /// Wait for a refresh, then dispatch with its access token.
    Wait(InFlight),
}

struct Shared {
    transport: Arc<dyn Transport>,
    accounts: Arc<AccountStore>,
    clock: Arc<dyn Clock>,
    config: Arc<ClientConfig>,
    provider: AuthorizationProvider,
    refresh: Mutex<RefreshSlot>,
}

/// The token-authenticated request pipeline.
///
/// Cheap to clone; clones share the same refresh state.
///
/// # Example
///
/// ```ignore
/// let pipeline = RequestPipeline::new(transport, accounts, clock, config);
/// pipeline
///     .authorize(&AuthorizationGrant::credentials("neo", "trinity"), &ProgressReporter::disabled())
///     .await?;
/// let me: Player = pipeline.send(&ApiRequest::get("/players/me"), &ProgressReporter::disabled()).await?;
/// ```
#[derive(Clone)]
pub struct RequestPipeline {
    shared: Arc<Shared>,
}

impl RequestPipeline {
    /// Creates a pipeline over the given collaborators.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        accounts: Arc<AccountStore>,
        clock: Arc<dyn Clock>,
        config: ClientConfig,
    ) -> Self {
        let config = Arc::new(config);
        let provider = AuthorizationProvider::new(Arc::clone(&transport), Arc::clone(&clock), Arc::clone(&config));
        Self {
            shared: Arc::new(Shared {
                transport,
                accounts,
                clock,
                config,
                provider,
                refresh: Mutex::new(RefreshSlot::default()),
            }),
        }
    }

    /// The account store backing this pipeline.
    #[must_use]
    pub fn accounts(&self) -> &AccountStore {
        &self.shared.accounts
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Current authorization state for display.
    #[must_use]
    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.shared.accounts.snapshot().status_at(self.shared.clock.now())
    }

    /// Logs in with `grant` and persists the resulting tokens.
    ///
    /// # Errors
    ///
    /// - `Transport` if the server refuses the grant or is unreachable
    /// - `MalformedTokenPayload` if the response cannot be parsed
    /// - `StorageUnavailable` if the tokens could not be persisted
    pub async fn authorize(
        &self,
        grant: &AuthorizationGrant,
        progress: &ProgressReporter,
    ) -> RequestResult<AuthorizationData> {
        info!(provider = grant.kind(), "authorizing");
        let data = self.shared.provider.authorize(grant, progress).await?;
        self.shared.accounts.update(data.clone()).await?;
        progress.complete();
        info!(provider = grant.kind(), expires_at = %data.access_token.expires_at, "authorized");
        Ok(data)
    }

    /// Logs in as this installation, using the stored device id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::authorize`].
    pub async fn authorize_device(&self, progress: &ProgressReporter) -> RequestResult<AuthorizationData> {
        let grant = AuthorizationGrant::device_id(self.shared.accounts.device_id());
        self.authorize(&grant, progress).await
    }

    /// Forgets the stored tokens.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the change could not be persisted.
    pub async fn sign_out(&self) -> RequestResult<()> {
        self.shared.accounts.sign_out().await
    }

    /// Persists the account record; call before the process exits.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the record could not be written.
    pub async fn shutdown(&self) -> RequestResult<()> {
        info!("flushing account record");
        self.shared.accounts.flush().await
    }

    /// Sends `request` and parses the JSON response body into `T`.
    ///
    /// An empty body parses as JSON `null`.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::send_raw`], or `MalformedResponse` if the body
    /// does not match `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest, progress: &ProgressReporter) -> RequestResult<T> {
        let response = self.send_raw(request, progress).await?;
        let body: &[u8] = if response.body.is_empty() {
            b"null"
        } else {
            &response.body
        };
        serde_json::from_slice(body).map_err(|e| RequestError::MalformedResponse(e.to_string()))
    }

    /// Sends `request` and returns the successful response as is.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` if a token is needed and cannot be obtained without a login
    /// - `AuthExpired` if refreshing failed or the server rejected the refreshed token
    /// - `MalformedTokenPayload` / `StorageUnavailable` from a refresh
    /// - `Transport` for non-2xx responses and network failures
    /// - `InvalidRequest` if the path does not form a valid URL
    pub async fn send_raw(&self, request: &ApiRequest, progress: &ProgressReporter) -> RequestResult<TransportResponse> {
        let config = &self.shared.config;
        let url = config.endpoint_url(&request.path, &request.query)?;
        let timeout = request.timeout.unwrap_or_else(|| config.timeout());
        let base = TransportRequest::new(request.method, url.as_str(), timeout).with_body(request.body.clone());

        if !request.use_auth {
            let response = self.dispatch(base, progress).await?;
            return Self::complete(response, progress);
        }

        let mut refreshed = false;
        let mut token = match self.check_token(request.can_refresh_if_needed)? {
            TokenStep::Ready(token) => token,
            TokenStep::Wait(in_flight) => {
                refreshed = true;
                self.await_refresh(in_flight).await?.access_token.value
            }
        };

        loop {
            let authorized = base
                .clone()
                .with_header(config.auth_header.as_str(), config.bearer_value(&token));
            let response = self.dispatch(authorized, progress).await?;

            if !config.is_auth_failure(response.status) {
                return Self::complete(response, progress);
            }

            if refreshed {
                warn!(status = response.status, path = %request.path, "token rejected after refresh");
                return Err(RequestError::AuthExpired);
            }

            debug!(status = response.status, path = %request.path, "token rejected, refreshing");
            refreshed = true;
            token = match self.check_rejected(&token, request.can_refresh_if_needed)? {
                TokenStep::Ready(token) => token,
                TokenStep::Wait(in_flight) => self.await_refresh(in_flight).await?.access_token.value,
            };
        }
    }

    async fn dispatch(&self, request: TransportRequest, progress: &ProgressReporter) -> RequestResult<TransportResponse> {
        debug!(method = %request.method, url = %request.url, "dispatching");
        Ok(self.shared.transport.send(&request, progress).await?)
    }

    fn complete(response: TransportResponse, progress: &ProgressReporter) -> RequestResult<TransportResponse> {
        if response.is_success() {
            progress.complete();
            Ok(response)
        } else {
            Err(RequestError::Transport {
                status: Some(response.status),
                body: response.body_text(),
            })
        }
    }

    /// Token check before the first dispatch.
    fn check_token(&self, can_refresh: bool) -> RequestResult<TokenStep> {
        let mut slot = self.shared.refresh.lock();
        let data = self.shared.accounts.snapshot();
        let now = self.shared.clock.now();

        if data.access_token.is_valid_at(now) {
            return Ok(TokenStep::Ready(data.access_token.value));
        }
        if !can_refresh {
            return Err(RequestError::AuthRequired);
        }
        if let Some(in_flight) = &slot.in_flight {
            return Ok(TokenStep::Wait(in_flight.clone()));
        }
        if !data.can_refresh_at(now) {
            return Err(RequestError::AuthRequired);
        }
        Ok(TokenStep::Wait(self.start_refresh(&mut slot, data)))
    }

    /// Token check after the server rejected `sent`.
    fn check_rejected(&self, sent: &str, can_refresh: bool) -> RequestResult<TokenStep> {
        if !can_refresh {
            return Err(RequestError::AuthRequired);
        }

        let mut slot = self.shared.refresh.lock();
        if let Some(in_flight) = &slot.in_flight {
            return Ok(TokenStep::Wait(in_flight.clone()));
        }

        let data = self.shared.accounts.snapshot();
        let now = self.shared.clock.now();
        if data.access_token.value != sent && data.access_token.is_valid_at(now) {
            return Ok(TokenStep::Ready(data.access_token.value));
        }
        if !data.can_refresh_at(now) {
            return Err(RequestError::AuthExpired);
        }
        Ok(TokenStep::Wait(self.start_refresh(&mut slot, data)))
    }

    /// Spawns the refresh task. Must be called with the slot locked.
    fn start_refresh(&self, slot: &mut RefreshSlot, current: AuthorizationData) -> InFlight {
        let (sender, receiver) = watch::channel(None);
        let id = slot.next_id;
        slot.next_id = slot.next_id.wrapping_add(1);
        let in_flight = InFlight {
            id,
            outcome: receiver,
        };
        slot.in_flight = Some(in_flight.clone());

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = shared.run_refresh(&current).await;
            shared.clear_in_flight(id);
            sender.send_replace(Some(outcome));
        });

        in_flight
    }

    async fn await_refresh(&self, in_flight: InFlight) -> RefreshOutcome {
        let InFlight { id, mut outcome } = in_flight;
        let result = outcome.wait_for(Option::is_some).await.map(|value| value.clone());
        match result {
            Ok(Some(outcome)) => outcome,
            Ok(None) | Err(_) => {
                warn!("token refresh ended without an outcome");
                self.shared.clear_in_flight(id);
                Err(RequestError::AuthExpired)
            }
        }
    }
}

impl Shared {
    /// Refreshes and persists. Runs on its own task.
    async fn run_refresh(&self, current: &AuthorizationData) -> RefreshOutcome {
        info!("refreshing access token");
        let refreshed = match self.provider.refresh(current).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                return Err(e);
            }
        };
        self.accounts.update(refreshed.clone()).await?;
        info!(expires_at = %refreshed.access_token.expires_at, "access token refreshed");
        Ok(refreshed)
    }

    fn clear_in_flight(&self, id: u64) {
        let mut slot = self.refresh.lock();
        if slot.in_flight.as_ref().is_some_and(|f| f.id == id) {
            slot.in_flight = None;
        }
    }
}
