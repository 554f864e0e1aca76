//! Port doubles shared by the unit tests of this crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use sentinel_domain::{AccountRecord, AuthorizationData, Token, TransportRequest, TransportResponse};
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use crate::ports::{AccountError, AccountRepository, Clock, DeviceIdSource, Transport, TransportError};
use crate::progress::ProgressReporter;

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn advance(&self, secs: i64) {
        *self.now.lock() += TimeDelta::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub struct FixedDeviceId(pub &'static str);

impl DeviceIdSource for FixedDeviceId {
    fn generate_device_id(&self) -> String {
        self.0.to_string()
    }
}

/// Token payload in the default format.
pub fn token_payload(access: &str, access_secs: i64, refresh: Option<(&str, i64)>) -> Value {
    let mut payload = json!({"access": {"value": access, "expiresInSec": access_secs}});
    if let Some((value, secs)) = refresh {
        payload["refresh"] = json!({"value": value, "expiresInSec": secs});
    }
    payload
}

pub fn json_response(status: u16, body: &Value) -> TransportResponse {
    TransportResponse::new(status, serde_json::to_vec(body).unwrap())
}

/// Pair whose access token expires at `access_exp` and refresh at `refresh_exp`.
pub fn tokens(access: &str, access_exp: i64, refresh_exp: i64) -> AuthorizationData {
    AuthorizationData::new(
        Token::new(access, at(access_exp), at(0)),
        Token::new("R0", at(refresh_exp), at(0)),
    )
}

/// Transport spy: records every request and answers by endpoint.
///
/// `/auth/refresh` gets `refresh_reply`, other `/auth/` paths get
/// `login_reply`, everything else pops `api_replies` (200 `{}` when empty).
pub struct StubTransport {
    requests: Mutex<Vec<TransportRequest>>,
    login_reply: Mutex<Result<TransportResponse, TransportError>>,
    refresh_reply: Mutex<Result<TransportResponse, TransportError>>,
    api_replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    refresh_delay: Mutex<Duration>,
    api_delay: Mutex<Duration>,
    refresh_progress: Mutex<Vec<f32>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            login_reply: Mutex::new(Ok(json_response(
                200,
                &token_payload("A1", 3600, Some(("R1", 2_592_000))),
            ))),
            refresh_reply: Mutex::new(Ok(json_response(
                200,
                &token_payload("A2", 3600, Some(("R2", 2_592_000))),
            ))),
            api_replies: Mutex::new(VecDeque::new()),
            refresh_delay: Mutex::new(Duration::ZERO),
            api_delay: Mutex::new(Duration::ZERO),
            refresh_progress: Mutex::new(Vec::new()),
        })
    }

    pub fn set_login_reply(&self, reply: Result<TransportResponse, TransportError>) {
        *self.login_reply.lock() = reply;
    }

    pub fn set_refresh_reply(&self, reply: Result<TransportResponse, TransportError>) {
        *self.refresh_reply.lock() = reply;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock() = delay;
    }

    pub fn set_api_delay(&self, delay: Duration) {
        *self.api_delay.lock() = delay;
    }

    /// Progress observed by each refresh call after it reported 0.25.
    pub fn refresh_progress(&self) -> Vec<f32> {
        self.refresh_progress.lock().clone()
    }

    pub fn push_api_reply(&self, reply: Result<TransportResponse, TransportError>) {
        self.api_replies.lock().push_back(reply);
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests().iter().filter(|r| is_refresh(r)).count()
    }

    pub fn api_calls(&self) -> usize {
        self.requests().iter().filter(|r| !r.url.contains("/auth/")).count()
    }

    pub fn api_requests(&self) -> Vec<TransportRequest> {
        self.requests().into_iter().filter(|r| !r.url.contains("/auth/")).collect()
    }
}

fn is_refresh(request: &TransportRequest) -> bool {
    request.url.ends_with("/auth/refresh")
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        request: &TransportRequest,
        progress: &ProgressReporter,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request.clone());
        if is_refresh(request) {
            let delay = *self.refresh_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            progress.report(0.25);
            self.refresh_progress.lock().push(progress.current());
            return self.refresh_reply.lock().clone();
        }
        if request.url.contains("/auth/") {
            return self.login_reply.lock().clone();
        }
        let delay = *self.api_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        progress.report(0.5);
        let reply = self
            .api_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json_response(200, &json!({}))));
        if reply.is_ok() {
            progress.complete();
        }
        reply
    }
}

/// In-memory repository with failure injection and a save gate.
#[derive(Default)]
pub struct MemoryRepository {
    record: Mutex<Option<AccountRecord>>,
    corrupt: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MemoryRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_record(record: AccountRecord) -> Arc<Self> {
        let repository = Self::default();
        *repository.record.lock() = Some(record);
        Arc::new(repository)
    }

    pub fn corrupted() -> Arc<Self> {
        let repository = Self::default();
        repository.corrupt.store(true, Ordering::SeqCst);
        Arc::new(repository)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Blocks every following save until a permit is added to the returned semaphore.
    pub fn gate_saves(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<AccountRecord> {
        self.record.lock().clone()
    }
}

#[async_trait]
impl AccountRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<AccountRecord>, AccountError> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(AccountError::Corrupt("expected value at line 1".to_string()));
        }
        Ok(self.record.lock().clone())
    }

    async fn save(&self, record: &AccountRecord) -> Result<(), AccountError> {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AccountError::Io(std::io::Error::other("disk full")));
        }
        self.corrupt.store(false, Ordering::SeqCst);
        *self.record.lock() = Some(record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
