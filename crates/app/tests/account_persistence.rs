//! Integration tests for the file-backed account record and the pipeline
//! running on top of it.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

use sentinel_application::ports::{Clock, DeviceIdSource, Transport, TransportError};
use sentinel_application::{AccountStore, ProgressReporter, RequestError, RequestPipeline};
use sentinel_domain::{ApiRequest, AuthorizationGrant, ClientConfig, TransportRequest, TransportResponse};
use sentinel_infrastructure::{FileAccountRepository, TokioFileSystem, UuidDeviceIdSource};

/// Issues `A<n>`/`R<n>` pairs with increasing `n` and answers API calls with `{}`.
#[derive(Default)]
struct IssuingTransport {
    issued: Mutex<u32>,
    urls: Mutex<Vec<String>>,
}

impl IssuingTransport {
    fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl Transport for IssuingTransport {
    async fn send(
        &self,
        request: &TransportRequest,
        _progress: &ProgressReporter,
    ) -> Result<TransportResponse, TransportError> {
        self.urls.lock().push(request.url.clone());
        if !request.url.contains("/auth/") {
            return Ok(TransportResponse::new(200, "{}"));
        }
        let n = {
            let mut issued = self.issued.lock();
            *issued += 1;
            *issued
        };
        let body = json!({
            "access": {"value": format!("A{n}"), "expiresInSec": 3600},
            "refresh": {"value": format!("R{n}"), "expiresInSec": 2_592_000}
        });
        Ok(TransportResponse::new(200, serde_json::to_vec(&body).unwrap()))
    }
}

struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    fn advance(&self, secs: i64) {
        *self.0.lock() += TimeDelta::seconds(secs);
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

struct NamedDevice(&'static str);

impl DeviceIdSource for NamedDevice {
    fn generate_device_id(&self) -> String {
        self.0.to_string()
    }
}

async fn open_store(path: &Path, device_ids: &dyn DeviceIdSource) -> Arc<AccountStore> {
    let repository = Arc::new(FileAccountRepository::new(TokioFileSystem::new(), path));
    Arc::new(AccountStore::load(repository, device_ids).await)
}

fn pipeline(store: Arc<AccountStore>, transport: Arc<IssuingTransport>, clock: Arc<TestClock>) -> RequestPipeline {
    RequestPipeline::new(transport, store, clock, ClientConfig::new("https://game.example.com"))
}

#[tokio::test]
async fn test_first_launch_creates_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data/account.json");

    let store = open_store(&path, &UuidDeviceIdSource).await;

    assert!(path.exists());
    assert_eq!(store.device_id().len(), 36);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains(&store.device_id()));
    assert!(contents.ends_with('\n'));
}

#[tokio::test]
async fn test_device_id_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("account.json");

    let first = open_store(&path, &NamedDevice("dev-1")).await;
    drop(first);
    let second = open_store(&path, &NamedDevice("dev-2")).await;

    assert_eq!(second.device_id(), "dev-1");
}

#[tokio::test]
async fn test_corrupt_file_starts_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("account.json");
    std::fs::write(&path, "{\"schema_version\": 1, \"device_").unwrap();

    let store = open_store(&path, &NamedDevice("dev-new")).await;

    assert_eq!(store.device_id(), "dev-new");
    let reopened = open_store(&path, &NamedDevice("dev-other")).await;
    assert_eq!(reopened.device_id(), "dev-new");
}

#[tokio::test]
async fn test_tokens_survive_restart_and_refresh_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("account.json");
    let transport = Arc::new(IssuingTransport::default());
    let clock = Arc::new(TestClock(Mutex::new(DateTime::from_timestamp(1_000, 0).unwrap())));

    let first = pipeline(
        open_store(&path, &NamedDevice("dev-1")).await,
        transport.clone(),
        clock.clone(),
    );
    first
        .authorize(&AuthorizationGrant::credentials("neo", "trinity"), &ProgressReporter::disabled())
        .await
        .unwrap();
    first.shutdown().await.unwrap();
    drop(first);

    clock.advance(3_600);
    let second = pipeline(
        open_store(&path, &NamedDevice("dev-2")).await,
        transport.clone(),
        clock.clone(),
    );
    assert_eq!(second.accounts().snapshot().access_token.value, "A1");

    second
        .send_raw(&ApiRequest::get("/players/me"), &ProgressReporter::disabled())
        .await
        .unwrap();

    assert_eq!(
        transport.urls(),
        vec![
            "https://game.example.com/auth/credentials".to_string(),
            "https://game.example.com/auth/refresh".to_string(),
            "https://game.example.com/players/me".to_string(),
        ]
    );
    let reopened = open_store(&path, &NamedDevice("dev-3")).await;
    let stored = reopened.snapshot();
    assert_eq!(stored.access_token.value, "A2");
    assert_eq!(stored.refresh_token.value, "R2");
    assert_eq!(reopened.device_id(), "dev-1");
}

#[tokio::test]
async fn test_sign_out_is_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("account.json");
    let transport = Arc::new(IssuingTransport::default());
    let clock = Arc::new(TestClock(Mutex::new(DateTime::from_timestamp(1_000, 0).unwrap())));

    let pipeline = pipeline(open_store(&path, &NamedDevice("dev-1")).await, transport, clock);
    pipeline.authorize_device(&ProgressReporter::disabled()).await.unwrap();
    pipeline.sign_out().await.unwrap();

    let result = pipeline
        .send_raw(&ApiRequest::get("/players/me"), &ProgressReporter::disabled())
        .await;
    assert_eq!(result, Err(RequestError::AuthRequired));

    let reopened = open_store(&path, &NamedDevice("dev-2")).await;
    assert!(!reopened.snapshot().access_token.is_issued());
}
