//! Durable holder of the installation's account record.
//!
//! The store keeps the current record in memory for synchronous token
//! checks and writes every change through the [`AccountRepository`] port.

use std::sync::Arc;

use parking_lot::RwLock;
use sentinel_domain::{AccountRecord, AuthorizationData};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{RequestError, RequestResult};
use crate::ports::{AccountRepository, DeviceIdSource};

/// Device identity plus current tokens, persisted on every change.
pub struct AccountStore {
    repository: Arc<dyn AccountRepository>,
    record: RwLock<AccountRecord>,
    /// Serializes writes so the stored record is always the last one written.
    write_lock: Mutex<()>,
}

impl AccountStore {
    /// Loads the record, or creates one for a new installation.
    ///
    /// A missing or unreadable record is replaced by a fresh one with a
    /// newly generated device id. Load-time failures are logged, never
    /// returned: a lost record only costs a new login.
    pub async fn load(repository: Arc<dyn AccountRepository>, device_ids: &dyn DeviceIdSource) -> Self {
        let existing = match repository.load().await {
            Ok(Some(record)) if !record.device_id.is_empty() => Some(record),
            Ok(Some(_)) => {
                warn!("account record has no device id, starting fresh");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "account record unreadable, starting fresh");
                None
            }
        };

        let record = if let Some(record) = existing {
            record
        } else {
            let record = AccountRecord::new(device_ids.generate_device_id());
            info!(device_id = %record.device_id, "created account record");
            if let Err(e) = repository.save(&record).await {
                warn!(error = %e, "could not persist new account record");
            }
            record
        };

        Self::with_record(repository, record)
    }

    /// Wraps an already loaded record without touching storage.
    #[must_use]
    pub fn with_record(repository: Arc<dyn AccountRepository>, record: AccountRecord) -> Self {
        Self {
            repository,
            record: RwLock::new(record),
            write_lock: Mutex::new(()),
        }
    }

    /// Current token pair.
    #[must_use]
    pub fn snapshot(&self) -> AuthorizationData {
        self.record.read().authorization.clone()
    }

    /// Current record.
    #[must_use]
    pub fn record(&self) -> AccountRecord {
        self.record.read().clone()
    }

    /// Installation identifier.
    #[must_use]
    pub fn device_id(&self) -> String {
        self.record.read().device_id.clone()
    }

    /// Replaces the token pair and persists it before returning.
    ///
    /// On success readers see the new pair only once it is stored. If the
    /// write fails the new pair is still kept in memory and
    /// `StorageUnavailable` is returned so the caller knows it may be lost
    /// on restart.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the record could not be written.
    pub async fn update(&self, authorization: AuthorizationData) -> RequestResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.record.read().clone();
        next.authorization = authorization;

        let saved = self.repository.save(&next).await;
        *self.record.write() = next;

        saved.map_err(|e| {
            warn!(error = %e, "failed to persist account record");
            RequestError::StorageUnavailable(e.to_string())
        })
    }

    /// Forgets the tokens of this installation. The device id is kept.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the record could not be written.
    pub async fn sign_out(&self) -> RequestResult<()> {
        info!("signing out");
        self.update(AuthorizationData::default()).await
    }

    /// Writes the current record again, e.g. before the process exits.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the record could not be written.
    pub async fn flush(&self) -> RequestResult<()> {
        let _guard = self.write_lock.lock().await;
        let record = self.record();
        self.repository
            .save(&record)
            .await
            .map_err(|e| RequestError::StorageUnavailable(e.to_string()))
    }
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("device_id", &self.device_id())
            .finish_non_exhaustive()
    }
}
