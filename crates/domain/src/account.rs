//! Persisted account record.

use serde::{Deserialize, Serialize};

use crate::auth::AuthorizationData;

/// Current on-disk schema version of [`AccountRecord`].
pub const ACCOUNT_SCHEMA_VERSION: u32 = 1;

/// Device identity plus the current token pair of an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Installation identifier; set once and never regenerated.
    pub device_id: String,
    /// Current token pair.
    #[serde(default)]
    pub authorization: AuthorizationData,
}

impl AccountRecord {
    /// Creates a record for a new installation with no tokens.
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            schema_version: ACCOUNT_SCHEMA_VERSION,
            device_id: device_id.into(),
            authorization: AuthorizationData::default(),
        }
    }
}
