//! Clock port

use chrono::{DateTime, Utc};

/// Port for reading wall-clock time.
///
/// Token validity is a function of this clock; tests substitute a
/// manually advanced implementation to expire tokens on demand.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
