//! Device identity port

/// Source of installation identifiers.
///
/// Called only when no account record exists yet.
pub trait DeviceIdSource: Send + Sync {
    /// Returns a new, globally unique device identifier.
    fn generate_device_id(&self) -> String;
}
