//! Device identifier adapter

use sentinel_application::ports::DeviceIdSource;

/// Generates random UUID device identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidDeviceIdSource;

impl DeviceIdSource for UuidDeviceIdSource {
    fn generate_device_id(&self) -> String {
        sentinel_domain::generate_device_id()
    }
}
