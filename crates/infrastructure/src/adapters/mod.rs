//! Infrastructure adapters

mod device_id;
mod reqwest_client;
mod system_clock;

pub use device_id::UuidDeviceIdSource;
pub use reqwest_client::ReqwestTransport;
pub use system_clock::SystemClock;
