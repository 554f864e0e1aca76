//! Device identity generation.

use uuid::Uuid;

/// Generates a new device identifier.
///
/// Called once per installation, when no account record exists yet.
#[must_use]
pub fn generate_device_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_device_id_format() {
        let id = generate_device_id();
        assert_eq!(id.len(), 36);
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_generate_device_id_uniqueness() {
        assert_ne!(generate_device_id(), generate_device_id());
    }
}
