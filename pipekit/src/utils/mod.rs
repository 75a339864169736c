//! Utility helpers for correlation ids and timestamps.

pub mod timestamps;
mod uuid_utils;

pub use timestamps::{elapsed_ms, iso_timestamp, Timestamp};
pub use uuid_utils::{generate_uuid, IdGenerator, SequentialIdGenerator, UuidGenerator};

#[cfg(test)]
pub use uuid_utils::MockIdGenerator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_is_valid() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }
}
