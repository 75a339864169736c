//! Correlation id generation.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Source of request and invocation ids.
///
/// Ids are opaque strings. Implementations must not hand out the same id
/// twice within one process run.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync + Debug {
    /// Returns a fresh id.
    fn generate(&self) -> String;
}

/// Random UUID v4 ids. This is the default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        generate_uuid().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids, counting from 1.
///
/// Useful in tests where event ids need to be predictable.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Returns how many ids have been generated.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_generator_is_unique() {
        let generator = UuidGenerator;
        let ids: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_uuid_generator_parses() {
        let id = UuidGenerator.generate();
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_sequential_generator() {
        let generator = SequentialIdGenerator::new("rid");
        assert_eq!(generator.generate(), "rid-1");
        assert_eq!(generator.generate(), "rid-2");
        assert_eq!(generator.issued(), 2);
    }
}
