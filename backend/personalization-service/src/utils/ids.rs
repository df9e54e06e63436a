use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Injectable id source so tests can assert deterministic ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic ids with a fixed prefix, for tests.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new("evt");
        assert_eq!(ids.generate(), "evt-0");
        assert_eq!(ids.generate(), "evt-1");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidGenerator;
        assert_ne!(ids.generate(), ids.generate());
    }
}
