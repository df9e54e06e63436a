// ============================================
// Behavior Tracking Module
// ============================================
//
// Append-only, bounded log of per-user interaction events:
// 1. Ingest events under a per-user write lock (insertion order preserved)
// 2. Evict oldest events once the per-user cap is exceeded
// 3. Derive aggregate preference signals (niche affinity, tag frequency)
//    over a recent-events window
//
// Persistence is behind the injectable `BehaviorStorage` trait; the module
// never assumes a specific medium. A failed write drops the event with a
// warning and never blocks the read paths.

pub mod redis_storage;
pub mod store;

pub use redis_storage::RedisBehaviorStorage;
pub use store::{BehaviorStore, UserSignals};

use crate::error::Result;
use crate::models::BehaviorEvent;
use async_trait::async_trait;
use dashmap::DashMap;

/// Storage seam for per-user behavior logs.
///
/// Logs are held newest-first; `save` replaces the full log for a user.
#[async_trait]
pub trait BehaviorStorage: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Vec<BehaviorEvent>>;
    async fn save(&self, user_id: &str, events: &[BehaviorEvent]) -> Result<()>;
}

/// In-process storage backend. Default for embedded use and tests.
#[derive(Debug, Default)]
pub struct MemoryBehaviorStorage {
    logs: DashMap<String, Vec<BehaviorEvent>>,
}

impl MemoryBehaviorStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BehaviorStorage for MemoryBehaviorStorage {
    async fn load(&self, user_id: &str) -> Result<Vec<BehaviorEvent>> {
        Ok(self
            .logs
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn save(&self, user_id: &str, events: &[BehaviorEvent]) -> Result<()> {
        self.logs.insert(user_id.to_string(), events.to_vec());
        Ok(())
    }
}

/// Storage double that always fails, for degrade-path tests.
#[cfg(test)]
pub(crate) struct FailingBehaviorStorage;

#[cfg(test)]
#[async_trait]
impl BehaviorStorage for FailingBehaviorStorage {
    async fn load(&self, _user_id: &str) -> Result<Vec<BehaviorEvent>> {
        Err(crate::error::PersonalizationError::StorageUnavailable(
            "load failed".to_string(),
        ))
    }

    async fn save(&self, _user_id: &str, _events: &[BehaviorEvent]) -> Result<()> {
        Err(crate::error::PersonalizationError::StorageUnavailable(
            "save failed".to_string(),
        ))
    }
}
