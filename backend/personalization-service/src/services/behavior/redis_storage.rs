// Redis-backed behavior log storage.
//
// Keys: behavior:{user_id}:events - JSON-encoded events, newest-first.

use super::BehaviorStorage;
use crate::error::{PersonalizationError, Result};
use crate::models::BehaviorEvent;
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::warn;

pub struct RedisBehaviorStorage {
    client: redis::Client,
    key_prefix: String,
}

impl RedisBehaviorStorage {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            key_prefix: "behavior".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    fn events_key(&self, user_id: &str) -> String {
        format!("{}:{}:events", self.key_prefix, user_id)
    }
}

#[async_trait]
impl BehaviorStorage for RedisBehaviorStorage {
    async fn load(&self, user_id: &str) -> Result<Vec<BehaviorEvent>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| PersonalizationError::StorageUnavailable(e.to_string()))?;

        let raw: Vec<String> = conn
            .lrange(self.events_key(user_id), 0, -1)
            .await
            .map_err(|e| PersonalizationError::StorageUnavailable(e.to_string()))?;

        // Corrupt entries are skipped rather than failing the whole log.
        let mut events = Vec::with_capacity(raw.len());
        for json in raw {
            match serde_json::from_str::<BehaviorEvent>(&json) {
                Ok(event) => events.push(event),
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "skipping corrupt behavior event");
                }
            }
        }

        Ok(events)
    }

    async fn save(&self, user_id: &str, events: &[BehaviorEvent]) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| PersonalizationError::StorageUnavailable(e.to_string()))?;

        let mut encoded = Vec::with_capacity(events.len());
        for event in events {
            let json = serde_json::to_string(event)
                .map_err(|e| PersonalizationError::Serialization(e.to_string()))?;
            encoded.push(json);
        }

        let key = self.events_key(user_id);
        let mut pipe = redis::pipe();
        pipe.atomic().del(&key);
        if !encoded.is_empty() {
            pipe.rpush(&key, encoded);
        }

        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| PersonalizationError::StorageUnavailable(e.to_string()))?;

        Ok(())
    }
}
