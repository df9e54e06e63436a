use super::BehaviorStorage;
use crate::config::BehaviorConfig;
use crate::models::{BehaviorEvent, Niche};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Point-in-time snapshot of a user's preference signals, consumed by the
/// recommendation scorer so scoring stays pure.
#[derive(Debug, Clone, Default)]
pub struct UserSignals {
    /// Full retained log, newest-first.
    pub events: Vec<BehaviorEvent>,
    /// Niches by descending occurrence count over the signal window.
    pub preferred_niches: Vec<Niche>,
    /// Most frequent tags over the signal window.
    pub popular_tags: Vec<String>,
}

/// Bounded per-user behavior log with derived preference signals.
///
/// Writes for the same user are serialized through a per-user async lock so
/// the cap and insertion order hold under concurrent ingestion; writes for
/// different users are fully independent.
pub struct BehaviorStore {
    storage: Arc<dyn BehaviorStorage>,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
    config: BehaviorConfig,
}

impl BehaviorStore {
    pub fn new(storage: Arc<dyn BehaviorStorage>, config: BehaviorConfig) -> Self {
        Self {
            storage,
            write_locks: DashMap::new(),
            config,
        }
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Append an event to the owning user's log, evicting oldest entries past
    /// the cap. Storage failure drops the event with a warning; ingestion is
    /// fire-and-forget from the caller's perspective.
    pub async fn record(&self, event: BehaviorEvent) {
        let user_id = event.user_id.clone();
        let lock = self.user_lock(&user_id);
        let _guard = lock.lock().await;

        let mut events = match self.storage.load(&user_id).await {
            Ok(events) => events,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "behavior log unavailable, dropping event");
                return;
            }
        };

        // Newest-first, so truncation evicts the oldest entries.
        events.insert(0, event);
        events.truncate(self.config.max_events);

        if let Err(err) = self.storage.save(&user_id, &events).await {
            warn!(user_id = %user_id, error = %err, "failed to persist behavior event, dropping");
            return;
        }

        debug!(user_id = %user_id, log_len = events.len(), "behavior event recorded");
    }

    /// Niches ordered by descending occurrence count over the signal window.
    /// Zero-count niches are absent. Ties break by niche name so the ordering
    /// is stable across calls.
    pub async fn preferred_niches(&self, user_id: &str) -> Vec<Niche> {
        let events = self.snapshot(user_id).await;
        Self::niches_from_window(&events, self.config.signal_window)
    }

    /// The most frequent tags over the signal window, capped at the
    /// configured count.
    pub async fn popular_tags(&self, user_id: &str) -> Vec<String> {
        let events = self.snapshot(user_id).await;
        Self::tags_from_window(&events, self.config.signal_window, self.config.top_tags)
    }

    /// One consistent snapshot of the log plus both derived signals.
    pub async fn signals(&self, user_id: &str) -> UserSignals {
        let events = self.snapshot(user_id).await;
        let preferred_niches = Self::niches_from_window(&events, self.config.signal_window);
        let popular_tags =
            Self::tags_from_window(&events, self.config.signal_window, self.config.top_tags);
        UserSignals {
            events,
            preferred_niches,
            popular_tags,
        }
    }

    async fn snapshot(&self, user_id: &str) -> Vec<BehaviorEvent> {
        match self.storage.load(user_id).await {
            Ok(events) => events,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "behavior log unavailable, using empty signals");
                Vec::new()
            }
        }
    }

    fn niches_from_window(events: &[BehaviorEvent], window: usize) -> Vec<Niche> {
        let mut counts: HashMap<Niche, usize> = HashMap::new();
        for event in events.iter().take(window) {
            if let Some(niche) = event.niche {
                *counts.entry(niche).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(Niche, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        ranked.into_iter().map(|(niche, _)| niche).collect()
    }

    fn tags_from_window(events: &[BehaviorEvent], window: usize, top: usize) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for event in events.iter().take(window) {
            for tag in &event.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(top)
            .map(|(tag, _)| tag.to_string())
            .collect()
    }
}
