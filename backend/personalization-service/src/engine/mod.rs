// ============================================
// Personalization Engine Facade
// ============================================
//
// Composition root the surrounding application embeds. Holds explicitly
// constructed component instances with injected dependencies (storage
// backend, clock, id generator) - no process-wide singletons, so isolated
// engine instances can run in parallel.
//
// Every operation degrades instead of failing: personalization is an
// enhancement layer, never a correctness-critical path.

use crate::config::Config;
use crate::models::{
    BehaviorEvent, ContentItem, NewsletterContent, ReadingPrediction, Recommendation,
    SubscriberProfile,
};
use crate::services::behavior::{BehaviorStorage, BehaviorStore, MemoryBehaviorStorage};
use crate::services::newsletter::NewsletterCurator;
use crate::services::reading_time::ReadingTimePredictor;
use crate::services::recommendation::RecommendationScorer;
use crate::services::similarity::{SimilarityEngine, DEFAULT_RELATED_LIMIT};
use crate::utils::{Clock, IdGenerator, SystemClock, UuidGenerator};
use std::sync::Arc;
use tracing::debug;

pub struct PersonalizationEngine {
    behavior: BehaviorStore,
    scorer: RecommendationScorer,
    predictor: ReadingTimePredictor,
    similarity: SimilarityEngine,
    curator: NewsletterCurator,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl PersonalizationEngine {
    pub fn new(
        storage: Arc<dyn BehaviorStorage>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: Config,
    ) -> Self {
        Self {
            behavior: BehaviorStore::new(storage, config.behavior),
            scorer: RecommendationScorer::new(config.scoring),
            predictor: ReadingTimePredictor::new(),
            similarity: SimilarityEngine::default(),
            curator: NewsletterCurator::new(clock.clone(), ids.clone(), config.newsletter),
            clock,
            ids,
        }
    }

    /// Engine with in-memory storage, system clock, and random ids.
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            Arc::new(MemoryBehaviorStorage::new()),
            Arc::new(SystemClock),
            Arc::new(UuidGenerator),
            config,
        )
    }

    /// Ingest one interaction event. Fire-and-forget: persistence failures
    /// are logged and swallowed. Events arriving without an id get one.
    pub async fn track_behavior(&self, mut event: BehaviorEvent) {
        if event.id.is_empty() {
            event.id = self.ids.generate();
        }
        self.behavior.record(event).await;
    }

    /// Ranked recommendations for a user over the candidate catalog.
    pub async fn generate_feed(
        &self,
        user_id: &str,
        candidates: &[ContentItem],
    ) -> Vec<Recommendation> {
        let signals = self.behavior.signals(user_id).await;
        debug!(
            user_id = %user_id,
            events = signals.events.len(),
            niches = signals.preferred_niches.len(),
            "generating feed"
        );
        self.scorer.score(&signals, candidates, self.clock.now())
    }

    pub fn predict_reading_time(&self, item: &ContentItem) -> ReadingPrediction {
        self.predictor.predict(item)
    }

    /// Most similar items to `item`, excluding itself.
    pub fn find_related(&self, item: &ContentItem, candidates: &[ContentItem]) -> Vec<ContentItem> {
        self.similarity
            .find_related(item, candidates, DEFAULT_RELATED_LIMIT)
    }

    pub fn curate_newsletter(
        &self,
        profile: &SubscriberProfile,
        candidates: &[ContentItem],
    ) -> NewsletterContent {
        self.curator.curate(profile, candidates)
    }

    /// Direct access to the behavior log signals, for callers that render
    /// preference summaries.
    pub fn behavior_store(&self) -> &BehaviorStore {
        &self.behavior
    }
}
