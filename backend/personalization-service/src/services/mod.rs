pub mod behavior;
pub mod newsletter;
pub mod reading_time;
pub mod recommendation;
pub mod similarity;

pub use behavior::{BehaviorStorage, BehaviorStore, MemoryBehaviorStorage, RedisBehaviorStorage};
pub use newsletter::NewsletterCurator;
pub use reading_time::ReadingTimePredictor;
pub use recommendation::RecommendationScorer;
pub use similarity::{SimilarityEngine, SimilarityScore, TextFeatureExtractor};
