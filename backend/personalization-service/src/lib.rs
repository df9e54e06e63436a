pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use engine::PersonalizationEngine;
pub use error::{PersonalizationError, Result};
pub use services::{
    BehaviorStore, NewsletterCurator, ReadingTimePredictor, RecommendationScorer, SimilarityEngine,
};
