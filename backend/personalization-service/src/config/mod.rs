use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub behavior: BehaviorConfig,
    pub scoring: ScoringConfig,
    pub newsletter: NewsletterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BehaviorConfig {
    /// Hard cap on events retained per user; oldest evicted first.
    pub max_events: usize,
    /// How many recent events feed the aggregate preference signals.
    pub signal_window: usize,
    /// How many tags `popular_tags` returns.
    pub top_tags: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            max_events: 1000,
            signal_window: 200,
            top_tags: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub behavior_weight: f64,
    pub niche_weight: f64,
    pub tag_weight: f64,
    pub boost_weight: f64,
    /// Scale of the exponential time decay applied to behavior events (days).
    pub decay_days: f64,
    /// Window inside which the recency boost applies (days).
    pub recency_boost_days: f64,
    /// Candidates scoring at or below this are discarded.
    pub min_score: f64,
    /// Recommendation list cap.
    pub max_results: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            behavior_weight: 0.4,
            niche_weight: 0.3,
            tag_weight: 0.2,
            boost_weight: 0.1,
            decay_days: 30.0,
            recency_boost_days: 7.0,
            min_score: 0.1,
            max_results: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterConfig {
    /// Diversity pass only runs when more than this many articles were selected.
    pub diversity_threshold: usize,
    /// Per-niche quota pulled first during the diversity pass.
    pub per_niche_quota: usize,
    /// Hard cap on the diversified selection, independent of the per-type
    /// article maximum. Kept as the original product behavior.
    pub diversity_cap: usize,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            diversity_threshold: 3,
            per_niche_quota: 2,
            diversity_cap: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            behavior: BehaviorConfig::default(),
            scoring: ScoringConfig::default(),
            newsletter: NewsletterConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            behavior: BehaviorConfig {
                max_events: env_or("BEHAVIOR_MAX_EVENTS", 1000)?,
                signal_window: env_or("BEHAVIOR_SIGNAL_WINDOW", 200)?,
                top_tags: env_or("BEHAVIOR_TOP_TAGS", 10)?,
            },
            scoring: ScoringConfig {
                behavior_weight: env_or("SCORING_BEHAVIOR_WEIGHT", 0.4)?,
                niche_weight: env_or("SCORING_NICHE_WEIGHT", 0.3)?,
                tag_weight: env_or("SCORING_TAG_WEIGHT", 0.2)?,
                boost_weight: env_or("SCORING_BOOST_WEIGHT", 0.1)?,
                decay_days: env_or("SCORING_DECAY_DAYS", 30.0)?,
                recency_boost_days: env_or("SCORING_RECENCY_BOOST_DAYS", 7.0)?,
                min_score: env_or("SCORING_MIN_SCORE", 0.1)?,
                max_results: env_or("SCORING_MAX_RESULTS", 20)?,
            },
            newsletter: NewsletterConfig {
                diversity_threshold: env_or("NEWSLETTER_DIVERSITY_THRESHOLD", 3)?,
                per_niche_quota: env_or("NEWSLETTER_PER_NICHE_QUOTA", 2)?,
                diversity_cap: env_or("NEWSLETTER_DIVERSITY_CAP", 5)?,
            },
        })
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
