use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-level content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    Tech,
    Security,
    Gaming,
}

impl Niche {
    pub fn as_str(&self) -> &'static str {
        match self {
            Niche::Tech => "tech",
            Niche::Security => "security",
            Niche::Gaming => "gaming",
        }
    }

    /// Reading-speed multiplier applied after all other prediction factors.
    pub fn read_time_multiplier(&self) -> f64 {
        match self {
            Niche::Tech => 1.2,
            Niche::Security => 1.1,
            Niche::Gaming => 1.0,
        }
    }
}

/// A single recorded user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorAction {
    View,
    Read,
    Bookmark,
    Like,
    Comment,
    Share,
}

impl BehaviorAction {
    /// Weight for preference inference. A completed read is the strongest
    /// positive signal, a bare view the weakest.
    pub fn weight(&self) -> f64 {
        match self {
            BehaviorAction::Read => 1.0,
            BehaviorAction::Bookmark => 0.8,
            BehaviorAction::Like => 0.7,
            BehaviorAction::Comment => 0.6,
            BehaviorAction::Share => 0.5,
            BehaviorAction::View => 0.3,
        }
    }
}

/// Immutable interaction event. Created once at ingestion, never mutated,
/// evicted oldest-first once a user's log exceeds the configured cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: String,
    pub user_id: String,
    pub article_id: Option<String>,
    pub action: BehaviorAction,
    pub niche: Option<Niche>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Read-only content record owned by the external content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub excerpt: String,
    pub niche: Niche,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub read_time_minutes: u32,
    #[serde(default)]
    pub is_featured: bool,
}

/// Why an item was ranked where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationReason {
    Behavior,
    Trending,
    Similarity,
    Collaborative,
}

impl RecommendationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationReason::Behavior => "behavior",
            RecommendationReason::Trending => "trending",
            RecommendationReason::Similarity => "similarity",
            RecommendationReason::Collaborative => "collaborative",
        }
    }
}

/// Ephemeral ranking output, recomputed per call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub article_id: String,
    /// Always clamped to [0, 1].
    pub score: f64,
    pub reason: RecommendationReason,
    /// How much evidence backs the score, in [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewsletterFrequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewsletterType {
    DailyDigest,
    WeeklyDeepDive,
    TopicSpecific,
    BreakingNews,
}

impl NewsletterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsletterType::DailyDigest => "daily-digest",
            NewsletterType::WeeklyDeepDive => "weekly-deep-dive",
            NewsletterType::TopicSpecific => "topic-specific",
            NewsletterType::BreakingNews => "breaking-news",
        }
    }

    /// Upper bound on articles per issue.
    pub fn max_articles(&self) -> usize {
        match self {
            NewsletterType::DailyDigest => 5,
            NewsletterType::WeeklyDeepDive => 7,
            NewsletterType::TopicSpecific => 6,
            NewsletterType::BreakingNews => 3,
        }
    }

    /// How far back a candidate may have been published and still qualify.
    pub fn recency_window_days(&self) -> i64 {
        match self {
            NewsletterType::DailyDigest => 1,
            NewsletterType::WeeklyDeepDive => 7,
            NewsletterType::TopicSpecific | NewsletterType::BreakingNews => 30,
        }
    }
}

/// Subscriber preferences, owned by the external profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberProfile {
    pub user_id: String,
    #[serde(default)]
    pub preferences: Vec<Niche>,
    #[serde(default)]
    pub topic_subscriptions: Vec<String>,
    #[serde(default)]
    pub unsubscribed_topics: Vec<String>,
    pub frequency: NewsletterFrequency,
    /// Explicit newsletter type preferences; first entry wins over the
    /// frequency-based mapping when present.
    #[serde(default)]
    pub type_preferences: Vec<NewsletterType>,
    #[serde(default)]
    pub reading_history: HashSet<String>,
}

/// Curated digest handed to the delivery collaborator. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterContent {
    pub id: String,
    pub title: String,
    pub newsletter_type: NewsletterType,
    pub articles: Vec<ContentItem>,
    /// Aggregate preference fit of the selected set, in [0, 1].
    pub personalization_score: f64,
    pub topics: Vec<String>,
    pub estimated_read_time: u32,
    pub generated_at: DateTime<Utc>,
}

/// Predicted reading time with the factor breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPrediction {
    /// Rounded, at least 1.
    pub minutes: u32,
    pub factors: ReadingFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingFactors {
    pub word_count: usize,
    pub base_minutes: f64,
    /// Combined complexity bonus, in [0, 1].
    pub complexity: f64,
    pub image_count: usize,
    pub niche_multiplier: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_weights() {
        assert_eq!(BehaviorAction::Read.weight(), 1.0);
        assert_eq!(BehaviorAction::View.weight(), 0.3);
        assert!(BehaviorAction::Bookmark.weight() > BehaviorAction::Like.weight());
    }

    #[test]
    fn test_newsletter_type_bounds() {
        assert_eq!(NewsletterType::DailyDigest.max_articles(), 5);
        assert_eq!(NewsletterType::BreakingNews.max_articles(), 3);
        assert_eq!(NewsletterType::DailyDigest.recency_window_days(), 1);
        assert_eq!(NewsletterType::WeeklyDeepDive.recency_window_days(), 7);
        assert_eq!(NewsletterType::TopicSpecific.recency_window_days(), 30);
    }

    #[test]
    fn test_niche_serde_roundtrip() {
        let json = serde_json::to_string(&Niche::Security).unwrap();
        assert_eq!(json, "\"security\"");
        let parsed: Niche = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Niche::Security);
    }
}
