// ============================================
// Recommendation Scoring Module
// ============================================
//
// Combines four weighted signals per candidate:
// 1. Behavior score (0.4) - action-weighted, time-decayed event relevance
// 2. Niche score (0.3) - match against the user's preferred niches
// 3. Tag score (0.2) - overlap with the user's popular tags
// 4. Boost (0.1) - featured content, plus a recency boost within 7 days
//
// Pure over a `UserSignals` snapshot and an explicit `now`, so identical
// inputs always produce identical output.

use crate::config::ScoringConfig;
use crate::models::{BehaviorEvent, ContentItem, Recommendation, RecommendationReason};
use crate::services::behavior::UserSignals;
use crate::utils::{clamp01, time_decay};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

pub struct RecommendationScorer {
    config: ScoringConfig,
}

impl Default for RecommendationScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl RecommendationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score candidates against a user-signal snapshot.
    ///
    /// Output is clamped to [0, 1], sorted descending, capped at the
    /// configured maximum, with candidates at or below the score floor
    /// discarded. Invalid candidates are skipped, never fatal.
    pub fn score(
        &self,
        signals: &UserSignals,
        candidates: &[ContentItem],
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = candidates
            .iter()
            .filter_map(|candidate| self.score_candidate(signals, candidate, now))
            .filter(|rec| rec.score > self.config.min_score)
            .collect();

        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(self.config.max_results);

        debug!(
            candidates = candidates.len(),
            recommended = recommendations.len(),
            "candidates scored"
        );

        recommendations
    }

    fn score_candidate(
        &self,
        signals: &UserSignals,
        candidate: &ContentItem,
        now: DateTime<Utc>,
    ) -> Option<Recommendation> {
        if candidate.id.is_empty() || candidate.title.is_empty() {
            warn!(article_id = %candidate.id, "skipping invalid candidate");
            return None;
        }

        let (behavior_score, relevant_events) = self.behavior_score(signals, candidate, now);
        let niche_score = self.niche_score(signals, candidate);
        let tag_score = self.tag_score(signals, candidate);

        let featured = if candidate.is_featured { 1.0 } else { 0.0 };
        let recency_boost = self.recency_boost(candidate, now);

        let behavior_part = self.config.behavior_weight * behavior_score;
        let boost_part = self.config.boost_weight * featured;

        let score = clamp01(
            behavior_part
                + self.config.niche_weight * niche_score
                + self.config.tag_weight * tag_score
                + boost_part
                + recency_boost,
        );

        let reason = if recency_boost > 0.0 && recency_boost > behavior_part {
            RecommendationReason::Trending
        } else if boost_part > 0.0 && boost_part > behavior_part {
            RecommendationReason::Collaborative
        } else {
            RecommendationReason::Behavior
        };

        // Confidence tracks how much behavioral evidence backs the score.
        let confidence = (relevant_events as f64 / 10.0).clamp(0.1, 1.0);

        Some(Recommendation {
            article_id: candidate.id.clone(),
            score,
            reason,
            confidence,
        })
    }

    /// Action-weighted, time-decayed average over events relevant to the
    /// candidate (same article, overlapping tags, or same niche). Capped at 1.
    fn behavior_score(
        &self,
        signals: &UserSignals,
        candidate: &ContentItem,
        now: DateTime<Utc>,
    ) -> (f64, usize) {
        let candidate_tags: HashSet<&str> = candidate.tags.iter().map(|t| t.as_str()).collect();

        let relevant: Vec<&BehaviorEvent> = signals
            .events
            .iter()
            .filter(|event| {
                event.article_id.as_deref() == Some(candidate.id.as_str())
                    || event.niche == Some(candidate.niche)
                    || event.tags.iter().any(|t| candidate_tags.contains(t.as_str()))
            })
            .collect();

        if relevant.is_empty() {
            return (0.0, 0);
        }

        let total: f64 = relevant
            .iter()
            .map(|event| {
                let age_days = (now - event.timestamp).num_seconds() as f64 / 86_400.0;
                event.action.weight() * time_decay(age_days, self.config.decay_days)
            })
            .sum();

        let count = relevant.len();
        ((total / count as f64).min(1.0), count)
    }

    fn niche_score(&self, signals: &UserSignals, candidate: &ContentItem) -> f64 {
        if signals.preferred_niches.is_empty() {
            // No signal yet: neutral rather than punishing.
            0.5
        } else if signals.preferred_niches.contains(&candidate.niche) {
            1.0
        } else {
            0.2
        }
    }

    /// Tag overlap ratio normalized by the larger set size.
    fn tag_score(&self, signals: &UserSignals, candidate: &ContentItem) -> f64 {
        if signals.popular_tags.is_empty() {
            return 0.5;
        }
        if candidate.tags.is_empty() {
            return 0.0;
        }

        let candidate_tags: HashSet<&str> = candidate.tags.iter().map(|t| t.as_str()).collect();
        let overlap = signals
            .popular_tags
            .iter()
            .filter(|tag| candidate_tags.contains(tag.as_str()))
            .count();

        let larger = candidate_tags.len().max(signals.popular_tags.len());
        overlap as f64 / larger as f64
    }

    /// Up to +0.1 for content published within the boost window, tapering
    /// linearly to zero at the window edge.
    fn recency_boost(&self, candidate: &ContentItem, now: DateTime<Utc>) -> f64 {
        let age_days = (now - candidate.published_at).num_seconds() as f64 / 86_400.0;
        if age_days < 0.0 || age_days > self.config.recency_boost_days {
            return 0.0;
        }
        0.1 * (1.0 - age_days / self.config.recency_boost_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BehaviorAction, Niche};
    use chrono::Duration;

    fn article(id: &str, niche: Niche, tags: &[&str], age_days: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: format!("Article {id}"),
            body: "body text".to_string(),
            excerpt: String::new(),
            niche,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_at: Utc::now() - Duration::days(age_days),
            read_time_minutes: 5,
            is_featured: false,
        }
    }

    fn read_event(n: usize, niche: Niche, age_hours: i64) -> BehaviorEvent {
        BehaviorEvent {
            id: format!("evt-{n}"),
            user_id: "u1".to_string(),
            article_id: None,
            action: BehaviorAction::Read,
            niche: Some(niche),
            tags: vec![],
            timestamp: Utc::now() - Duration::hours(age_hours),
        }
    }

    fn security_reader_signals() -> UserSignals {
        UserSignals {
            events: (0..10).map(|n| read_event(n, Niche::Security, 12)).collect(),
            preferred_niches: vec![Niche::Security],
            popular_tags: vec![],
        }
    }

    #[test]
    fn test_scores_bounded_sorted_capped() {
        let scorer = RecommendationScorer::default();
        let signals = security_reader_signals();
        let candidates: Vec<ContentItem> = (0..30)
            .map(|n| article(&format!("a{n}"), Niche::Security, &[], 30))
            .collect();

        let recs = scorer.score(&signals, &candidates, Utc::now());

        assert!(recs.len() <= 20);
        assert!(!recs.is_empty());
        for rec in &recs {
            assert!(rec.score >= 0.0 && rec.score <= 1.0);
            assert!(rec.confidence >= 0.0 && rec.confidence <= 1.0);
        }
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_behavior_signal_ranks_matching_niche_higher() {
        // 10 recent security reads; equal-recency, equal-tag candidates.
        let scorer = RecommendationScorer::default();
        let signals = security_reader_signals();

        let mut candidates = Vec::new();
        for n in 0..5 {
            candidates.push(article(&format!("sec{n}"), Niche::Security, &[], 10));
        }
        for n in 0..5 {
            candidates.push(article(&format!("tech{n}"), Niche::Tech, &[], 10));
        }

        let recs = scorer.score(&signals, &candidates, Utc::now());

        let sec_min = recs
            .iter()
            .filter(|r| r.article_id.starts_with("sec"))
            .map(|r| r.score)
            .fold(f64::MAX, f64::min);
        let tech_max = recs
            .iter()
            .filter(|r| r.article_id.starts_with("tech"))
            .map(|r| r.score)
            .fold(f64::MIN, f64::max);

        assert!(sec_min > tech_max);
    }

    #[test]
    fn test_neutral_scores_without_signal() {
        let scorer = RecommendationScorer::default();
        let signals = UserSignals::default();
        let candidates = vec![article("a1", Niche::Gaming, &["esports"], 60)];

        let recs = scorer.score(&signals, &candidates, Utc::now());

        // 0.3 * 0.5 niche + 0.2 * 0.5 tags = 0.25, above the floor.
        assert_eq!(recs.len(), 1);
        assert!((recs[0].score - 0.25).abs() < 1e-9);
        assert_eq!(recs[0].reason, RecommendationReason::Behavior);
    }

    #[test]
    fn test_low_scores_discarded() {
        let scorer = RecommendationScorer::default();
        // A preference exists, so a mismatched niche scores 0.2 * 0.3 = 0.06.
        let signals = UserSignals {
            events: vec![],
            preferred_niches: vec![Niche::Security],
            popular_tags: vec!["exploit".to_string()],
        };
        let candidates = vec![article("a1", Niche::Gaming, &[], 60)];

        let recs = scorer.score(&signals, &candidates, Utc::now());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_invalid_candidate_skipped() {
        let scorer = RecommendationScorer::default();
        let signals = security_reader_signals();
        let mut bad = article("", Niche::Security, &[], 1);
        bad.title = String::new();
        let good = article("a1", Niche::Security, &[], 1);

        let recs = scorer.score(&signals, &[bad, good], Utc::now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].article_id, "a1");
    }

    #[test]
    fn test_recency_boost_upgrades_reason_to_trending() {
        let scorer = RecommendationScorer::default();
        // No behavior signal at all, fresh article: recency dominates.
        let signals = UserSignals::default();
        let candidates = vec![article("fresh", Niche::Tech, &[], 0)];

        let recs = scorer.score(&signals, &candidates, Utc::now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].reason, RecommendationReason::Trending);
    }

    #[test]
    fn test_featured_without_behavior_reads_as_collaborative() {
        let scorer = RecommendationScorer::default();
        let signals = UserSignals::default();
        let mut candidate = article("feat", Niche::Tech, &[], 30);
        candidate.is_featured = true;

        let recs = scorer.score(&signals, &[candidate], Utc::now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].reason, RecommendationReason::Collaborative);
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let scorer = RecommendationScorer::default();
        let signals = security_reader_signals();
        let candidates: Vec<ContentItem> = (0..10)
            .map(|n| article(&format!("a{n}"), Niche::Security, &["threat"], 3))
            .collect();
        let now = Utc::now();

        let first = scorer.score(&signals, &candidates, now);
        let second = scorer.score(&signals, &candidates, now);
        assert_eq!(first, second);
    }
}
