use crate::config::NewsletterConfig;
use crate::models::{
    ContentItem, NewsletterContent, NewsletterFrequency, NewsletterType, Niche, SubscriberProfile,
};
use crate::utils::{clamp01, time_decay, Clock, IdGenerator};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

const FEATURED_BONUS: f64 = 0.1;
const SHORT_READ_BONUS: f64 = 0.05;
const WELL_TAGGED_BONUS: f64 = 0.025;
const SHORT_READ_MINUTES: u32 = 10;
const WELL_TAGGED_COUNT: usize = 2;

/// Tags that mark long-form analysis for the deep-dive bonus.
const ANALYSIS_TAGS: &[&str] = &["analysis", "deep-dive", "long-form"];

pub struct NewsletterCurator {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: NewsletterConfig,
}

impl NewsletterCurator {
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: NewsletterConfig,
    ) -> Self {
        Self { clock, ids, config }
    }

    /// Build one issue for a subscriber from the candidate catalog.
    pub fn curate(
        &self,
        profile: &SubscriberProfile,
        candidates: &[ContentItem],
    ) -> NewsletterContent {
        let now = self.clock.now();
        let kind = self.select_type(profile);

        let mut scored: Vec<(ContentItem, f64)> = candidates
            .iter()
            .filter(|candidate| self.is_eligible(profile, candidate, kind, now))
            .map(|candidate| {
                let score = self.score_candidate(profile, candidate, kind, now);
                (candidate.clone(), score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut articles: Vec<ContentItem> = scored
            .iter()
            .take(kind.max_articles())
            .map(|(item, _)| item.clone())
            .collect();

        if articles.len() > self.config.diversity_threshold {
            articles = self.diversity_pass(&scored, &profile.preferences);
        }

        let personalization_score = self.personalization_score(profile, &articles);
        let title = self.compose_title(kind, profile, &articles);
        let topics = top_topics(&articles);
        let estimated_read_time = articles.iter().map(|a| a.read_time_minutes).sum();

        info!(
            user_id = %profile.user_id,
            newsletter_type = kind.as_str(),
            eligible = scored.len(),
            selected = articles.len(),
            "newsletter curated"
        );

        NewsletterContent {
            id: self.ids.generate(),
            title,
            newsletter_type: kind,
            articles,
            personalization_score,
            topics,
            estimated_read_time,
            generated_at: now,
        }
    }

    /// Explicit type preference wins; otherwise the frequency maps to a type.
    fn select_type(&self, profile: &SubscriberProfile) -> NewsletterType {
        if let Some(kind) = profile.type_preferences.first() {
            return *kind;
        }

        match profile.frequency {
            NewsletterFrequency::Daily => NewsletterType::DailyDigest,
            NewsletterFrequency::Weekly | NewsletterFrequency::BiWeekly => {
                if profile.topic_subscriptions.is_empty() {
                    NewsletterType::WeeklyDeepDive
                } else {
                    NewsletterType::TopicSpecific
                }
            }
            NewsletterFrequency::Monthly => NewsletterType::WeeklyDeepDive,
        }
    }

    fn is_eligible(
        &self,
        profile: &SubscriberProfile,
        item: &ContentItem,
        kind: NewsletterType,
        now: DateTime<Utc>,
    ) -> bool {
        if item.id.is_empty() || item.title.is_empty() {
            warn!(article_id = %item.id, "skipping invalid newsletter candidate");
            return false;
        }

        // An empty preference set means no niche filter, not an empty feed.
        if !profile.preferences.is_empty() && !profile.preferences.contains(&item.niche) {
            return false;
        }

        let unsubscribed = item
            .tags
            .iter()
            .any(|tag| contains_ci(&profile.unsubscribed_topics, tag))
            || contains_ci(&profile.unsubscribed_topics, item.niche.as_str());
        if unsubscribed {
            return false;
        }

        if profile.reading_history.contains(&item.id) {
            return false;
        }

        let age_days = age_in_days(item, now);
        age_days >= 0.0 && age_days <= kind.recency_window_days() as f64
    }

    fn score_candidate(
        &self,
        profile: &SubscriberProfile,
        item: &ContentItem,
        kind: NewsletterType,
        now: DateTime<Utc>,
    ) -> f64 {
        let mut score = 0.0;

        // Niche match (0.4); neutral half-credit when no preferences exist.
        score += if profile.preferences.is_empty() {
            0.2
        } else if profile.preferences.contains(&item.niche) {
            0.4
        } else {
            0.0
        };

        // Topic subscription overlap (0.3).
        score += if profile.topic_subscriptions.is_empty() {
            0.15
        } else {
            let overlap = item
                .tags
                .iter()
                .filter(|tag| contains_ci(&profile.topic_subscriptions, tag))
                .count();
            0.3 * overlap as f64 / profile.topic_subscriptions.len() as f64
        };

        // Quality signals.
        if item.is_featured {
            score += FEATURED_BONUS;
        }
        if item.read_time_minutes <= SHORT_READ_MINUTES {
            score += SHORT_READ_BONUS;
        }
        if item.tags.len() > WELL_TAGGED_COUNT {
            score += WELL_TAGGED_BONUS;
        }

        // Type-specific term.
        let age_days = age_in_days(item, now);
        score += match kind {
            NewsletterType::DailyDigest => 0.15 * time_decay(age_days, 1.0),
            NewsletterType::WeeklyDeepDive => {
                let long_form = item.read_time_minutes >= SHORT_READ_MINUTES
                    || item
                        .tags
                        .iter()
                        .any(|tag| ANALYSIS_TAGS.contains(&tag.to_lowercase().as_str()));
                if long_form {
                    0.1
                } else {
                    0.0
                }
            }
            NewsletterType::BreakingNews => {
                if age_days <= 1.0 {
                    0.15
                } else {
                    0.0
                }
            }
            NewsletterType::TopicSpecific => 0.1,
        };

        clamp01(score)
    }

    /// Re-pick a larger selection so every preferred niche with inventory is
    /// represented: up to the per-niche quota of each niche's top-scored
    /// candidates first, remaining slots filled by score. The final size is
    /// capped independently of the per-type maximum.
    fn diversity_pass(
        &self,
        scored: &[(ContentItem, f64)],
        preferences: &[Niche],
    ) -> Vec<ContentItem> {
        let cap = self.config.diversity_cap;
        let mut picked: HashSet<&str> = HashSet::new();
        let mut selection: Vec<&ContentItem> = Vec::new();

        'niches: for niche in preferences {
            let mut taken = 0;
            for (item, _) in scored {
                if selection.len() >= cap {
                    break 'niches;
                }
                if item.niche == *niche && picked.insert(item.id.as_str()) {
                    selection.push(item);
                    taken += 1;
                    if taken == self.config.per_niche_quota {
                        break;
                    }
                }
            }
        }

        for (item, _) in scored {
            if selection.len() >= cap {
                break;
            }
            if picked.insert(item.id.as_str()) {
                selection.push(item);
            }
        }

        // Present in score order regardless of pick order.
        let rank: HashMap<&str, usize> = scored
            .iter()
            .enumerate()
            .map(|(idx, (item, _))| (item.id.as_str(), idx))
            .collect();
        selection.sort_by_key(|item| rank.get(item.id.as_str()).copied().unwrap_or(usize::MAX));

        debug!(selected = selection.len(), "diversity pass applied");
        selection.into_iter().cloned().collect()
    }

    /// Mean per-article preference fit: 0.5 for a preferred niche, 0.5 for
    /// any subscribed topic. Zero for an empty issue.
    fn personalization_score(&self, profile: &SubscriberProfile, articles: &[ContentItem]) -> f64 {
        if articles.is_empty() {
            return 0.0;
        }

        let total: f64 = articles
            .iter()
            .map(|item| {
                let niche_fit = if profile.preferences.contains(&item.niche) {
                    0.5
                } else {
                    0.0
                };
                let topic_fit = if item
                    .tags
                    .iter()
                    .any(|tag| contains_ci(&profile.topic_subscriptions, tag))
                {
                    0.5
                } else {
                    0.0
                };
                niche_fit + topic_fit
            })
            .sum();

        clamp01(total / articles.len() as f64)
    }

    fn compose_title(
        &self,
        kind: NewsletterType,
        profile: &SubscriberProfile,
        articles: &[ContentItem],
    ) -> String {
        match kind {
            NewsletterType::DailyDigest => match top_topics(articles).into_iter().next() {
                Some(tag) => format!("Your Daily Digest: {tag} and more"),
                None => "Your Daily Digest".to_string(),
            },
            NewsletterType::WeeklyDeepDive => match articles.first() {
                Some(lead) => format!("Deep Dive: {}", first_clause(&lead.title)),
                None => "Your Weekly Deep Dive".to_string(),
            },
            NewsletterType::TopicSpecific => match profile.topic_subscriptions.first() {
                Some(topic) => format!("This Week in {topic}"),
                None => "Your Topic Digest".to_string(),
            },
            NewsletterType::BreakingNews => match articles.first() {
                Some(lead) => format!("Breaking: {}", first_clause(&lead.title)),
                None => "Breaking News Update".to_string(),
            },
        }
    }
}

fn age_in_days(item: &ContentItem, now: DateTime<Utc>) -> f64 {
    (now - item.published_at).num_seconds() as f64 / 86_400.0
}

fn contains_ci(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|h| h.eq_ignore_ascii_case(needle))
}

/// Distinct tags across the selection, most frequent first.
fn top_topics(articles: &[ContentItem]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for article in articles {
        for tag in &article.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(5)
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Everything before the first colon or comma, trimmed.
fn first_clause(title: &str) -> String {
    title
        .split([':', ','])
        .next()
        .unwrap_or(title)
        .trim()
        .to_string()
}
