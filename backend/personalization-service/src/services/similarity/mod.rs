// ============================================
// Content Similarity Module
// ============================================
//
// Pairwise content similarity from two signals:
// 1. Tag similarity - cosine-style overlap |A ∩ B| / sqrt(|A|·|B|)
// 2. Content similarity - Jaccard index over the lowercase word sets of
//    the first 100 body words
//
// Combined 0.6 / 0.4, always in [0, 1]. Entity overlap is reported
// alongside the score via the pluggable extractor seam.

pub mod text_features;

pub use text_features::{CapitalizedWordExtractor, TextFeatureExtractor};

use crate::models::ContentItem;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const TAG_WEIGHT: f64 = 0.6;
const CONTENT_WEIGHT: f64 = 0.4;
const BODY_WORD_LIMIT: usize = 100;
pub const DEFAULT_RELATED_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityScore {
    /// Combined tag + content similarity, in [0, 1].
    pub score: f64,
    pub common_tags: Vec<String>,
    pub common_entities: Vec<String>,
}

pub struct SimilarityEngine {
    extractor: Arc<dyn TextFeatureExtractor>,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(Arc::new(CapitalizedWordExtractor))
    }
}

impl SimilarityEngine {
    pub fn new(extractor: Arc<dyn TextFeatureExtractor>) -> Self {
        Self { extractor }
    }

    pub fn similarity(&self, a: &ContentItem, b: &ContentItem) -> SimilarityScore {
        let tags_a: HashSet<String> = a.tags.iter().map(|t| t.to_lowercase()).collect();
        let tags_b: HashSet<String> = b.tags.iter().map(|t| t.to_lowercase()).collect();

        let common_tags: Vec<String> = {
            let mut tags: Vec<String> = tags_a.intersection(&tags_b).cloned().collect();
            tags.sort();
            tags
        };

        let tag_similarity = if tags_a.is_empty() || tags_b.is_empty() {
            0.0
        } else {
            common_tags.len() as f64 / ((tags_a.len() * tags_b.len()) as f64).sqrt()
        };

        let words_a = leading_word_set(&a.body);
        let words_b = leading_word_set(&b.body);
        let content_similarity = jaccard(&words_a, &words_b);

        let entities_a = self.extractor.entities(&a.body);
        let entities_b: HashSet<String> = self.extractor.entities(&b.body).into_iter().collect();
        let common_entities: Vec<String> = entities_a
            .into_iter()
            .filter(|e| entities_b.contains(e))
            .collect();

        SimilarityScore {
            score: TAG_WEIGHT * tag_similarity + CONTENT_WEIGHT * content_similarity,
            common_tags,
            common_entities,
        }
    }

    /// Rank candidates by similarity to `source`, excluding the source
    /// itself, returning the top `limit`.
    pub fn find_related(
        &self,
        source: &ContentItem,
        candidates: &[ContentItem],
        limit: usize,
    ) -> Vec<ContentItem> {
        let mut scored: Vec<(&ContentItem, f64)> = candidates
            .iter()
            .filter(|candidate| candidate.id != source.id)
            .map(|candidate| (candidate, self.similarity(source, candidate).score))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        debug!(
            source = %source.id,
            candidates = candidates.len(),
            returned = scored.len().min(limit),
            "related content ranked"
        );

        scored
            .into_iter()
            .take(limit)
            .map(|(candidate, _)| candidate.clone())
            .collect()
    }
}

/// Lowercase word set of the first `BODY_WORD_LIMIT` words, punctuation
/// trimmed.
fn leading_word_set(body: &str) -> HashSet<String> {
    body.split_whitespace()
        .take(BODY_WORD_LIMIT)
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
