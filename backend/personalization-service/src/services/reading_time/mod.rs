// ============================================
// Reading Time Prediction Module
// ============================================
//
// Pure function from content features to predicted minutes:
//   base      = words / 200 (200 wpm baseline)
//   complexity bonus: technical vocabulary, long titles, code markers
//   image bonus: +10 seconds per embedded image
//   niche multiplier applied last (tech 1.2 / security 1.1 / gaming 1.0)
// Result is rounded and floored at 1 minute.

use crate::models::{ContentItem, ReadingFactors, ReadingPrediction};
use crate::utils::clamp01;
use std::collections::HashSet;

const WORDS_PER_MINUTE: f64 = 200.0;
const TERM_BONUS: f64 = 0.1;
const CODE_BONUS: f64 = 0.2;
const IMAGE_SECONDS: f64 = 10.0;

/// Fixed vocabulary of terms that slow a reader down.
const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "architecture",
    "authentication",
    "benchmark",
    "compiler",
    "concurrency",
    "container",
    "cryptography",
    "database",
    "encryption",
    "exploit",
    "firmware",
    "framework",
    "kernel",
    "kubernetes",
    "latency",
    "malware",
    "middleware",
    "protocol",
    "runtime",
    "throughput",
    "vulnerability",
];

const CODE_MARKERS: &[&str] = &["```", "<code>", "</code>", "#include", "function(", "=> {"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadingTimePredictor;

impl ReadingTimePredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, item: &ContentItem) -> ReadingPrediction {
        let words: Vec<&str> = item.body.split_whitespace().collect();
        let word_count = words.len();
        let base_minutes = word_count as f64 / WORDS_PER_MINUTE;

        let complexity = self.complexity(item, &words);
        let image_count = count_images(&item.body);
        let niche_multiplier = item.niche.read_time_multiplier();

        let mut minutes = base_minutes * (1.0 + complexity * 0.5);
        minutes += image_count as f64 * IMAGE_SECONDS / 60.0;
        minutes *= niche_multiplier;

        ReadingPrediction {
            minutes: (minutes.round() as u32).max(1),
            factors: ReadingFactors {
                word_count,
                base_minutes,
                complexity,
                image_count,
                niche_multiplier,
            },
        }
    }

    fn complexity(&self, item: &ContentItem, words: &[&str]) -> f64 {
        let word_set: HashSet<String> = words
            .iter()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .collect();

        let matched_terms = TECHNICAL_TERMS
            .iter()
            .filter(|term| word_set.contains(**term))
            .count();

        // Title contribution kicks in per full hundred characters; short
        // titles add nothing.
        let title_factor = ((item.title.chars().count() / 100) as f64 * TERM_BONUS).min(0.2);

        let code_factor = if CODE_MARKERS.iter().any(|m| item.body.contains(m)) {
            CODE_BONUS
        } else {
            0.0
        };

        clamp01(matched_terms as f64 * TERM_BONUS + title_factor + code_factor)
    }
}

fn count_images(body: &str) -> usize {
    body.matches("![").count() + body.matches("<img").count()
}
