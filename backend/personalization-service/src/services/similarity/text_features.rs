use std::collections::HashSet;

/// Seam for entity extraction so a real NLP component can be substituted
/// without touching the similarity scoring.
pub trait TextFeatureExtractor: Send + Sync {
    /// Named entities found in a body of text, deduplicated, in order of
    /// first appearance.
    fn entities(&self, body: &str) -> Vec<String>;
}

/// Placeholder heuristic: capitalized words of three or more characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizedWordExtractor;

impl TextFeatureExtractor for CapitalizedWordExtractor {
    fn entities(&self, body: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entities = Vec::new();

        for raw in body.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if word.chars().count() < 3 {
                continue;
            }
            let starts_upper = word.chars().next().is_some_and(|c| c.is_uppercase());
            if starts_upper && seen.insert(word.to_string()) {
                entities.push(word.to_string());
            }
        }

        entities
    }
}
