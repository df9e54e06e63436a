// ============================================
// Newsletter Curation Module
// ============================================
//
// Subscriber-scoped selection of content into a bounded, diverse digest:
// 1. Pick the newsletter type (explicit preference, else frequency mapping)
// 2. Filter candidates (niche, unsubscribes, reading history, recency window)
// 3. Score per type (niche 0.4, topic overlap 0.3, quality bonuses, type term)
// 4. Select the per-type article maximum
// 5. Diversity pass across preferred niches for larger selections
// 6. Personalization score + templated title
//
// Zero eligible candidates produce an empty issue with the default title,
// never an error.

pub mod curator;

pub use curator::NewsletterCurator;
