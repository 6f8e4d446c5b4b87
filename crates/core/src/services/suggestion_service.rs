use std::collections::{HashMap, HashSet};

use crate::config::{SuggestionConfig, MERCHANT_PATTERNS};
use crate::models::insight::CategorySuggestion;
use crate::models::transaction::Transaction;

/// Ranks category suggestions for a new merchant name from three sources,
/// in descending priority: the user's own history for that exact merchant,
/// keywords learned from historical descriptions, and a static pattern
/// table. No machine learning — just frequency counting.
pub struct SuggestionService {
    config: SuggestionConfig,
}

impl SuggestionService {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    /// Suggest categories for `merchant`, ordered by descending confidence
    /// (deduplicated per category, keeping the best score). Pattern-table
    /// matches are only surfaced when the category already exists in the
    /// user's own vocabulary, so the engine never invents categories.
    pub fn suggest(
        &self,
        merchant: &str,
        history: &[Transaction],
    ) -> Vec<CategorySuggestion> {
        let normalized = merchant.trim().to_lowercase();
        if normalized.is_empty() || history.is_empty() {
            return Vec::new();
        }

        let used_categories: HashSet<String> = history
            .iter()
            .map(|t| t.category.to_lowercase())
            .collect();

        let mut suggestions = Vec::new();

        // Tier 1: exact merchant seen before
        if let Some((category, count)) = self.merchant_match(&normalized, history) {
            if used_categories.contains(&category.to_lowercase()) {
                let confidence =
                    (count as f64 / self.config.merchant_confidence_divisor).min(1.0);
                suggestions.push(CategorySuggestion {
                    reasoning: format!(
                        "You categorized this merchant as {category} {count} time(s) before"
                    ),
                    category,
                    confidence,
                });
            }
        }

        // Tier 2: learned description keywords
        let keyword_map = self.keyword_map(history);
        for word in Self::keywords(&normalized, self.config.min_keyword_len) {
            if let Some((category, count)) = keyword_map.get(word) {
                if *count >= self.config.keyword_min_count {
                    let confidence = (*count as f64 / self.config.keyword_confidence_divisor)
                        .min(self.config.keyword_confidence_cap);
                    suggestions.push(CategorySuggestion {
                        category: category.clone(),
                        confidence,
                        reasoning: format!(
                            "Descriptions containing \"{word}\" usually fall under {category}"
                        ),
                    });
                }
            }
        }

        // Tier 3: static pattern table, only for known categories
        for (pattern, category) in MERCHANT_PATTERNS.iter() {
            if pattern.is_match(merchant) && used_categories.contains(&category.to_lowercase()) {
                suggestions.push(CategorySuggestion {
                    category: (*category).to_string(),
                    confidence: self.config.pattern_confidence,
                    reasoning: format!("Merchant name matches a common {category} pattern"),
                });
            }
        }

        // One suggestion per category, best confidence wins
        let mut best: HashMap<String, CategorySuggestion> = HashMap::new();
        for suggestion in suggestions {
            let key = suggestion.category.to_lowercase();
            match best.get(&key) {
                Some(existing) if existing.confidence >= suggestion.confidence => {}
                _ => {
                    best.insert(key, suggestion);
                }
            }
        }

        let mut ranked: Vec<CategorySuggestion> = best.into_values().collect();
        ranked.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        ranked
    }

    /// Dominant category for an exact (lower-cased, trimmed) merchant name,
    /// with the number of times it was used. Ties break alphabetically so
    /// suggestions are deterministic.
    fn merchant_match(
        &self,
        normalized_merchant: &str,
        history: &[Transaction],
    ) -> Option<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tx in history {
            if tx.description.trim().to_lowercase() == normalized_merchant {
                *counts.entry(tx.category.as_str()).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .max_by(|(cat_a, count_a), (cat_b, count_b)| {
                count_a.cmp(count_b).then_with(|| cat_b.cmp(cat_a))
            })
            .map(|(category, count)| (category.to_string(), count))
    }

    /// keyword -> (dominant category, count) learned from all descriptions.
    fn keyword_map(&self, history: &[Transaction]) -> HashMap<String, (String, usize)> {
        let mut counts: HashMap<String, HashMap<&str, usize>> = HashMap::new();
        for tx in history {
            let description = tx.description.to_lowercase();
            for word in Self::keywords(&description, self.config.min_keyword_len) {
                *counts
                    .entry(word.to_string())
                    .or_default()
                    .entry(tx.category.as_str())
                    .or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .filter_map(|(word, by_category)| {
                by_category
                    .into_iter()
                    .max_by(|(cat_a, count_a), (cat_b, count_b)| {
                        count_a.cmp(count_b).then_with(|| cat_b.cmp(cat_a))
                    })
                    .map(|(category, count)| (word, (category.to_string(), count)))
            })
            .collect()
    }

    /// Words strictly longer than `min_len`, split on non-alphanumerics.
    fn keywords(text: &str, min_len: usize) -> impl Iterator<Item = &str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(move |w| w.len() > min_len)
    }
}

impl Default for SuggestionService {
    fn default() -> Self {
        Self::new(SuggestionConfig::default())
    }
}
