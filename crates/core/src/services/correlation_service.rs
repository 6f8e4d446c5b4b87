use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::config::CorrelationConfig;
use crate::models::insight::CategoryPair;
use crate::models::transaction::Transaction;

/// Finds category pairs that repeatedly see spending on the same calendar
/// day (simple association-rule counting, no statistics involved).
pub struct CorrelationService {
    config: CorrelationConfig,
}

impl CorrelationService {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// Mine same-day co-occurrences from expense transactions.
    ///
    /// For each day with at least two distinct categories, every unordered
    /// category pair observed that day counts once. Only pairs reaching the
    /// configured minimum count are reported, highest count first (ties
    /// alphabetical so output is deterministic).
    pub fn mine(&self, transactions: &[Transaction]) -> Vec<CategoryPair> {
        // Distinct categories per day. BTreeSet keeps pair ordering stable.
        let mut categories_by_day: HashMap<NaiveDate, BTreeSet<&str>> = HashMap::new();
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            categories_by_day
                .entry(tx.date)
                .or_default()
                .insert(tx.category.as_str());
        }

        let mut counts: HashMap<(String, String), usize> = HashMap::new();
        for categories in categories_by_day.values() {
            if categories.len() < 2 {
                continue;
            }
            let day: Vec<&str> = categories.iter().copied().collect();
            for i in 0..day.len() {
                for j in (i + 1)..day.len() {
                    let key = (day[i].to_string(), day[j].to_string());
                    *counts.entry(key).or_insert(0) += 1;
                }
            }
        }

        let mut pairs: Vec<CategoryPair> = counts
            .into_iter()
            .filter(|(_, count)| *count >= self.config.min_count)
            .map(|((a, b), count)| CategoryPair {
                category_a: a,
                category_b: b,
                count,
            })
            .collect();

        pairs.sort_by(|x, y| {
            y.count
                .cmp(&x.count)
                .then_with(|| x.category_a.cmp(&y.category_a))
                .then_with(|| x.category_b.cmp(&y.category_b))
        });
        pairs
    }
}

impl Default for CorrelationService {
    fn default() -> Self {
        Self::new(CorrelationConfig::default())
    }
}
