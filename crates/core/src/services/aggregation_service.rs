use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;

use crate::models::series::{AggregatedSeries, CategorySeries, Granularity, PeriodKey};
use crate::models::transaction::Transaction;

/// Groups raw transactions into per-period and per-category totals.
///
/// Pure business logic — no I/O, no state. Every other analytics service
/// consumes this service's output.
///
/// The period axis is always dense: every period between the earliest and
/// latest observed transaction date appears exactly once, so downstream
/// forecasting sees a complete, gap-filled series with zero-filled holes.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate transactions into per-period income and expense totals.
    ///
    /// `category_filter` restricts the aggregation to one category
    /// (case-insensitive). An empty transaction list (or a filter matching
    /// nothing) yields an empty series — callers must handle that explicitly.
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        granularity: Granularity,
        category_filter: Option<&str>,
    ) -> AggregatedSeries {
        let selected: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| match category_filter {
                Some(cat) => t.category.eq_ignore_ascii_case(cat),
                None => true,
            })
            .collect();

        let (min_date, max_date) = match Self::date_bounds(selected.iter().map(|t| t.date)) {
            Some(bounds) => bounds,
            None => return AggregatedSeries::default(),
        };

        let labels = PeriodKey::range(min_date, max_date, granularity);
        debug!(
            "Aggregating {} transactions into {} {} periods",
            selected.len(),
            labels.len(),
            granularity
        );

        let mut income: HashMap<PeriodKey, f64> = HashMap::new();
        let mut expense: HashMap<PeriodKey, f64> = HashMap::new();
        for tx in &selected {
            let key = PeriodKey::from_date(tx.date, granularity);
            let bucket = if tx.is_income() {
                &mut income
            } else {
                &mut expense
            };
            *bucket.entry(key).or_insert(0.0) += tx.amount;
        }

        AggregatedSeries {
            labels,
            income,
            expense,
        }
    }

    /// Per-category expense series, all sharing one dense label range that
    /// spans every expense transaction.
    pub fn category_series(
        &self,
        transactions: &[Transaction],
        granularity: Granularity,
    ) -> HashMap<String, CategorySeries> {
        let expenses: Vec<&Transaction> =
            transactions.iter().filter(|t| t.is_expense()).collect();

        let (min_date, max_date) = match Self::date_bounds(expenses.iter().map(|t| t.date)) {
            Some(bounds) => bounds,
            None => return HashMap::new(),
        };
        let labels = PeriodKey::range(min_date, max_date, granularity);

        let mut series: HashMap<String, CategorySeries> = HashMap::new();
        for tx in &expenses {
            let key = PeriodKey::from_date(tx.date, granularity);
            let entry = series
                .entry(tx.category.clone())
                .or_insert_with(|| CategorySeries {
                    category: tx.category.clone(),
                    labels: labels.clone(),
                    amounts: HashMap::new(),
                });
            *entry.amounts.entry(key).or_insert(0.0) += tx.amount;
        }
        series
    }

    /// Chronological daily expense totals, one entry per calendar day from
    /// the earliest to the latest expense date (days without spending are 0).
    /// This is the input sequence for anomaly detection.
    pub fn daily_expense_totals(&self, transactions: &[Transaction]) -> Vec<f64> {
        let expenses: Vec<&Transaction> =
            transactions.iter().filter(|t| t.is_expense()).collect();

        let (min_date, max_date) = match Self::date_bounds(expenses.iter().map(|t| t.date)) {
            Some(bounds) => bounds,
            None => return Vec::new(),
        };

        let mut by_date: HashMap<NaiveDate, f64> = HashMap::new();
        for tx in &expenses {
            *by_date.entry(tx.date).or_insert(0.0) += tx.amount;
        }

        let mut totals = Vec::new();
        let mut current = min_date;
        while current <= max_date {
            totals.push(by_date.get(&current).copied().unwrap_or(0.0));
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        totals
    }

    /// Total expense per category over the whole slice.
    pub fn expenses_by_category(&self, transactions: &[Transaction]) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            *totals.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
        }
        totals
    }

    fn date_bounds(dates: impl Iterator<Item = NaiveDate> + Clone) -> Option<(NaiveDate, NaiveDate)> {
        let min = dates.clone().min()?;
        let max = dates.max()?;
        Some((min, max))
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
