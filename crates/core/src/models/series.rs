use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time bucket size used for aggregation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Granularity {
    /// Calendar month buckets
    Month,
    /// Day-of-year / 7 buckets (truncating), 53 per year
    Week,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Month => write!(f, "Month"),
            Granularity::Week => write!(f, "Week"),
        }
    }
}

/// A canonical calendar bucket used as the grouping key for all series.
///
/// Month keys use ordinal 1..=12; week keys use ordinal 0..=52 computed as
/// `(day_of_year - 1) / 7` with truncation. Keys of the same granularity
/// order chronologically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PeriodKey {
    pub year: i32,
    pub ordinal: u32,
    pub granularity: Granularity,
}

impl PeriodKey {
    /// Bucket a date into its period.
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Month => Self {
                year: date.year(),
                ordinal: date.month(),
                granularity,
            },
            Granularity::Week => Self {
                year: date.year(),
                ordinal: (date.ordinal() - 1) / 7,
                granularity,
            },
        }
    }

    /// The immediately following period, rolling over year boundaries.
    pub fn succ(&self) -> Self {
        let rollover = match self.granularity {
            Granularity::Month => self.ordinal >= 12,
            Granularity::Week => self.ordinal >= 52,
        };
        if rollover {
            Self {
                year: self.year + 1,
                ordinal: match self.granularity {
                    Granularity::Month => 1,
                    Granularity::Week => 0,
                },
                granularity: self.granularity,
            }
        } else {
            Self {
                year: self.year,
                ordinal: self.ordinal + 1,
                granularity: self.granularity,
            }
        }
    }

    /// Dense, gap-free list of periods spanning `from..=to` (inclusive).
    /// Forecasting relies on this: missing periods are present with zero
    /// amounts rather than absent.
    pub fn range(from: NaiveDate, to: NaiveDate, granularity: Granularity) -> Vec<PeriodKey> {
        let last = PeriodKey::from_date(to, granularity);
        let mut current = PeriodKey::from_date(from, granularity);
        let mut keys = Vec::new();
        while current <= last {
            keys.push(current);
            current = current.succ();
        }
        keys
    }

    /// Canonical label, e.g. "2025-03" or "2025-W07".
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Month => format!("{:04}-{:02}", self.year, self.ordinal),
            Granularity::Week => format!("{:04}-W{:02}", self.year, self.ordinal),
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-period income and expense totals over a dense label range.
///
/// `labels` spans `min(date)..=max(date)` of the aggregated transactions with
/// no gaps; the maps only hold non-zero periods, and the `*_values` accessors
/// zero-fill against the labels. An empty input produces empty labels and
/// maps — callers must handle that explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatedSeries {
    /// Ordered, dense period keys
    pub labels: Vec<PeriodKey>,

    /// Period -> income total
    pub income: HashMap<PeriodKey, f64>,

    /// Period -> expense total
    pub expense: HashMap<PeriodKey, f64>,
}

impl AggregatedSeries {
    /// Chronological income totals, zero-filled to the label range.
    pub fn income_values(&self) -> Vec<f64> {
        self.labels
            .iter()
            .map(|k| self.income.get(k).copied().unwrap_or(0.0))
            .collect()
    }

    /// Chronological expense totals, zero-filled to the label range.
    pub fn expense_values(&self) -> Vec<f64> {
        self.labels
            .iter()
            .map(|k| self.expense.get(k).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// One category's aggregate amounts over the same dense label range as the
/// series it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySeries {
    pub category: String,

    /// Ordered, dense period keys (shared with the parent aggregation)
    pub labels: Vec<PeriodKey>,

    /// Period -> amount for this category
    pub amounts: HashMap<PeriodKey, f64>,
}

impl CategorySeries {
    /// Chronological amounts, zero-filled to the label range.
    pub fn values(&self) -> Vec<f64> {
        self.labels
            .iter()
            .map(|k| self.amounts.get(k).copied().unwrap_or(0.0))
            .collect()
    }
}
