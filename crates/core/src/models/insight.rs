use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of a fitted spending trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Increasing => write!(f, "Increasing"),
            Trend::Decreasing => write!(f, "Decreasing"),
            Trend::Stable => write!(f, "Stable"),
        }
    }
}

/// Seasonality classification of a monthly series.
///
/// `InsufficientData` is a sentinel, not an error: fewer periods than the
/// detector's minimum produce it with strength 0 so the presentation layer
/// can show "not enough data" messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalityPattern {
    Stable,
    ModerateSeasonal,
    HighlySeasonal,
    InsufficientData,
}

/// Result of seasonality detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    pub pattern: SeasonalityPattern,

    /// Month-over-month variation strength, in [0, 1]
    pub strength: f64,
}

impl Seasonality {
    pub fn insufficient_data() -> Self {
        Self {
            pattern: SeasonalityPattern::InsufficientData,
            strength: 0.0,
        }
    }
}

/// Forecast detail for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForecast {
    /// Latest period's amount
    pub current: f64,

    /// Next-period projection
    pub projected: f64,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Coefficient of variation of the category series (std / mean)
    pub volatility: f64,
}

/// Full spending forecast, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Projected spend for the next period
    pub next_period: f64,

    /// Projected spend three periods out
    pub three_period: f64,

    /// Projected spend six periods out
    pub six_period: f64,

    /// Confidence in [0, 1]; exactly the fallback value (default 0.6) on
    /// degraded paths (short series, zero mean)
    pub confidence: f64,

    /// Trend label from the regression slope
    pub trend: Trend,

    /// Seasonality of the aggregate expense series
    pub seasonality: Seasonality,

    /// Per-category forecasts
    pub per_category: HashMap<String, CategoryForecast>,
}

/// A period or transaction whose value deviates sharply from its trailing
/// local average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Index into the analyzed sequence
    pub index: usize,

    /// Observed value
    pub value: f64,

    /// Trailing moving average at that index
    pub expected: f64,

    /// (value - expected) / expected * 100
    pub deviation_percent: f64,
}

/// Two categories that repeatedly see spending on the same calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPair {
    pub category_a: String,
    pub category_b: String,

    /// Number of distinct days both categories were spent on
    pub count: usize,
}

/// The four health-score sub-factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthFactorKind {
    IncomeVsExpense,
    SavingsRate,
    BudgetAdherence,
    SpendingConsistency,
}

impl std::fmt::Display for HealthFactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthFactorKind::IncomeVsExpense => write!(f, "Income vs expense"),
            HealthFactorKind::SavingsRate => write!(f, "Savings rate"),
            HealthFactorKind::BudgetAdherence => write!(f, "Budget adherence"),
            HealthFactorKind::SpendingConsistency => write!(f, "Spending consistency"),
        }
    }
}

/// One labeled sub-factor of the health score, worth up to 25 points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthFactor {
    pub kind: HealthFactorKind,

    /// Points awarded, in [0, 25]
    pub value: f64,
}

/// Overall financial health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Total score, in [0, 100]
    pub total: f64,

    /// The four sub-factors, in fixed order
    pub factors: Vec<HealthFactor>,
}

/// Severity tier of a detected money leak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
        }
    }
}

/// A spending category flagged as likely wasteful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyLeak {
    /// Flagged category (or synthetic label for the forgotten-subscription
    /// heuristic)
    pub category: String,

    /// Estimated monthly cost of the leak
    pub monthly_cost: f64,

    /// monthly_cost * 12
    pub yearly_cost: f64,

    pub severity: Severity,

    /// Canned remediation text for the dashboard
    pub suggestion: String,
}

/// A ranked category suggestion for a merchant name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: String,

    /// Confidence in [0, 1]; suggestions are ordered by descending confidence
    pub confidence: f64,

    /// Short human-readable justification
    pub reasoning: String,
}
