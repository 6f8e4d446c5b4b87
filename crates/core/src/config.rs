use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// All tunable constants of the analytics engine, grouped per service.
///
/// Every threshold the engine uses lives here with a documented default, so
/// tests (and adventurous hosts) can override them deterministically instead
/// of relying on magic numbers buried in the computation code.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub seasonality: SeasonalityConfig,
    pub anomaly: AnomalyConfig,
    pub correlation: CorrelationConfig,
    pub budget: BudgetConfig,
    pub leak: LeakConfig,
    pub suggestion: SuggestionConfig,
}

/// Trend forecasting constants (exponential smoothing + linear regression).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Weight given to the newest observation in exponential smoothing.
    pub smoothing_alpha: f64,

    /// Regression slope above which the trend is labeled increasing
    /// (below the negative of it: decreasing). A fixed design constant.
    pub trend_threshold: f64,

    /// Growth-rate clamp for per-category series: (min, max).
    /// Tighter than nothing, looser than the aggregate clamp — category
    /// series are short and noisy.
    pub category_growth_clamp: (f64, f64),

    /// Growth-rate clamp for the aggregate expense series: (min, max).
    pub aggregate_growth_clamp: (f64, f64),

    /// Minimum number of points before regression is attempted. Below this
    /// the forecast falls back to the arithmetic mean.
    pub min_points: usize,

    /// Confidence reported on every fallback path (short series, zero mean).
    pub fallback_confidence: f64,

    /// Floor for computed confidence: max(min_confidence, 1 - std/mean).
    pub min_confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            trend_threshold: 0.05,
            category_growth_clamp: (-0.15, 0.20),
            aggregate_growth_clamp: (-0.10, 0.15),
            min_points: 3,
            fallback_confidence: 0.6,
            min_confidence: 0.5,
        }
    }
}

/// Seasonality classification constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityConfig {
    /// Minimum number of periods required; fewer yields `InsufficientData`.
    pub min_periods: usize,

    /// Strength below this is classified `Stable`.
    pub stable_below: f64,

    /// Strength below this (and at or above `stable_below`) is
    /// `ModerateSeasonal`; anything higher is `HighlySeasonal`.
    pub moderate_below: f64,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            min_periods: 6,
            stable_below: 0.1,
            moderate_below: 0.3,
        }
    }
}

/// Rolling-window anomaly detection constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Minimum sequence length; shorter sequences yield no anomalies.
    pub min_points: usize,

    /// Trailing window size for the local mean and standard deviation.
    pub window: usize,

    /// A point is anomalous when it deviates from the local mean by more
    /// than this multiple of the local standard deviation.
    pub deviation_multiplier: f64,

    /// Absolute floor: the point must also exceed the local mean by this
    /// amount, suppressing noise on near-zero series.
    pub absolute_floor: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_points: 7,
            window: 3,
            deviation_multiplier: 2.0,
            absolute_floor: 50.0,
        }
    }
}

/// Category co-occurrence mining constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// A category pair is reportable once it co-occurs on at least this
    /// many distinct days.
    pub min_count: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self { min_count: 3 }
    }
}

/// Budget status thresholds, in percent of the budget limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// At or above this percentage (actual or current-month projection) the
    /// status is `Warning`.
    pub warning_percentage: f64,

    /// At or above this percentage (actual or current-month projection) the
    /// status is `Danger`. Takes precedence over `Warning`.
    pub danger_percentage: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            warning_percentage: 80.0,
            danger_percentage: 100.0,
        }
    }
}

/// Money-leak rule thresholds. Heuristic constants with no deeper
/// derivation; kept configurable on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeakConfig {
    /// Coffee: minimum monthly spend before the rule can trigger.
    pub coffee_min_spend: f64,
    /// Coffee: minimum share of total spend (0.03 = 3%).
    pub coffee_share: f64,
    /// Coffee severity: above this share of total spend => Medium.
    pub coffee_medium_share: f64,
    /// Coffee severity: above this share of total spend => High.
    pub coffee_high_share: f64,

    /// Subscriptions severity: above this share of total spend => Medium.
    pub subscription_medium_share: f64,
    /// Subscriptions severity: above this share of total spend => High.
    pub subscription_high_share: f64,

    /// Transportation: minimum monthly spend before the rule can trigger.
    pub transport_min_spend: f64,
    /// Transportation: minimum share of total spend.
    pub transport_share: f64,
    /// Transportation severity: above this share of total spend => High.
    pub transport_high_share: f64,

    /// Small purchases (Shopping + Entertainment + Dining): combined floor.
    pub small_purchase_min_spend: f64,
    /// Small purchases: minimum combined share of total spend.
    pub small_purchase_share: f64,

    /// Housing: share of income above which the rule triggers.
    pub housing_income_share: f64,
    /// Housing severity: above this share of income => High.
    pub housing_high_income_share: f64,

    /// Forgotten subscriptions: only charges strictly below this amount are
    /// considered small recurring charges.
    pub small_charge_ceiling: f64,
    /// Forgotten subscriptions: a (description, amount) group needs at least
    /// this many occurrences to count as one suspected subscription.
    pub small_charge_min_repeats: usize,
    /// Estimated monthly cost per suspected forgotten subscription.
    pub forgotten_subscription_estimate: f64,
}

impl Default for LeakConfig {
    fn default() -> Self {
        Self {
            coffee_min_spend: 50.0,
            coffee_share: 0.03,
            coffee_medium_share: 0.05,
            coffee_high_share: 0.10,
            subscription_medium_share: 0.05,
            subscription_high_share: 0.08,
            transport_min_spend: 100.0,
            transport_share: 0.08,
            transport_high_share: 0.15,
            small_purchase_min_spend: 200.0,
            small_purchase_share: 0.15,
            housing_income_share: 0.35,
            housing_high_income_share: 0.40,
            small_charge_ceiling: 20.0,
            small_charge_min_repeats: 2,
            forgotten_subscription_estimate: 10.0,
        }
    }
}

/// Category suggestion constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Merchant-match confidence is min(times_seen / divisor, 1).
    pub merchant_confidence_divisor: f64,

    /// A keyword must map to a category at least this many times before it
    /// is allowed to drive a suggestion.
    pub keyword_min_count: usize,

    /// Keyword-match confidence is min(count / divisor, cap).
    pub keyword_confidence_divisor: f64,
    pub keyword_confidence_cap: f64,

    /// Flat confidence assigned to static pattern-table matches.
    pub pattern_confidence: f64,

    /// UI auto-select policy: the host may auto-apply the top suggestion
    /// when its confidence exceeds this. The engine only reports it.
    pub auto_select_threshold: f64,

    /// Keywords must be strictly longer than this many characters.
    pub min_keyword_len: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            merchant_confidence_divisor: 3.0,
            keyword_min_count: 2,
            keyword_confidence_divisor: 4.0,
            keyword_confidence_cap: 0.8,
            pattern_confidence: 0.65,
            auto_select_threshold: 0.8,
            min_keyword_len: 3,
        }
    }
}

// ── Static lookup tables ────────────────────────────────────────────
//
// These used to be duplicated across dashboard components; the engine owns
// them now so every consumer sees the same mapping.

/// Display metadata for the well-known categories: (category, icon, color).
pub const CATEGORY_STYLES: &[(&str, &str, &str)] = &[
    ("Coffee", "coffee", "#8d6e63"),
    ("Groceries", "shopping-cart", "#66bb6a"),
    ("Dining", "utensils", "#ff7043"),
    ("Transportation", "car", "#42a5f5"),
    ("Subscriptions", "repeat", "#ab47bc"),
    ("Shopping", "shopping-bag", "#ec407a"),
    ("Entertainment", "film", "#ffa726"),
    ("Housing", "home", "#26a69a"),
    ("Utilities", "zap", "#ffee58"),
    ("Pharmacy", "heart", "#ef5350"),
    ("Fitness", "activity", "#7e57c2"),
    ("Salary", "briefcase", "#9ccc65"),
];

/// Look up the (icon, color) pair for a category name (case-insensitive).
pub fn category_style(category: &str) -> Option<(&'static str, &'static str)> {
    CATEGORY_STYLES
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(category))
        .map(|(_, icon, color)| (*icon, *color))
}

lazy_static! {
    /// Static merchant-name patterns mapped to category names. Used as the
    /// lowest-priority tier of category suggestion; a pattern match is only
    /// surfaced when the category already exists in the user's own history.
    pub static ref MERCHANT_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\b(starbucks|dunkin|costa|peet'?s|caffe|coffee|espresso)\b").unwrap(), "Coffee"),
        (Regex::new(r"(?i)\b(whole ?foods|trader joe'?s|kroger|aldi|safeway|grocer|supermarket|market)\b").unwrap(), "Groceries"),
        (Regex::new(r"(?i)\b(uber|lyft|taxi|cab|transit|metro|shell|chevron|exxon)\b").unwrap(), "Transportation"),
        (Regex::new(r"(?i)\b(netflix|spotify|hulu|disney\+?|hbo|youtube premium|prime video|apple (tv|music))\b").unwrap(), "Subscriptions"),
        (Regex::new(r"(?i)\b(restaurant|grill|pizza|sushi|bistro|diner|kitchen|burger|taco)\b").unwrap(), "Dining"),
        (Regex::new(r"(?i)\b(cvs|walgreens|rite ?aid|pharmacy|drug ?store)\b").unwrap(), "Pharmacy"),
        (Regex::new(r"(?i)\b(electric|water|gas company|utility|internet|comcast|verizon|at&t)\b").unwrap(), "Utilities"),
        (Regex::new(r"(?i)\b(gym|fitness|planet fitness|equinox|crossfit|yoga)\b").unwrap(), "Fitness"),
        (Regex::new(r"(?i)\b(amazon|ebay|etsy|walmart\.com|target\.com|aliexpress)\b").unwrap(), "Shopping"),
    ];
}
