pub mod config;
pub mod errors;
pub mod models;
pub mod services;

use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use config::EngineConfig;
use errors::CoreError;
use models::{
    budget::{Budget, BudgetPeriod, BudgetStatus},
    insight::{
        Anomaly, CategoryPair, CategorySuggestion, ForecastResult, HealthScore, MoneyLeak,
        Seasonality,
    },
    ledger::Ledger,
    series::{AggregatedSeries, CategorySeries, Granularity},
    transaction::{Transaction, TransactionType},
};
use services::{
    aggregation_service::AggregationService, anomaly_service::AnomalyService,
    budget_service::BudgetService, correlation_service::CorrelationService,
    forecast_service::ForecastService, health_service::HealthService, leak_service::LeakService,
    seasonality_service::SeasonalityService, suggestion_service::SuggestionService,
};

/// Main entry point for the MoneyLens core library.
///
/// Holds the transaction/budget snapshot and all analytics services that
/// operate on it. Every insight (forecast, health score, leaks, suggestions)
/// is recomputed synchronously from the current snapshot on each call —
/// there is no hidden state, no I/O, and no persistence in here. The host
/// application owns storage and rendering.
#[must_use]
pub struct MoneyLens {
    ledger: Ledger,
    config: EngineConfig,
    aggregation_service: AggregationService,
    forecast_service: ForecastService,
    seasonality_service: SeasonalityService,
    anomaly_service: AnomalyService,
    correlation_service: CorrelationService,
    budget_service: BudgetService,
    health_service: HealthService,
    leak_service: LeakService,
    suggestion_service: SuggestionService,
}

impl std::fmt::Debug for MoneyLens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoneyLens")
            .field("transactions", &self.ledger.transactions.len())
            .field("budgets", &self.ledger.budgets.len())
            .field("monthly_income", &self.ledger.monthly_income)
            .finish()
    }
}

impl MoneyLens {
    /// Create an engine over an empty ledger with default configuration.
    pub fn new() -> Self {
        Self::build(Ledger::default(), EngineConfig::default())
    }

    /// Create an engine with custom thresholds (mostly useful in tests).
    pub fn with_config(config: EngineConfig) -> Self {
        Self::build(Ledger::default(), config)
    }

    /// Wrap an existing snapshot (e.g., deserialized by the host's store).
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self::build(ledger, EngineConfig::default())
    }

    pub fn from_ledger_with_config(ledger: Ledger, config: EngineConfig) -> Self {
        Self::build(ledger, config)
    }

    // ── Transaction Management ──────────────────────────────────────

    /// Add a transaction to the ledger. Validates before adding.
    pub fn add_transaction(
        &mut self,
        tx_type: TransactionType,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let tx = Transaction::new(tx_type, amount, category, description, date);
        Self::validate_transaction(&tx)?;
        let id = tx.id;
        Self::sorted_insert(&mut self.ledger.transactions, tx);
        Ok(id)
    }

    /// Add multiple transactions at once. All are validated first; if any
    /// fails validation, none are added (all-or-nothing).
    /// Returns the IDs of all added transactions.
    pub fn add_transactions(
        &mut self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Uuid>, CoreError> {
        for tx in &transactions {
            Self::validate_transaction(tx)?;
        }
        let mut ids = Vec::with_capacity(transactions.len());
        for tx in transactions {
            ids.push(tx.id);
            Self::sorted_insert(&mut self.ledger.transactions, tx);
        }
        Ok(ids)
    }

    /// Remove a transaction by its ID.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction, CoreError> {
        let idx = self
            .ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        Ok(self.ledger.transactions.remove(idx))
    }

    /// Replace an existing transaction's fields, keeping its ID.
    /// Validates the updated transaction before committing.
    pub fn update_transaction(
        &mut self,
        id: Uuid,
        tx_type: TransactionType,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        let idx = self
            .ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;

        let updated = Transaction {
            id,
            date,
            amount,
            category: category.into(),
            description: description.into(),
            tx_type,
        };
        Self::validate_transaction(&updated)?;

        self.ledger.transactions.remove(idx);
        Self::sorted_insert(&mut self.ledger.transactions, updated);
        Ok(())
    }

    /// Get a single transaction by its ID.
    #[must_use]
    pub fn get_transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.ledger.transactions.iter().find(|t| t.id == id)
    }

    /// All transactions, oldest first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    /// Transactions within a date range (inclusive), oldest first.
    #[must_use]
    pub fn transactions_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Transaction> {
        self.ledger
            .transactions
            .iter()
            .filter(|t| t.date >= from && t.date <= to)
            .collect()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    /// Distinct category names in use, sorted alphabetically.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut categories: Vec<String> = self
            .ledger
            .transactions
            .iter()
            .filter_map(|t| {
                if seen.insert(t.category.to_lowercase()) {
                    Some(t.category.clone())
                } else {
                    None
                }
            })
            .collect();
        categories.sort();
        categories
    }

    #[must_use]
    pub fn earliest_transaction_date(&self) -> Option<NaiveDate> {
        self.ledger.transactions.first().map(|t| t.date)
    }

    #[must_use]
    pub fn latest_transaction_date(&self) -> Option<NaiveDate> {
        self.ledger.transactions.last().map(|t| t.date)
    }

    // ── Budgets & Income ────────────────────────────────────────────

    /// Create or update the budget for a category (one per category,
    /// case-insensitive).
    pub fn set_budget(
        &mut self,
        category: impl Into<String>,
        limit: f64,
    ) -> Result<(), CoreError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Budget category must not be empty".into(),
            ));
        }
        if !limit.is_finite() || limit < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Budget limit must be a non-negative number, got {limit}"
            )));
        }
        match self
            .ledger
            .budgets
            .iter_mut()
            .find(|b| b.category.eq_ignore_ascii_case(&category))
        {
            Some(existing) => existing.limit = limit,
            None => self.ledger.budgets.push(Budget::new(category, limit)),
        }
        Ok(())
    }

    /// Remove the budget for a category.
    pub fn remove_budget(&mut self, category: &str) -> Result<Budget, CoreError> {
        let idx = self
            .ledger
            .budgets
            .iter()
            .position(|b| b.category.eq_ignore_ascii_case(category))
            .ok_or_else(|| CoreError::BudgetNotFound(category.to_string()))?;
        Ok(self.ledger.budgets.remove(idx))
    }

    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    /// Set the configured monthly income used by the health score and the
    /// housing leak rule.
    pub fn set_monthly_income(&mut self, income: f64) -> Result<(), CoreError> {
        if !income.is_finite() || income < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Monthly income must be a non-negative number, got {income}"
            )));
        }
        self.ledger.monthly_income = income;
        Ok(())
    }

    #[must_use]
    pub fn monthly_income(&self) -> f64 {
        self.ledger.monthly_income
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Per-period income/expense totals over a dense, gap-free period axis.
    #[must_use]
    pub fn aggregate(
        &self,
        granularity: Granularity,
        category_filter: Option<&str>,
    ) -> AggregatedSeries {
        self.aggregation_service
            .aggregate(&self.ledger.transactions, granularity, category_filter)
    }

    /// Per-category expense series sharing one dense label range.
    #[must_use]
    pub fn category_series(&self, granularity: Granularity) -> HashMap<String, CategorySeries> {
        self.aggregation_service
            .category_series(&self.ledger.transactions, granularity)
    }

    /// Exponentially smoothed monthly expense totals, for chart display.
    #[must_use]
    pub fn smoothed_expenses(&self, granularity: Granularity) -> Vec<f64> {
        let series = self.aggregate(granularity, None);
        self.forecast_service.smooth(&series.expense_values())
    }

    /// Full spending forecast over the monthly expense series: next/3/6
    /// period projections, trend and seasonality labels, per-category
    /// detail. Degraded inputs produce fallback values, never errors.
    #[must_use]
    pub fn forecast(&self) -> ForecastResult {
        let series = self.aggregate(Granularity::Month, None);
        let categories = self.category_series(Granularity::Month);
        let seasonality = self.seasonality_service.detect(&series.expense_values());
        self.forecast_service
            .forecast(&series, &categories, seasonality)
    }

    /// Seasonality verdict for the monthly expense series.
    #[must_use]
    pub fn detect_seasonality(&self) -> Seasonality {
        let series = self.aggregate(Granularity::Month, None);
        self.seasonality_service.detect(&series.expense_values())
    }

    /// Unusual daily spend totals (trailing-average deviation).
    #[must_use]
    pub fn detect_anomalies(&self) -> Vec<Anomaly> {
        let daily = self
            .aggregation_service
            .daily_expense_totals(&self.ledger.transactions);
        self.anomaly_service.detect(&daily)
    }

    /// Category pairs that co-occur on the same day often enough to report.
    #[must_use]
    pub fn mine_correlations(&self) -> Vec<CategoryPair> {
        self.correlation_service.mine(&self.ledger.transactions)
    }

    /// Per-budget status for the selected period, anchored at `as_of`.
    pub fn budget_status(
        &self,
        period: BudgetPeriod,
        as_of: NaiveDate,
    ) -> Result<Vec<BudgetStatus>, CoreError> {
        if let BudgetPeriod::LastMonths(0) = period {
            return Err(CoreError::ValidationError(
                "LastMonths period requires at least 1 month".into(),
            ));
        }
        Ok(self
            .budget_service
            .status(&self.ledger.transactions, &self.ledger.budgets, period, as_of))
    }

    /// Financial health score in [0, 100] with four labeled sub-factors.
    /// With an empty ledger, returns `default_score` and zeroed factors.
    #[must_use]
    pub fn health_score(&self, default_score: f64) -> HealthScore {
        self.health_service.score(
            &self.ledger.transactions,
            &self.ledger.budgets,
            self.ledger.monthly_income,
            default_score,
        )
    }

    /// Run the money-leak rules over the current month (anchored at
    /// `as_of`).
    #[must_use]
    pub fn detect_money_leaks(&self, as_of: NaiveDate) -> Vec<MoneyLeak> {
        let window = BudgetService::window(BudgetPeriod::CurrentMonth, as_of);
        let period_transactions: Vec<Transaction> = self
            .ledger
            .transactions
            .iter()
            .filter(|t| match window {
                Some((start, end)) => t.date >= start && t.date <= end,
                None => true,
            })
            .cloned()
            .collect();
        self.leak_service
            .detect(&period_transactions, self.ledger.monthly_income)
    }

    /// Ranked category suggestions for a merchant name, learned from the
    /// ledger history plus the static pattern table.
    #[must_use]
    pub fn suggest_category(&self, merchant: &str) -> Vec<CategorySuggestion> {
        self.suggestion_service
            .suggest(merchant, &self.ledger.transactions)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export the full ledger snapshot as pretty JSON (for debugging or for
    /// the host's store to persist).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    /// Import transactions from a JSON array. Validates each transaction;
    /// all-or-nothing. Returns the number of transactions imported.
    pub fn import_transactions_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let transactions: Vec<Transaction> = serde_json::from_str(json)?;
        let count = transactions.len();
        self.add_transactions(transactions)?;
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(mut ledger: Ledger, config: EngineConfig) -> Self {
        ledger.transactions.sort_by_key(|t| t.date);
        Self {
            aggregation_service: AggregationService::new(),
            forecast_service: ForecastService::new(config.forecast.clone()),
            seasonality_service: SeasonalityService::new(config.seasonality.clone()),
            anomaly_service: AnomalyService::new(config.anomaly.clone()),
            correlation_service: CorrelationService::new(config.correlation.clone()),
            budget_service: BudgetService::new(config.budget.clone()),
            health_service: HealthService::new(),
            leak_service: LeakService::new(config.leak.clone()),
            suggestion_service: SuggestionService::new(config.suggestion.clone()),
            ledger,
            config,
        }
    }

    fn validate_transaction(tx: &Transaction) -> Result<(), CoreError> {
        if !tx.amount.is_finite() || tx.amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Transaction amount must be a non-negative number, got {}",
                tx.amount
            )));
        }
        if tx.category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction category must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Binary insert into the date-sorted transaction list in O(log n).
    fn sorted_insert(transactions: &mut Vec<Transaction>, tx: Transaction) {
        let pos = transactions
            .binary_search_by_key(&tx.date, |t| t.date)
            .unwrap_or_else(|pos| pos);
        transactions.insert(pos, tx);
    }
}

impl Default for MoneyLens {
    fn default() -> Self {
        Self::new()
    }
}
