use log::debug;

use crate::models::budget::Budget;
use crate::models::insight::{HealthFactor, HealthFactorKind, HealthScore};
use crate::models::series::Granularity;
use crate::models::transaction::Transaction;
use crate::services::aggregation_service::AggregationService;

/// Combines income-vs-expense ratio, savings rate, budget adherence, and
/// spending consistency into a single 0-100 score with four labeled
/// sub-factors, each worth up to 25 points.
pub struct HealthService {
    aggregation_service: AggregationService,
}

const FACTOR_CAP: f64 = 25.0;

impl HealthService {
    pub fn new() -> Self {
        Self {
            aggregation_service: AggregationService::new(),
        }
    }

    /// Score the ledger snapshot.
    ///
    /// `monthly_income` is the configured income figure; the expense side of
    /// the first two factors is the mean monthly expense over observed
    /// months, so a multi-month snapshot compares like with like. With zero
    /// transactions the caller-supplied `default_score` is returned with all
    /// four factors at 0.
    pub fn score(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        monthly_income: f64,
        default_score: f64,
    ) -> HealthScore {
        if transactions.is_empty() {
            return HealthScore {
                total: default_score.clamp(0.0, 100.0),
                factors: Self::zero_factors(),
            };
        }

        let monthly = self
            .aggregation_service
            .aggregate(transactions, Granularity::Month, None);
        let expense_by_month = monthly.expense_values();
        let months = expense_by_month.len().max(1) as f64;
        let mean_expense = expense_by_month.iter().sum::<f64>() / months;

        // Factor 1: income vs expense, 25 points at income >= expense
        let income_vs_expense =
            (FACTOR_CAP * monthly_income / mean_expense.max(1.0)).min(FACTOR_CAP);

        // Factor 2: savings rate as a percentage, capped at 25
        let savings_rate = if monthly_income > 0.0 {
            (monthly_income - mean_expense) / monthly_income
        } else {
            0.0
        };
        let savings = (savings_rate * 100.0).clamp(0.0, FACTOR_CAP);

        // Factor 3: budget adherence, averaged over configured budgets.
        // Spent is derived from the latest observed month.
        let adherence = if budgets.is_empty() {
            0.0
        } else {
            let latest = monthly.labels.last().copied();
            let ratio_sum: f64 = budgets
                .iter()
                .map(|budget| {
                    let spent: f64 = transactions
                        .iter()
                        .filter(|t| {
                            t.is_expense()
                                && t.category.eq_ignore_ascii_case(&budget.category)
                                && latest.map_or(false, |key| {
                                    crate::models::series::PeriodKey::from_date(
                                        t.date,
                                        Granularity::Month,
                                    ) == key
                                })
                        })
                        .map(|t| t.amount)
                        .sum();
                    (budget.limit / spent.max(1.0)).min(1.0)
                })
                .sum();
            ratio_sum / budgets.len() as f64 * FACTOR_CAP
        };

        // Factor 4: spending consistency, 1 - coefficient of variation of
        // monthly expense totals, clamped to [0, 1] before scaling
        let mean = expense_by_month.iter().sum::<f64>() / months;
        let cov = if mean == 0.0 {
            1.0
        } else {
            let variance = expense_by_month
                .iter()
                .map(|v| (v - mean) * (v - mean))
                .sum::<f64>()
                / months;
            variance.sqrt() / mean
        };
        let consistency = (1.0 - cov).clamp(0.0, 1.0) * FACTOR_CAP;

        let factors = vec![
            HealthFactor {
                kind: HealthFactorKind::IncomeVsExpense,
                value: income_vs_expense,
            },
            HealthFactor {
                kind: HealthFactorKind::SavingsRate,
                value: savings,
            },
            HealthFactor {
                kind: HealthFactorKind::BudgetAdherence,
                value: adherence,
            },
            HealthFactor {
                kind: HealthFactorKind::SpendingConsistency,
                value: consistency,
            },
        ];
        let total = factors.iter().map(|f| f.value).sum::<f64>().clamp(0.0, 100.0);
        debug!("Health score {total:.1} over {} months", expense_by_month.len());

        HealthScore { total, factors }
    }

    fn zero_factors() -> Vec<HealthFactor> {
        [
            HealthFactorKind::IncomeVsExpense,
            HealthFactorKind::SavingsRate,
            HealthFactorKind::BudgetAdherence,
            HealthFactorKind::SpendingConsistency,
        ]
        .into_iter()
        .map(|kind| HealthFactor { kind, value: 0.0 })
        .collect()
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
