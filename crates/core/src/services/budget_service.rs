use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::config::BudgetConfig;
use crate::models::budget::{Budget, BudgetLevel, BudgetPeriod, BudgetStatus};
use crate::models::transaction::Transaction;

/// Computes spent/remaining/percentage per budget category for a selected
/// period, plus a linear daily-rate projection for the current month.
///
/// `spent` is always recomputed from the transactions passed in — budgets
/// only carry limits, never an independent spent figure.
pub struct BudgetService {
    config: BudgetConfig,
}

impl BudgetService {
    pub fn new(config: BudgetConfig) -> Self {
        Self { config }
    }

    /// Compute the status of every budget for the selected period.
    ///
    /// `as_of` anchors the calendar: the current month, the projection's
    /// day count, and relative windows are all derived from it, keeping the
    /// computation deterministic and testable.
    pub fn status(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        period: BudgetPeriod,
        as_of: NaiveDate,
    ) -> Vec<BudgetStatus> {
        let window = Self::window(period, as_of);
        let in_window: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| match window {
                Some((start, end)) => t.date >= start && t.date <= end,
                None => true,
            })
            .collect();
        debug!(
            "Budget status for {} budgets over {} transactions in window",
            budgets.len(),
            in_window.len()
        );

        let is_current_month = period == BudgetPeriod::CurrentMonth;

        // Distinct days with any transaction this month, for the daily rate.
        // At least 1 so an early-month snapshot never divides by zero.
        let days_with_activity = if is_current_month {
            let days: HashSet<NaiveDate> = in_window.iter().map(|t| t.date).collect();
            days.len().max(1)
        } else {
            1
        };
        let days_in_month = Self::days_in_month(as_of);

        budgets
            .iter()
            .map(|budget| {
                let spent: f64 = in_window
                    .iter()
                    .filter(|t| {
                        t.is_expense() && t.category.eq_ignore_ascii_case(&budget.category)
                    })
                    .map(|t| t.amount)
                    .sum();

                let percentage = if budget.limit > 0.0 {
                    spent / budget.limit * 100.0
                } else {
                    0.0
                };

                let (projected_total, projected_percentage) = if is_current_month {
                    let daily_rate = spent / days_with_activity as f64;
                    let projected = daily_rate * days_in_month as f64;
                    let projected_pct = if budget.limit > 0.0 {
                        projected / budget.limit * 100.0
                    } else {
                        0.0
                    };
                    (Some(projected), Some(projected_pct))
                } else {
                    (None, None)
                };

                let level = self.classify(percentage, projected_percentage);

                BudgetStatus {
                    category: budget.category.clone(),
                    limit: budget.limit,
                    spent,
                    percentage,
                    projected_total,
                    projected_percentage,
                    level,
                }
            })
            .collect()
    }

    /// Danger beats warning beats good; the projection only participates
    /// when present (current-month periods).
    fn classify(&self, percentage: f64, projected_percentage: Option<f64>) -> BudgetLevel {
        let projected = projected_percentage.unwrap_or(0.0);
        if percentage >= self.config.danger_percentage
            || projected >= self.config.danger_percentage
        {
            BudgetLevel::Danger
        } else if percentage >= self.config.warning_percentage
            || projected >= self.config.warning_percentage
        {
            BudgetLevel::Warning
        } else {
            BudgetLevel::Good
        }
    }

    /// Inclusive date window for a period; `None` means all-time.
    pub fn window(period: BudgetPeriod, as_of: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match period {
            BudgetPeriod::CurrentMonth => {
                Some((Self::month_start(as_of.year(), as_of.month()), Self::month_end(as_of.year(), as_of.month())))
            }
            BudgetPeriod::LastMonth => {
                let (year, month) = Self::shift_month(as_of.year(), as_of.month(), -1);
                Some((Self::month_start(year, month), Self::month_end(year, month)))
            }
            BudgetPeriod::LastMonths(n) => {
                let back = n.max(1) as i32 - 1;
                let (year, month) = Self::shift_month(as_of.year(), as_of.month(), -back);
                Some((
                    Self::month_start(year, month),
                    Self::month_end(as_of.year(), as_of.month()),
                ))
            }
            BudgetPeriod::AllTime => None,
        }
    }

    fn month_start(year: i32, month: u32) -> NaiveDate {
        // month is always 1..=12 here, from chrono or shift_month
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    fn month_end(year: i32, month: u32) -> NaiveDate {
        let (next_year, next_month) = Self::shift_month(year, month, 1);
        Self::month_start(next_year, next_month)
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
        let zero_based = year * 12 + month as i32 - 1 + delta;
        (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
    }

    fn days_in_month(date: NaiveDate) -> u32 {
        Self::month_end(date.year(), date.month()).day()
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}
