use std::collections::HashMap;

use log::debug;

use crate::config::LeakConfig;
use crate::models::insight::{MoneyLeak, Severity};
use crate::models::transaction::Transaction;

/// Rule-based heuristics flagging categories whose spend looks avoidable.
///
/// Operates on the transaction slice it is given (the "active period",
/// typically one month). Each rule is evaluated independently; a category
/// triggers at most one leak. Costs are period totals with
/// `yearly = monthly * 12`.
pub struct LeakService {
    config: LeakConfig,
}

impl LeakService {
    pub fn new(config: LeakConfig) -> Self {
        Self { config }
    }

    /// Run every leak rule over the period's transactions.
    pub fn detect(&self, transactions: &[Transaction], monthly_income: f64) -> Vec<MoneyLeak> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        let mut total_spend = 0.0;
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            *totals.entry(tx.category.to_lowercase()).or_insert(0.0) += tx.amount;
            total_spend += tx.amount;
        }
        debug!(
            "Leak scan over {} categories, total spend {total_spend:.2}",
            totals.len()
        );

        let spend = |category: &str| totals.get(category).copied().unwrap_or(0.0);
        let share = |amount: f64| {
            if total_spend > 0.0 {
                amount / total_spend
            } else {
                0.0
            }
        };

        let mut leaks = Vec::new();
        let cfg = &self.config;

        // Coffee: meaningful absolute spend plus a meaningful share of the
        // total, or coffee outspending dining outright.
        let coffee = spend("coffee");
        let dining = spend("dining");
        if coffee > cfg.coffee_min_spend
            && (share(coffee) > cfg.coffee_share || coffee > dining)
        {
            let severity = if share(coffee) > cfg.coffee_high_share {
                Severity::High
            } else if share(coffee) > cfg.coffee_medium_share {
                Severity::Medium
            } else {
                Severity::Low
            };
            leaks.push(MoneyLeak {
                category: "Coffee".to_string(),
                monthly_cost: coffee,
                yearly_cost: coffee * 12.0,
                severity,
                suggestion: "Brewing at home a few days a week would recover most of this."
                    .to_string(),
            });
        }

        // Subscriptions: any spend at all is worth surfacing.
        let subscriptions = spend("subscriptions");
        if subscriptions > 0.0 {
            let severity = if share(subscriptions) > cfg.subscription_high_share {
                Severity::High
            } else if share(subscriptions) > cfg.subscription_medium_share {
                Severity::Medium
            } else {
                Severity::Low
            };
            leaks.push(MoneyLeak {
                category: "Subscriptions".to_string(),
                monthly_cost: subscriptions,
                yearly_cost: subscriptions * 12.0,
                severity,
                suggestion: "Audit your subscriptions and cancel the ones you no longer use."
                    .to_string(),
            });
        }

        // Transportation
        let transport = spend("transportation");
        if transport > cfg.transport_min_spend && share(transport) > cfg.transport_share {
            let severity = if share(transport) > cfg.transport_high_share {
                Severity::High
            } else {
                Severity::Medium
            };
            leaks.push(MoneyLeak {
                category: "Transportation".to_string(),
                monthly_cost: transport,
                yearly_cost: transport * 12.0,
                severity,
                suggestion:
                    "Ride-shares add up fast; public transit or carpooling could cut this down."
                        .to_string(),
            });
        }

        // Small-purchase accumulation across discretionary categories
        let combined = spend("shopping") + spend("entertainment") + dining;
        if combined > cfg.small_purchase_min_spend && share(combined) > cfg.small_purchase_share {
            leaks.push(MoneyLeak {
                category: "Small purchases".to_string(),
                monthly_cost: combined,
                yearly_cost: combined * 12.0,
                severity: Severity::Medium,
                suggestion:
                    "Lots of small discretionary purchases; a weekly spending cap helps here."
                        .to_string(),
            });
        }

        // Housing burden relative to income
        let housing = spend("housing");
        if monthly_income > 0.0 && housing / monthly_income > cfg.housing_income_share {
            let severity = if housing / monthly_income > cfg.housing_high_income_share {
                Severity::High
            } else {
                Severity::Medium
            };
            leaks.push(MoneyLeak {
                category: "Housing".to_string(),
                monthly_cost: housing,
                yearly_cost: housing * 12.0,
                severity,
                suggestion:
                    "Housing takes a large share of your income; consider renegotiating or downsizing."
                        .to_string(),
            });
        }

        // Forgotten subscriptions: small identical charges repeating under
        // the same description smell like auto-renewals nobody remembers.
        let mut repeat_groups: HashMap<(String, i64), usize> = HashMap::new();
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            if tx.amount < cfg.small_charge_ceiling {
                let key = (
                    tx.description.trim().to_lowercase(),
                    (tx.amount * 100.0).round() as i64,
                );
                *repeat_groups.entry(key).or_insert(0) += 1;
            }
        }
        let suspected = repeat_groups
            .values()
            .filter(|&&count| count >= cfg.small_charge_min_repeats)
            .count();
        if suspected > 0 {
            let monthly_cost = cfg.forgotten_subscription_estimate * suspected as f64;
            leaks.push(MoneyLeak {
                category: "Forgotten subscriptions".to_string(),
                monthly_cost,
                yearly_cost: monthly_cost * 12.0,
                severity: if suspected >= 3 {
                    Severity::Medium
                } else {
                    Severity::Low
                },
                suggestion: format!(
                    "{suspected} small recurring charge(s) found; check whether these renewals are still wanted."
                ),
            });
        }

        leaks
    }
}

impl Default for LeakService {
    fn default() -> Self {
        Self::new(LeakConfig::default())
    }
}
