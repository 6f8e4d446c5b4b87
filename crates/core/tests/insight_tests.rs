// ═══════════════════════════════════════════════════════════════════
// Insight Tests — anomalies, correlations, leaks, health, suggestions
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use moneylens_core::models::insight::Severity;
use moneylens_core::models::transaction::Transaction;
use moneylens_core::services::anomaly_service::AnomalyService;
use moneylens_core::services::correlation_service::CorrelationService;
use moneylens_core::services::health_service::HealthService;
use moneylens_core::services::leak_service::LeakService;
use moneylens_core::services::suggestion_service::SuggestionService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
//  Anomaly detection
// ═══════════════════════════════════════════════════════════════════

mod anomalies {
    use super::*;

    #[test]
    fn spike_above_trailing_window_is_flagged() {
        let service = AnomalyService::default();
        let daily = [20.0, 22.0, 21.0, 19.0, 23.0, 20.0, 95.0];
        let anomalies = service.detect(&daily);

        assert_eq!(anomalies.len(), 1);
        let spike = &anomalies[0];
        assert_eq!(spike.index, 6);
        assert_eq!(spike.value, 95.0);
        assert!(close(spike.expected, (19.0 + 23.0 + 20.0) / 3.0));
        assert!(spike.deviation_percent > 300.0);
    }

    #[test]
    fn short_sequences_yield_nothing() {
        let service = AnomalyService::default();
        assert!(service.detect(&[20.0, 22.0, 21.0, 19.0, 23.0, 95.0]).is_empty());
        assert!(service.detect(&[]).is_empty());
    }

    #[test]
    fn steady_spending_has_no_anomalies() {
        let service = AnomalyService::default();
        let daily = [30.0, 31.0, 29.0, 30.0, 32.0, 28.0, 30.0, 31.0];
        assert!(service.detect(&daily).is_empty());
    }

    #[test]
    fn absolute_floor_suppresses_small_spikes() {
        let service = AnomalyService::default();
        // 40 is many local sigmas out, but not 50 above the local mean
        let daily = [1.0, 2.0, 1.0, 2.0, 1.5, 1.0, 40.0];
        assert!(service.detect(&daily).is_empty());
    }

    #[test]
    fn zero_mean_window_reports_zero_deviation_percent() {
        let service = AnomalyService::default();
        let daily = [0.0, 0.0, 0.0, 60.0, 0.0, 0.0, 0.0];
        let anomalies = service.detect(&daily);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].index, 3);
        assert_eq!(anomalies[0].expected, 0.0);
        assert_eq!(anomalies[0].deviation_percent, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Correlation mining
// ═══════════════════════════════════════════════════════════════════

mod correlations {
    use super::*;

    fn expense(category: &str, date: NaiveDate) -> Transaction {
        Transaction::expense(10.0, category, "x", date)
    }

    #[test]
    fn pair_reaching_three_days_is_reported() {
        let service = CorrelationService::default();
        let txs = vec![
            expense("Groceries", d(2025, 1, 3)),
            expense("Dining", d(2025, 1, 3)),
            expense("Groceries", d(2025, 1, 10)),
            expense("Dining", d(2025, 1, 10)),
            expense("Groceries", d(2025, 1, 17)),
            expense("Dining", d(2025, 1, 17)),
            // Only two shared days for Coffee + Dining
            expense("Coffee", d(2025, 1, 17)),
            expense("Coffee", d(2025, 1, 24)),
            expense("Dining", d(2025, 1, 24)),
        ];
        let pairs = service.mine(&txs);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].category_a, "Dining");
        assert_eq!(pairs[0].category_b, "Groceries");
        assert_eq!(pairs[0].count, 3);
    }

    #[test]
    fn multiple_transactions_per_day_count_once() {
        let service = CorrelationService::default();
        let mut txs = Vec::new();
        for day in [3, 10, 17] {
            txs.push(expense("Coffee", d(2025, 2, day)));
            txs.push(expense("Coffee", d(2025, 2, day)));
            txs.push(expense("Dining", d(2025, 2, day)));
        }
        let pairs = service.mine(&txs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].count, 3);
    }

    #[test]
    fn income_never_participates() {
        let service = CorrelationService::default();
        let mut txs = Vec::new();
        for day in [1, 8, 15, 22] {
            txs.push(Transaction::income(100.0, "Salary", "pay", d(2025, 3, day)));
            txs.push(expense("Dining", d(2025, 3, day)));
        }
        assert!(service.mine(&txs).is_empty());
    }

    #[test]
    fn pairs_sort_by_count_then_alphabetically() {
        let service = CorrelationService::default();
        let mut txs = Vec::new();
        for day in 1..=4 {
            txs.push(expense("Coffee", d(2025, 4, day)));
            txs.push(expense("Dining", d(2025, 4, day)));
        }
        for day in 10..=12 {
            txs.push(expense("Groceries", d(2025, 4, day)));
            txs.push(expense("Housing", d(2025, 4, day)));
        }
        let pairs = service.mine(&txs);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].category_a, "Coffee");
        assert_eq!(pairs[0].count, 4);
        assert_eq!(pairs[1].category_a, "Groceries");
        assert_eq!(pairs[1].count, 3);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Money leaks
// ═══════════════════════════════════════════════════════════════════

mod leaks {
    use super::*;

    fn expense(amount: f64, category: &str, description: &str) -> Transaction {
        Transaction::expense(amount, category, description, d(2025, 6, 10))
    }

    fn find<'a>(
        leaks: &'a [moneylens_core::models::insight::MoneyLeak],
        category: &str,
    ) -> Option<&'a moneylens_core::models::insight::MoneyLeak> {
        leaks.iter().find(|l| l.category == category)
    }

    #[test]
    fn coffee_at_seven_percent_is_a_medium_leak() {
        let service = LeakService::default();
        let txs = vec![
            expense(25.0, "Coffee", "latte one"),
            expense(25.0, "Coffee", "latte two"),
            expense(25.0, "Coffee", "latte three"),
            expense(925.0, "Utilities", "rent and power"),
        ];
        let leaks = service.detect(&txs, 0.0);

        assert_eq!(leaks.len(), 1);
        let coffee = find(&leaks, "Coffee").unwrap();
        assert!(close(coffee.monthly_cost, 75.0));
        assert!(close(coffee.yearly_cost, 900.0));
        assert_eq!(coffee.severity, Severity::Medium);
    }

    #[test]
    fn coffee_severity_scales_with_share() {
        let service = LeakService::default();
        let low = service.detect(
            &[expense(60.0, "Coffee", "a"), expense(1540.0, "Utilities", "b")],
            0.0,
        );
        assert_eq!(find(&low, "Coffee").unwrap().severity, Severity::Low);

        let high = service.detect(
            &[expense(200.0, "Coffee", "a"), expense(800.0, "Utilities", "b")],
            0.0,
        );
        assert_eq!(find(&high, "Coffee").unwrap().severity, Severity::High);
    }

    #[test]
    fn coffee_below_minimum_spend_never_triggers() {
        let service = LeakService::default();
        let leaks = service.detect(
            &[expense(40.0, "Coffee", "a"), expense(60.0, "Utilities", "b")],
            0.0,
        );
        assert!(find(&leaks, "Coffee").is_none());
    }

    #[test]
    fn coffee_outspending_dining_triggers_despite_small_share() {
        let service = LeakService::default();
        let leaks = service.detect(
            &[
                expense(60.0, "Coffee", "a"),
                expense(55.0, "Dining", "b"),
                expense(4885.0, "Utilities", "c"),
            ],
            0.0,
        );
        assert_eq!(find(&leaks, "Coffee").unwrap().severity, Severity::Low);
    }

    #[test]
    fn subscription_severity_tiers() {
        let service = LeakService::default();
        for (amount, severity) in [
            (30.0, Severity::Low),
            (60.0, Severity::Medium),
            (90.0, Severity::High),
        ] {
            let leaks = service.detect(
                &[
                    expense(amount, "Subscriptions", "bundle"),
                    expense(1000.0 - amount, "Utilities", "filler"),
                ],
                0.0,
            );
            let leak = find(&leaks, "Subscriptions").unwrap();
            assert_eq!(leak.severity, severity, "amount {amount}");
            assert!(close(leak.yearly_cost, amount * 12.0));
        }
    }

    #[test]
    fn transportation_needs_both_floor_and_share() {
        let service = LeakService::default();
        let medium = service.detect(
            &[expense(120.0, "Transportation", "rides"), expense(880.0, "Utilities", "x")],
            0.0,
        );
        assert_eq!(
            find(&medium, "Transportation").unwrap().severity,
            Severity::Medium
        );

        let high = service.detect(
            &[expense(200.0, "Transportation", "rides"), expense(800.0, "Utilities", "x")],
            0.0,
        );
        assert_eq!(
            find(&high, "Transportation").unwrap().severity,
            Severity::High
        );

        // Big share but under the absolute floor
        let none = service.detect(
            &[expense(90.0, "Transportation", "rides"), expense(10.0, "Utilities", "x")],
            0.0,
        );
        assert!(find(&none, "Transportation").is_none());
    }

    #[test]
    fn small_discretionary_purchases_combine() {
        let service = LeakService::default();
        let leaks = service.detect(
            &[
                expense(150.0, "Shopping", "stuff"),
                expense(100.0, "Entertainment", "movies"),
                expense(750.0, "Utilities", "x"),
            ],
            0.0,
        );
        let leak = find(&leaks, "Small purchases").unwrap();
        assert!(close(leak.monthly_cost, 250.0));
        assert_eq!(leak.severity, Severity::Medium);
    }

    #[test]
    fn housing_burden_measured_against_income() {
        let service = LeakService::default();
        let medium = service.detect(&[expense(1200.0, "Housing", "rent")], 3000.0);
        assert_eq!(find(&medium, "Housing").unwrap().severity, Severity::Medium);

        let high = service.detect(&[expense(1350.0, "Housing", "rent")], 3000.0);
        assert_eq!(find(&high, "Housing").unwrap().severity, Severity::High);

        // Without a configured income the rule stays quiet
        let none = service.detect(&[expense(1350.0, "Housing", "rent")], 0.0);
        assert!(find(&none, "Housing").is_none());
    }

    #[test]
    fn repeated_small_charges_suggest_forgotten_subscriptions() {
        let service = LeakService::default();
        let txs = vec![
            expense(9.99, "Entertainment", "netflix.com"),
            expense(9.99, "Entertainment", "netflix.com"),
            expense(4.99, "Entertainment", "spotify"),
            expense(4.99, "Entertainment", "spotify"),
        ];
        let leaks = service.detect(&txs, 0.0);
        let leak = find(&leaks, "Forgotten subscriptions").unwrap();
        assert!(close(leak.monthly_cost, 20.0));
        assert!(close(leak.yearly_cost, 240.0));
        assert_eq!(leak.severity, Severity::Low);
    }

    #[test]
    fn three_or_more_suspects_escalate_to_medium() {
        let service = LeakService::default();
        let txs = vec![
            expense(9.99, "Entertainment", "netflix.com"),
            expense(9.99, "Entertainment", "netflix.com"),
            expense(4.99, "Entertainment", "spotify"),
            expense(4.99, "Entertainment", "spotify"),
            expense(2.99, "Entertainment", "cloud storage"),
            expense(2.99, "Entertainment", "cloud storage"),
        ];
        let leaks = service.detect(&txs, 0.0);
        assert_eq!(
            find(&leaks, "Forgotten subscriptions").unwrap().severity,
            Severity::Medium
        );
    }

    #[test]
    fn one_off_small_charges_are_not_subscriptions() {
        let service = LeakService::default();
        let leaks = service.detect(&[expense(9.99, "Entertainment", "netflix.com")], 0.0);
        assert!(find(&leaks, "Forgotten subscriptions").is_none());
    }

    #[test]
    fn quiet_ledger_has_no_leaks() {
        let service = LeakService::default();
        let leaks = service.detect(
            &[
                expense(30.0, "Coffee", "a"),
                expense(400.0, "Groceries", "b"),
                expense(570.0, "Utilities", "c"),
            ],
            5000.0,
        );
        assert!(leaks.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Health score
// ═══════════════════════════════════════════════════════════════════

mod health {
    use super::*;
    use moneylens_core::models::budget::Budget;
    use moneylens_core::models::insight::HealthFactorKind;

    #[test]
    fn empty_ledger_returns_default_score_with_zero_factors() {
        let service = HealthService::new();
        let score = service.score(&[], &[], 0.0, 50.0);
        assert_eq!(score.total, 50.0);
        assert_eq!(score.factors.len(), 4);
        assert!(score.factors.iter().all(|f| f.value == 0.0));
    }

    #[test]
    fn default_score_is_clamped_into_range() {
        let service = HealthService::new();
        assert_eq!(service.score(&[], &[], 0.0, 150.0).total, 100.0);
        assert_eq!(service.score(&[], &[], 0.0, -20.0).total, 0.0);
    }

    #[test]
    fn ideal_ledger_scores_one_hundred() {
        let service = HealthService::new();
        let mut txs = Vec::new();
        for month in 3..=5 {
            txs.push(Transaction::expense(500.0, "Food", "groceries", d(2025, month, 10)));
            txs.push(Transaction::expense(1000.0, "Utilities", "bills", d(2025, month, 20)));
        }
        let budgets = vec![Budget::new("Food", 600.0)];
        let score = service.score(&txs, &budgets, 3000.0, 50.0);

        assert_eq!(score.total, 100.0);
        for factor in &score.factors {
            assert_eq!(factor.value, 25.0);
        }
    }

    #[test]
    fn factors_always_sum_to_the_total() {
        let service = HealthService::new();
        let txs = vec![
            Transaction::expense(900.0, "Housing", "rent", d(2025, 1, 1)),
            Transaction::expense(2400.0, "Shopping", "spree", d(2025, 2, 14)),
            Transaction::expense(300.0, "Food", "groceries", d(2025, 3, 5)),
        ];
        let budgets = vec![Budget::new("Food", 200.0), Budget::new("Housing", 1000.0)];
        let score = service.score(&txs, &budgets, 2000.0, 50.0);

        let sum: f64 = score.factors.iter().map(|f| f.value).sum();
        assert!(close(score.total, sum));
        assert!(score.total >= 0.0 && score.total <= 100.0);
        for factor in &score.factors {
            assert!(factor.value >= 0.0 && factor.value <= 25.0);
        }
    }

    #[test]
    fn zero_income_zeroes_the_income_factors() {
        let service = HealthService::new();
        let txs = vec![Transaction::expense(800.0, "Food", "x", d(2025, 1, 10))];
        let score = service.score(&txs, &[], 0.0, 50.0);

        for factor in &score.factors {
            match factor.kind {
                HealthFactorKind::IncomeVsExpense | HealthFactorKind::SavingsRate => {
                    assert_eq!(factor.value, 0.0)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn no_budgets_means_zero_adherence() {
        let service = HealthService::new();
        let txs = vec![Transaction::expense(100.0, "Food", "x", d(2025, 1, 10))];
        let score = service.score(&txs, &[], 3000.0, 50.0);
        let adherence = score
            .factors
            .iter()
            .find(|f| f.kind == HealthFactorKind::BudgetAdherence)
            .unwrap();
        assert_eq!(adherence.value, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Category suggestions
// ═══════════════════════════════════════════════════════════════════

mod suggestions {
    use super::*;

    fn history_entry(description: &str, category: &str) -> Transaction {
        Transaction::expense(10.0, category, description, d(2025, 5, 1))
    }

    #[test]
    fn known_merchant_wins_with_full_confidence() {
        let service = SuggestionService::default();
        let history = vec![
            history_entry("Blue Bottle", "Coffee"),
            history_entry("Blue Bottle", "Coffee"),
            history_entry("Blue Bottle", "Coffee"),
        ];
        let suggestions = service.suggest("blue bottle", &history);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, "Coffee");
        assert_eq!(suggestions[0].confidence, 1.0);
        assert!(suggestions[0].reasoning.contains("3 time(s)"));
    }

    #[test]
    fn merchant_match_is_case_and_whitespace_insensitive() {
        let service = SuggestionService::default();
        let history = vec![history_entry("Blue Bottle", "Coffee")];
        let suggestions = service.suggest("  BLUE BOTTLE  ", &history);
        assert_eq!(suggestions[0].category, "Coffee");
    }

    #[test]
    fn learned_keywords_drive_suggestions() {
        let service = SuggestionService::default();
        let history = vec![
            history_entry("acme hardware store", "Home"),
            history_entry("acme hardware store", "Home"),
        ];
        let suggestions = service.suggest("hardware depot", &history);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, "Home");
        assert!(close(suggestions[0].confidence, 0.5));
        assert!(suggestions[0].reasoning.contains("hardware"));
    }

    #[test]
    fn single_keyword_occurrence_is_not_enough() {
        let service = SuggestionService::default();
        let history = vec![history_entry("acme hardware store", "Home")];
        assert!(service.suggest("hardware depot", &history).is_empty());
    }

    #[test]
    fn pattern_table_matches_known_categories() {
        let service = SuggestionService::default();
        let history = vec![history_entry("morning brew", "Coffee")];
        let suggestions = service.suggest("Starbucks Reserve", &history);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, "Coffee");
        assert!(close(suggestions[0].confidence, 0.65));
    }

    #[test]
    fn pattern_table_never_invents_categories() {
        let service = SuggestionService::default();
        // User has never used a Coffee category
        let history = vec![history_entry("lunch place", "Food")];
        assert!(service.suggest("Starbucks Reserve", &history).is_empty());
    }

    #[test]
    fn duplicates_keep_the_best_confidence() {
        let service = SuggestionService::default();
        // Exact merchant (tier 1) and keyword (tier 2) both point at Coffee;
        // a single Coffee suggestion with the tier-1 confidence must survive.
        let history = vec![
            history_entry("Blue Bottle", "Coffee"),
            history_entry("Blue Bottle", "Coffee"),
            history_entry("Blue Bottle", "Coffee"),
        ];
        let suggestions = service.suggest("Blue Bottle", &history);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].confidence, 1.0);
    }

    #[test]
    fn suggestions_rank_by_descending_confidence() {
        let service = SuggestionService::default();
        let mut history = vec![
            history_entry("Starbucks downtown", "Coffee"),
            history_entry("Starbucks downtown", "Coffee"),
        ];
        history.push(history_entry("corner market", "Groceries"));
        let suggestions = service.suggest("starbucks market", &history);

        assert!(!suggestions.is_empty());
        for pair in suggestions.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn empty_inputs_yield_no_suggestions() {
        let service = SuggestionService::default();
        let history = vec![history_entry("Blue Bottle", "Coffee")];
        assert!(service.suggest("", &history).is_empty());
        assert!(service.suggest("   ", &history).is_empty());
        assert!(service.suggest("Blue Bottle", &[]).is_empty());
    }
}
