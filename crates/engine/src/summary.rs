//! Aggregation of transactions into a spending summary.
//!
//! [`summarize`] is pure: it receives the already-filtered records of one user
//! and never touches the database. Every figure is computed on integer cents,
//! so `net == income - expense` holds exactly and the per-category totals add
//! up to their type total.
//!
//! Daily averages are computed over a period of days that is either
//!
//! - the explicit window, when both bounds are given (inclusive), or
//! - the span between the oldest and the newest record (inclusive), or
//! - a single day, when there is nothing to aggregate.
//!
//! Averages are rounded to cents half-to-even, and the net average is the
//! difference of the two rounded averages.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{CategoryKind, MoneyCents, TransactionRecord};

/// Bounds the summary was requested for. Both are inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
    pub net: MoneyCents,
}

/// Sum of the transactions of one category name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakdownItem {
    pub category: String,
    pub total: MoneyCents,
}

/// Per-type breakdown, each list sorted by total descending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub income: Vec<BreakdownItem>,
    pub expense: Vec<BreakdownItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub average_daily_net: MoneyCents,
    pub average_daily_income: MoneyCents,
    pub average_daily_expense: MoneyCents,
    pub largest_income: Option<TransactionRecord>,
    pub largest_expense: Option<TransactionRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub totals: Totals,
    pub category_breakdown: CategoryBreakdown,
    pub metrics: Metrics,
}

/// Aggregate `records` into totals, a per-category breakdown and daily
/// metrics.
///
/// Records are taken in the given order: ties in the breakdown and in the
/// largest transaction keep the first one seen.
pub fn summarize(records: &[TransactionRecord], window: &SummaryWindow) -> Summary {
    let (income, expense): (Vec<&TransactionRecord>, Vec<&TransactionRecord>) = records
        .iter()
        .partition(|record| record.category_kind == CategoryKind::Income);

    let income_total: MoneyCents = income.iter().map(|r| r.amount).sum();
    let expense_total: MoneyCents = expense.iter().map(|r| r.amount).sum();

    let totals = Totals {
        income: income_total,
        expense: expense_total,
        net: income_total - expense_total,
    };

    let category_breakdown = CategoryBreakdown {
        income: breakdown(&income),
        expense: breakdown(&expense),
    };

    let metrics = if records.is_empty() {
        Metrics::default()
    } else {
        let days = period_days(records, window);
        let average_daily_income = income_total.div_round_half_even(days);
        let average_daily_expense = expense_total.div_round_half_even(days);
        Metrics {
            average_daily_net: average_daily_income - average_daily_expense,
            average_daily_income,
            average_daily_expense,
            largest_income: largest(&income),
            largest_expense: largest(&expense),
        }
    };

    Summary {
        totals,
        category_breakdown,
        metrics,
    }
}

/// Number of days the averages are spread over.
pub fn period_days(records: &[TransactionRecord], window: &SummaryWindow) -> i64 {
    if let (Some(from), Some(to)) = (window.from, window.to) {
        return (to - from).num_days() + 1;
    }
    let min = records.iter().map(|r| r.date).min();
    let max = records.iter().map(|r| r.date).max();
    match (min, max) {
        (Some(min), Some(max)) => (max - min).num_days() + 1,
        _ => 1,
    }
}

fn breakdown(records: &[&TransactionRecord]) -> Vec<BreakdownItem> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<BreakdownItem> = Vec::new();

    for record in records {
        match positions.get(record.category_name.as_str()) {
            Some(&index) => items[index].total += record.amount,
            None => {
                positions.insert(record.category_name.as_str(), items.len());
                items.push(BreakdownItem {
                    category: record.category_name.clone(),
                    total: record.amount,
                });
            }
        }
    }

    // Stable: equal totals stay in first-seen order.
    items.sort_by(|a, b| b.total.cmp(&a.total));
    items
}

fn largest(records: &[&TransactionRecord]) -> Option<TransactionRecord> {
    let mut best: Option<&TransactionRecord> = None;
    for &record in records {
        if best.is_none_or(|current| record.amount > current.amount) {
            best = Some(record);
        }
    }
    best.cloned()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        category: &str,
        kind: CategoryKind,
        amount: &str,
        on: NaiveDate,
    ) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            category_id: Uuid::new_v4(),
            category_name: category.to_string(),
            category_kind: kind,
            description: format!("{category} on {on}"),
            amount: amount.parse().unwrap(),
            date: on,
            last_changed: Utc::now(),
        }
    }

    fn cents(value: &str) -> MoneyCents {
        value.parse().unwrap()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = summarize(&[], &SummaryWindow::default());
        assert_eq!(summary, Summary::default());

        let window = SummaryWindow {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 1, 31)),
        };
        let summary = summarize(&[], &window);
        assert_eq!(summary.metrics.average_daily_income, MoneyCents::ZERO);
        assert!(summary.metrics.largest_expense.is_none());
    }

    #[test]
    fn totals_and_net_are_exact() {
        let records = vec![
            record("Salary", CategoryKind::Income, "3000.00", date(2024, 1, 1)),
            record("Food", CategoryKind::Expense, "0.10", date(2024, 1, 2)),
            record("Food", CategoryKind::Expense, "0.20", date(2024, 1, 3)),
        ];
        let summary = summarize(&records, &SummaryWindow::default());
        assert_eq!(summary.totals.income, cents("3000.00"));
        assert_eq!(summary.totals.expense, cents("0.30"));
        assert_eq!(summary.totals.net, cents("2999.70"));
    }

    #[test]
    fn net_can_be_negative() {
        let records = vec![
            record("Salary", CategoryKind::Income, "10.00", date(2024, 1, 1)),
            record("Rent", CategoryKind::Expense, "25.50", date(2024, 1, 1)),
        ];
        let summary = summarize(&records, &SummaryWindow::default());
        assert_eq!(summary.totals.net, cents("-15.50"));
        assert_eq!(summary.metrics.average_daily_net, cents("-15.50"));
    }

    #[test]
    fn breakdown_groups_by_name_and_sorts_descending() {
        let records = vec![
            record("Food", CategoryKind::Expense, "10.00", date(2024, 1, 1)),
            record("Rent", CategoryKind::Expense, "500.00", date(2024, 1, 1)),
            record("Food", CategoryKind::Expense, "15.00", date(2024, 1, 2)),
            record("Salary", CategoryKind::Income, "1000.00", date(2024, 1, 1)),
        ];
        let summary = summarize(&records, &SummaryWindow::default());

        let expense: Vec<(&str, MoneyCents)> = summary
            .category_breakdown
            .expense
            .iter()
            .map(|item| (item.category.as_str(), item.total))
            .collect();
        assert_eq!(
            expense,
            vec![("Rent", cents("500.00")), ("Food", cents("25.00"))]
        );
        assert_eq!(summary.category_breakdown.income.len(), 1);

        let breakdown_sum: MoneyCents = summary
            .category_breakdown
            .expense
            .iter()
            .map(|item| item.total)
            .sum();
        assert_eq!(breakdown_sum, summary.totals.expense);
    }

    #[test]
    fn breakdown_merges_distinct_categories_sharing_a_name() {
        let mut global = record("Food", CategoryKind::Expense, "5.00", date(2024, 1, 1));
        let mut custom = record("Food", CategoryKind::Expense, "7.00", date(2024, 1, 1));
        global.category_id = Uuid::new_v4();
        custom.category_id = Uuid::new_v4();

        let summary = summarize(&[global, custom], &SummaryWindow::default());
        assert_eq!(
            summary.category_breakdown.expense,
            vec![BreakdownItem {
                category: "Food".to_string(),
                total: cents("12.00"),
            }]
        );
    }

    #[test]
    fn breakdown_ties_keep_first_seen_order() {
        let records = vec![
            record("Books", CategoryKind::Expense, "20.00", date(2024, 1, 1)),
            record("Games", CategoryKind::Expense, "20.00", date(2024, 1, 1)),
            record("Apps", CategoryKind::Expense, "20.00", date(2024, 1, 1)),
        ];
        let summary = summarize(&records, &SummaryWindow::default());
        let names: Vec<&str> = summary
            .category_breakdown
            .expense
            .iter()
            .map(|item| item.category.as_str())
            .collect();
        assert_eq!(names, vec!["Books", "Games", "Apps"]);
    }

    #[test]
    fn period_uses_explicit_window_when_both_bounds_are_given() {
        let records = vec![record(
            "Salary",
            CategoryKind::Income,
            "3100.00",
            date(2024, 1, 15),
        )];
        let window = SummaryWindow {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 1, 31)),
        };
        assert_eq!(period_days(&records, &window), 31);

        let summary = summarize(&records, &window);
        assert_eq!(summary.metrics.average_daily_income, cents("100.00"));
    }

    #[test]
    fn six_day_window_from_fifth_to_tenth() {
        let window = SummaryWindow {
            from: Some(date(2025, 8, 5)),
            to: Some(date(2025, 8, 10)),
        };
        assert_eq!(period_days(&[], &window), 6);
    }

    #[test]
    fn amounts_near_the_i64_bound_do_not_panic() {
        let huge = "92233720368547758.07";
        let records = vec![
            record("Salary", CategoryKind::Income, huge, date(2024, 1, 1)),
            record("Salary", CategoryKind::Income, huge, date(2024, 1, 2)),
            record("Rent", CategoryKind::Expense, "1.00", date(2024, 1, 2)),
        ];
        let summary = summarize(&records, &SummaryWindow::default());
        assert_eq!(summary.totals.income, MoneyCents::new(i64::MAX));
        assert_eq!(
            summary.category_breakdown.income[0].total,
            summary.totals.income
        );
        assert_eq!(summary.totals.net, MoneyCents::new(i64::MAX - 100));
    }

    #[test]
    fn period_falls_back_to_record_span() {
        let records = vec![
            record("Food", CategoryKind::Expense, "30.00", date(2024, 1, 10)),
            record("Food", CategoryKind::Expense, "30.00", date(2024, 1, 1)),
        ];
        // Only one bound given: the records decide.
        let window = SummaryWindow {
            from: Some(date(2023, 12, 1)),
            to: None,
        };
        assert_eq!(period_days(&records, &window), 10);
        assert_eq!(period_days(&records, &SummaryWindow::default()), 10);
        assert_eq!(period_days(&[], &SummaryWindow::default()), 1);

        let summary = summarize(&records, &window);
        assert_eq!(summary.metrics.average_daily_expense, cents("6.00"));
    }

    #[test]
    fn single_day_span_counts_as_one_day() {
        let records = vec![record("Salary", CategoryKind::Income, "3000.00", date(2024, 2, 1))];
        let summary = summarize(&records, &SummaryWindow::default());
        assert_eq!(summary.metrics.average_daily_income, cents("3000.00"));
        assert_eq!(summary.metrics.average_daily_net, cents("3000.00"));
    }

    #[test]
    fn averages_round_half_to_even() {
        let window = SummaryWindow {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 1, 2)),
        };
        // 0.05 / 2 = 0.025 -> 0.02, 0.15 / 2 = 0.075 -> 0.08
        let records = vec![
            record("Tips", CategoryKind::Income, "0.05", date(2024, 1, 1)),
            record("Snacks", CategoryKind::Expense, "0.15", date(2024, 1, 2)),
        ];
        let summary = summarize(&records, &window);
        assert_eq!(summary.metrics.average_daily_income, cents("0.02"));
        assert_eq!(summary.metrics.average_daily_expense, cents("0.08"));
        assert_eq!(summary.metrics.average_daily_net, cents("-0.06"));
    }

    #[test]
    fn net_average_is_difference_of_rounded_averages() {
        let window = SummaryWindow {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 1, 3)),
        };
        // 100.00 / 3 = 33.33, 200.00 / 3 = 66.67
        let records = vec![
            record("Salary", CategoryKind::Income, "100.00", date(2024, 1, 1)),
            record("Rent", CategoryKind::Expense, "200.00", date(2024, 1, 2)),
        ];
        let summary = summarize(&records, &window);
        assert_eq!(summary.metrics.average_daily_income, cents("33.33"));
        assert_eq!(summary.metrics.average_daily_expense, cents("66.67"));
        assert_eq!(summary.metrics.average_daily_net, cents("-33.34"));
    }

    #[test]
    fn largest_picks_the_first_maximum_per_type() {
        let first = record("Rent", CategoryKind::Expense, "500.00", date(2024, 1, 1));
        let second = record("Car", CategoryKind::Expense, "500.00", date(2024, 1, 2));
        let small = record("Food", CategoryKind::Expense, "20.00", date(2024, 1, 3));
        let records = vec![small, first.clone(), second];

        let summary = summarize(&records, &SummaryWindow::default());
        assert_eq!(summary.metrics.largest_expense, Some(first));
        assert!(summary.metrics.largest_income.is_none());
    }

    #[test]
    fn only_expenses_leave_income_side_empty() {
        let records = vec![record("Food", CategoryKind::Expense, "12.00", date(2024, 1, 1))];
        let summary = summarize(&records, &SummaryWindow::default());
        assert_eq!(summary.totals.income, MoneyCents::ZERO);
        assert!(summary.category_breakdown.income.is_empty());
        assert_eq!(summary.metrics.average_daily_income, MoneyCents::ZERO);
        assert_eq!(summary.totals.net, cents("-12.00"));
    }
}
