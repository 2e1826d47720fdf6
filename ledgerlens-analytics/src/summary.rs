//! Expense summary engine: canonical transactions in, dashboard aggregate out.
//!
//! Every monthly series groups on the "YYYY-MM" month key and is emitted in
//! ascending key order. Monetary values are rounded to two decimals at
//! emission only; internal sums stay unrounded.

use std::collections::{BTreeMap, BTreeSet};

use ledgerlens_core::Transaction;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dashboard_rules::{Bucket, bucket_for};

pub const TOP_N_MIN: usize = 1;
pub const TOP_N_MAX: usize = 50;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("top_n must be between 1 and 50 (got {0})")]
    InvalidTopN(usize),

    #[error("withdrawal rate must be greater than zero (got {0})")]
    InvalidWithdrawalRate(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePoint {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCreditDebitPoint {
    pub month: String,
    pub credit: f64,
    pub debit: f64,
}

/// One row of a fixed category series; all five buckets are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCategoryPoint {
    pub month: String,
    pub rent: f64,
    pub income: f64,
    pub refund: f64,
    pub food: f64,
    pub travel: f64,
}

/// One row of a dynamic breakdown; the category set varies month to month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdownPoint {
    pub month: String,
    pub categories: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopExpense {
    /// ISO "YYYY-MM-DD"
    pub date: String,
    pub description: String,
    /// Absolute magnitude of the debit
    pub amount: f64,
}

/// The aggregate consumed by the dashboard. Computed fresh per call, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_expense: f64,
    pub total_income: f64,
    pub net_cashflow: f64,
    pub monthly_expenses: Vec<ExpensePoint>,
    pub monthly_credit_debit: Vec<MonthlyCreditDebitPoint>,
    pub monthly_category_lines: Vec<MonthlyCategoryPoint>,
    pub monthly_credit_category_lines: Vec<MonthlyCategoryPoint>,
    pub monthly_debit_category_lines: Vec<MonthlyCategoryPoint>,
    pub monthly_credit_l1_breakdown: Vec<MonthlyBreakdownPoint>,
    pub monthly_credit_l2_breakdown: Vec<MonthlyBreakdownPoint>,
    pub monthly_debit_l1_breakdown: Vec<MonthlyBreakdownPoint>,
    pub monthly_debit_l2_breakdown: Vec<MonthlyBreakdownPoint>,
    pub top_expenses: Vec<TopExpense>,
}

/// Build the full expense summary for a transaction table.
///
/// `top_n` bounds the top-expense list and must be in 1..=50; it is checked
/// before any computation. An empty table yields a zeroed summary, not an
/// error. Pure: identical input produces an identical summary.
pub fn build_expense_summary(
    txns: &[Transaction],
    top_n: usize,
) -> Result<ExpenseSummary, AggregateError> {
    if !(TOP_N_MIN..=TOP_N_MAX).contains(&top_n) {
        return Err(AggregateError::InvalidTopN(top_n));
    }

    if txns.is_empty() {
        return Ok(ExpenseSummary::default());
    }

    let (total_expense, total_income, net_cashflow) = totals(txns);

    let mut expense_by_month: BTreeMap<String, f64> = BTreeMap::new();
    let mut credit_by_month: BTreeMap<String, f64> = BTreeMap::new();
    let mut debit_by_month: BTreeMap<String, f64> = BTreeMap::new();
    for txn in txns {
        if txn.is_expense() {
            *expense_by_month.entry(txn.month_key()).or_insert(0.0) += txn.amount;
            *debit_by_month.entry(txn.month_key()).or_insert(0.0) += txn.abs_amount();
        } else if txn.is_income() {
            *credit_by_month.entry(txn.month_key()).or_insert(0.0) += txn.amount;
        }
    }

    let monthly_expenses = expense_by_month
        .iter()
        .map(|(month, sum)| ExpensePoint { month: month.clone(), amount: round2(sum.abs()) })
        .collect();

    // Outer join on the month key: a month seen on one side only still
    // appears, with the other side at zero.
    let months: BTreeSet<&String> = credit_by_month.keys().chain(debit_by_month.keys()).collect();
    let monthly_credit_debit = months
        .into_iter()
        .map(|month| MonthlyCreditDebitPoint {
            month: month.clone(),
            credit: round2(credit_by_month.get(month).copied().unwrap_or(0.0)),
            debit: round2(debit_by_month.get(month).copied().unwrap_or(0.0)),
        })
        .collect();

    // The fixed series and the l1/l2 breakdowns both run over the subset of
    // rows the dashboard rules can bucket; everything else is chart noise.
    let bucketed: Vec<(&Transaction, Bucket)> = txns
        .iter()
        .filter_map(|txn| bucket_for(&txn.raw_text, txn.amount).map(|b| (txn, b)))
        .collect();
    debug!(bucketed = bucketed.len(), total = txns.len(), "dashboard bucket coverage");

    let monthly_category_lines = category_lines(bucketed.iter().copied());
    let monthly_credit_category_lines =
        category_lines(bucketed.iter().copied().filter(|(t, _)| t.amount > 0.0));
    let monthly_debit_category_lines =
        category_lines(bucketed.iter().copied().filter(|(t, _)| t.amount < 0.0));

    let credit_bucketed: Vec<&Transaction> =
        bucketed.iter().copied().filter(|(t, _)| t.amount > 0.0).map(|(t, _)| t).collect();
    let debit_bucketed: Vec<&Transaction> =
        bucketed.iter().copied().filter(|(t, _)| t.amount < 0.0).map(|(t, _)| t).collect();

    let monthly_credit_l1_breakdown = dynamic_breakdown(&credit_bucketed, category_l1);
    let monthly_credit_l2_breakdown = dynamic_breakdown(&credit_bucketed, category_l2);
    let monthly_debit_l1_breakdown = dynamic_breakdown(&debit_bucketed, category_l1);
    let monthly_debit_l2_breakdown = dynamic_breakdown(&debit_bucketed, category_l2);

    let mut debits: Vec<&Transaction> = txns.iter().filter(|t| t.is_expense()).collect();
    // Stable sort: ties keep their statement order.
    debits.sort_by(|a, b| b.abs_amount().total_cmp(&a.abs_amount()));
    let top_expenses = debits
        .into_iter()
        .take(top_n)
        .map(|txn| TopExpense {
            date: txn.date.format("%Y-%m-%d").to_string(),
            description: txn.description.clone(),
            amount: round2(txn.abs_amount()),
        })
        .collect();

    Ok(ExpenseSummary {
        total_expense: round2(total_expense),
        total_income: round2(total_income),
        net_cashflow: round2(net_cashflow),
        monthly_expenses,
        monthly_credit_debit,
        monthly_category_lines,
        monthly_credit_category_lines,
        monthly_debit_category_lines,
        monthly_credit_l1_breakdown,
        monthly_credit_l2_breakdown,
        monthly_debit_l1_breakdown,
        monthly_debit_l2_breakdown,
        top_expenses,
    })
}

/// (total_expense, total_income, net_cashflow), unrounded.
///
/// With category data present, income and expense come from the rows the
/// classifier tagged Income/Expense at level 1. Without any category signal
/// the signs alone decide, and net is the plain signed sum. Either way
/// `net == income - expense` holds.
fn totals(txns: &[Transaction]) -> (f64, f64, f64) {
    let has_categories = txns.iter().any(|t| !t.category_l1.trim().is_empty());

    if has_categories {
        let total_income: f64 = txns
            .iter()
            .filter(|t| t.category_l1.eq_ignore_ascii_case("income") && t.amount > 0.0)
            .map(|t| t.amount)
            .sum();
        let total_expense: f64 = txns
            .iter()
            .filter(|t| t.category_l1.eq_ignore_ascii_case("expense") && t.amount < 0.0)
            .map(|t| t.amount.abs())
            .sum();
        (total_expense, total_income, total_income - total_expense)
    } else {
        let total_expense: f64 =
            txns.iter().filter(|t| t.amount < 0.0).map(|t| t.amount.abs()).sum();
        let total_income: f64 = txns.iter().filter(|t| t.amount > 0.0).map(|t| t.amount).sum();
        let net: f64 = txns.iter().map(|t| t.amount).sum();
        (total_expense, total_income, net)
    }
}

fn category_lines<'a>(
    rows: impl Iterator<Item = (&'a Transaction, Bucket)>,
) -> Vec<MonthlyCategoryPoint> {
    let mut by_month: BTreeMap<String, [f64; 5]> = BTreeMap::new();
    for (txn, bucket) in rows {
        let sums = by_month.entry(txn.month_key()).or_insert([0.0; 5]);
        sums[bucket.index()] += txn.abs_amount();
    }

    by_month
        .into_iter()
        .map(|(month, sums)| MonthlyCategoryPoint {
            month,
            rent: round2(sums[0]),
            income: round2(sums[1]),
            refund: round2(sums[2]),
            food: round2(sums[3]),
            travel: round2(sums[4]),
        })
        .collect()
}

fn dynamic_breakdown(
    rows: &[&Transaction],
    level: fn(&Transaction) -> &str,
) -> Vec<MonthlyBreakdownPoint> {
    let mut by_month: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for &txn in rows {
        let category = level(txn).trim();
        if category.is_empty() {
            continue;
        }
        *by_month
            .entry(txn.month_key())
            .or_default()
            .entry(category.to_string())
            .or_insert(0.0) += txn.abs_amount();
    }

    by_month
        .into_iter()
        .map(|(month, categories)| MonthlyBreakdownPoint {
            month,
            categories: categories.into_iter().map(|(name, sum)| (name, round2(sum))).collect(),
        })
        .collect()
}

fn category_l1(txn: &Transaction) -> &str {
    &txn.category_l1
}

fn category_l2(txn: &Transaction) -> &str {
    &txn.category_l2
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: &str, raw_text: &str, amount: f64) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction::new(date, raw_text, amount)
    }

    fn tagged(date: &str, raw_text: &str, amount: f64, l1: &str, l2: &str) -> Transaction {
        txn(date, raw_text, amount).with_categories(l1, l2, "Others", "Others")
    }

    #[test]
    fn test_empty_table_is_zeroed_not_an_error() {
        let summary = build_expense_summary(&[], DEFAULT_TOP_N).unwrap();
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.net_cashflow, 0.0);
        assert!(summary.monthly_expenses.is_empty());
        assert!(summary.monthly_credit_debit.is_empty());
        assert!(summary.monthly_category_lines.is_empty());
        assert!(summary.monthly_credit_l1_breakdown.is_empty());
        assert!(summary.top_expenses.is_empty());
    }

    #[test]
    fn test_top_n_bounds_rejected_before_aggregation() {
        assert_eq!(build_expense_summary(&[], 0).unwrap_err(), AggregateError::InvalidTopN(0));
        assert_eq!(build_expense_summary(&[], 51).unwrap_err(), AggregateError::InvalidTopN(51));

        let txns = vec![tagged("2024-03-01", "SWIGGY", -450.0, "Expense", "Food")];
        assert!(build_expense_summary(&txns, 1).is_ok());
        assert!(build_expense_summary(&txns, 50).is_ok());
    }

    #[test]
    fn test_march_april_scenario() {
        let txns = vec![
            tagged("2024-03-05", "NEFT DR ONE", -700.0, "Expense", "Miscellaneous"),
            tagged("2024-03-18", "NEFT DR TWO", -500.0, "Expense", "Miscellaneous"),
            tagged("2024-03-01", "SALARY CREDIT", 5000.0, "Income", "Salary"),
            tagged("2024-04-01", "SALARY CREDIT", 2000.0, "Income", "Salary"),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();

        assert_eq!(
            summary.monthly_expenses,
            vec![ExpensePoint { month: "2024-03".into(), amount: 1200.0 }]
        );
        assert_eq!(
            summary.monthly_credit_debit,
            vec![
                MonthlyCreditDebitPoint { month: "2024-03".into(), credit: 5000.0, debit: 1200.0 },
                MonthlyCreditDebitPoint { month: "2024-04".into(), credit: 2000.0, debit: 0.0 },
            ]
        );
        assert_eq!(summary.total_income, 7000.0);
        assert_eq!(summary.total_expense, 1200.0);
        assert_eq!(summary.net_cashflow, 5800.0);
    }

    #[test]
    fn test_category_aware_totals_skip_untagged_rows() {
        let txns = vec![
            tagged("2024-03-01", "SALARY", 50000.0, "Income", "Salary"),
            // A transfer credit is neither income nor expense at level 1.
            tagged("2024-03-02", "NEFT CR SELF", 10000.0, "Transfer", "Internal"),
            tagged("2024-03-03", "SWIGGY", -450.0, "Expense", "Food"),
            tagged("2024-03-04", "ZERODHA SIP", -5000.0, "Investment", "Mutual Fund"),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        assert_eq!(summary.total_income, 50000.0);
        assert_eq!(summary.total_expense, 450.0);
        assert_eq!(summary.net_cashflow, 49550.0);
    }

    #[test]
    fn test_sign_only_totals_without_category_signal() {
        let txns = vec![
            txn("2024-03-01", "CR ONE", 800.0),
            txn("2024-03-02", "DR ONE", -300.0),
            txn("2024-03-03", "DR TWO", -200.0),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        assert_eq!(summary.total_income, 800.0);
        assert_eq!(summary.total_expense, 500.0);
        assert_eq!(summary.net_cashflow, 300.0);
        // Round-trip holds on this path too.
        assert_eq!(summary.net_cashflow, summary.total_income - summary.total_expense);
    }

    #[test]
    fn test_top_expenses_magnitude_and_bound() {
        let txns = vec![
            txn("2024-03-01", "SMALL", -200.0),
            txn("2024-03-02", "BIG", -900.0),
        ];

        let summary = build_expense_summary(&txns, 1).unwrap();
        assert_eq!(summary.top_expenses.len(), 1);
        assert_eq!(summary.top_expenses[0].amount, 900.0);
        assert_eq!(summary.top_expenses[0].date, "2024-03-02");
        assert_eq!(summary.top_expenses[0].description, "BIG");
    }

    #[test]
    fn test_top_expenses_ties_keep_statement_order() {
        let txns = vec![
            txn("2024-03-01", "FIRST", -500.0),
            txn("2024-03-02", "SECOND", -500.0),
            txn("2024-03-03", "THIRD", -400.0),
        ];

        let summary = build_expense_summary(&txns, 2).unwrap();
        assert_eq!(summary.top_expenses[0].description, "FIRST");
        assert_eq!(summary.top_expenses[1].description, "SECOND");
    }

    #[test]
    fn test_fixed_series_always_carry_all_buckets() {
        let txns = vec![
            txn("2024-03-01", "HOUSE RENT MAY", -15000.0),
            txn("2024-03-02", "SWIGGY ORDER", -450.0),
            txn("2024-03-03", "SALARY CREDIT", 50000.0),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();

        assert_eq!(
            summary.monthly_category_lines,
            vec![MonthlyCategoryPoint {
                month: "2024-03".into(),
                rent: 15000.0,
                income: 50000.0,
                refund: 0.0,
                food: 450.0,
                travel: 0.0,
            }]
        );
        assert_eq!(
            summary.monthly_credit_category_lines,
            vec![MonthlyCategoryPoint {
                month: "2024-03".into(),
                rent: 0.0,
                income: 50000.0,
                refund: 0.0,
                food: 0.0,
                travel: 0.0,
            }]
        );
        assert_eq!(
            summary.monthly_debit_category_lines,
            vec![MonthlyCategoryPoint {
                month: "2024-03".into(),
                rent: 15000.0,
                income: 0.0,
                refund: 0.0,
                food: 450.0,
                travel: 0.0,
            }]
        );
    }

    #[test]
    fn test_breakdowns_cover_bucketed_rows_only() {
        let txns = vec![
            // Bucketable debit: lands in the debit breakdowns.
            tagged("2024-03-01", "SWIGGY ORDER", -450.0, "Expense", "Food"),
            // Unbucketable debit: excluded from the breakdowns entirely.
            tagged("2024-03-02", "NEFT DR 123", -5000.0, "Transfer", "Internal"),
            // Credits always bucket.
            tagged("2024-03-03", "SALARY CREDIT", 50000.0, "Income", "Salary"),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();

        assert_eq!(summary.monthly_debit_l1_breakdown.len(), 1);
        let debit_l1 = &summary.monthly_debit_l1_breakdown[0];
        assert_eq!(debit_l1.month, "2024-03");
        assert_eq!(debit_l1.categories.len(), 1);
        assert_eq!(debit_l1.categories["Expense"], 450.0);

        let credit_l2 = &summary.monthly_credit_l2_breakdown[0];
        assert_eq!(credit_l2.categories["Salary"], 50000.0);
    }

    #[test]
    fn test_breakdowns_skip_blank_categories() {
        let txns = vec![
            txn("2024-03-01", "SWIGGY ORDER", -450.0).with_categories("Expense", "  ", "x", "x"),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        assert_eq!(summary.monthly_debit_l1_breakdown.len(), 1);
        assert!(summary.monthly_debit_l2_breakdown.is_empty());
    }

    #[test]
    fn test_breakdown_category_sets_vary_per_month() {
        let txns = vec![
            tagged("2024-03-01", "SWIGGY ORDER", -450.0, "Expense", "Food"),
            tagged("2024-04-01", "HOUSE RENT", -15000.0, "Expense", "Rent"),
            tagged("2024-04-02", "SWIGGY ORDER", -500.0, "Expense", "Food"),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        let l2 = &summary.monthly_debit_l2_breakdown;
        assert_eq!(l2.len(), 2);
        assert_eq!(l2[0].month, "2024-03");
        assert_eq!(l2[0].categories.len(), 1);
        assert_eq!(l2[1].month, "2024-04");
        assert_eq!(l2[1].categories.len(), 2);
        assert_eq!(l2[1].categories["Rent"], 15000.0);
    }

    #[test]
    fn test_rounding_happens_at_emission() {
        let txns = vec![
            tagged("2024-03-01", "A", -10.11, "Expense", "Misc"),
            tagged("2024-03-02", "B", -20.22, "Expense", "Misc"),
            tagged("2024-03-03", "C", -30.33, "Expense", "Misc"),
        ];

        let summary = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        assert_eq!(summary.total_expense, 60.66);
        assert_eq!(summary.monthly_expenses[0].amount, 60.66);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let txns = vec![
            tagged("2024-03-01", "SALARY CREDIT", 50000.0, "Income", "Salary"),
            tagged("2024-03-02", "SWIGGY ORDER", -450.0, "Expense", "Food"),
            tagged("2024-04-03", "UBER TRIP", -220.0, "Expense", "Travel"),
        ];

        let first = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        let second = build_expense_summary(&txns, DEFAULT_TOP_N).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_serializes_with_stable_keys() {
        let summary = build_expense_summary(&[], DEFAULT_TOP_N).unwrap();
        let value = serde_json::to_value(&summary).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "total_expense",
            "total_income",
            "net_cashflow",
            "monthly_expenses",
            "monthly_credit_debit",
            "monthly_category_lines",
            "monthly_credit_category_lines",
            "monthly_debit_category_lines",
            "monthly_credit_l1_breakdown",
            "monthly_credit_l2_breakdown",
            "monthly_debit_l1_breakdown",
            "monthly_debit_l2_breakdown",
            "top_expenses",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object.len(), 13);
    }
}
