//! ledgerlens-analytics: expense summary engine and dashboard bucket rules

pub mod dashboard_rules;
pub mod fire;
pub mod summary;

pub use dashboard_rules::{Bucket, bucket_for};
pub use fire::estimate_fire_number;
pub use summary::{
    AggregateError, DEFAULT_TOP_N, ExpensePoint, ExpenseSummary, MonthlyBreakdownPoint,
    MonthlyCategoryPoint, MonthlyCreditDebitPoint, TopExpense, build_expense_summary,
};
