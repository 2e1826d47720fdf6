//! Fuzzy header discovery for the statement export.
//!
//! Columns are located by case-insensitive substring match against a fixed
//! vocabulary, scanning the headers left to right; the first column that
//! contains one of a field's keywords wins.

/// Column indices resolved from the export's header row.
///
/// Only the date column is required; the parser substitutes documented
/// defaults for the rest (empty narration, zero debit/credit, no balance).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub narration: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
    pub balance: Option<usize>,
}

const DATE_NEEDLES: &[&str] = &["date"];
const NARRATION_NEEDLES: &[&str] = &["remark", "narration"];
const DEBIT_NEEDLES: &[&str] = &["withdraw", "debit"];
const CREDIT_NEEDLES: &[&str] = &["deposit", "credit"];
const BALANCE_NEEDLES: &[&str] = &["balance"];

impl ColumnMap {
    /// Resolve columns from lower-cased, trimmed header cells.
    ///
    /// `usable[i]` marks columns that carry at least one non-empty data
    /// cell; fully empty columns are invisible to discovery, like the
    /// blank tails the export pads its sheets with.
    pub fn discover(headers: &[String], usable: &[bool]) -> Self {
        let find = |needles: &[&str]| {
            headers.iter().enumerate().find_map(|(i, header)| {
                let has_data = usable.get(i).copied().unwrap_or(false);
                (has_data && needles.iter().any(|n| header.contains(n))).then_some(i)
            })
        };

        Self {
            date: find(DATE_NEEDLES),
            narration: find(NARRATION_NEEDLES),
            debit: find(DEBIT_NEEDLES),
            credit: find(CREDIT_NEEDLES),
            balance: find(BALANCE_NEEDLES),
        }
    }
}
