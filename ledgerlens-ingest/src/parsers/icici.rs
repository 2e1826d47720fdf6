//! ICICI savings statement parser.
//!
//! The export carries 12 banner rows (account holder, period, disclaimers)
//! before the real column header. Columns are found by fuzzy name matching
//! and dates are dd/mm/yyyy. Rows whose date fails to parse are dropped;
//! non-numeric amount cells coerce to zero — a malformed row never fails
//! the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use ledgerlens_core::{Transaction, TxnType};
use tracing::debug;

use crate::classifier::classify;
use crate::columns::ColumnMap;
use crate::error::StatementError;

/// Tag stamped on every transaction from this parser
pub const SOURCE_BANK: &str = "ICICI";

/// Banner rows before the real column header
const BANNER_ROWS: usize = 12;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Load a statement export from disk into the canonical transaction table.
pub fn load_statement(path: impl AsRef<Path>) -> Result<Vec<Transaction>, StatementError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StatementError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| StatementError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_statement(file, path)
}

/// Parse a statement from any reader. `path` is only used in errors.
pub fn parse_statement(
    reader: impl Read,
    path: &Path,
) -> Result<Vec<Transaction>, StatementError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| StatementError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }

    let Some(header) = records.get(BANNER_ROWS) else {
        return Err(StatementError::ColumnNotFound { column: "date", path: path.to_path_buf() });
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

    let rows: Vec<&StringRecord> = records[BANNER_ROWS + 1..]
        .iter()
        .filter(|r| !is_empty_row(r))
        .collect();

    // A header only counts if its column holds data somewhere; the export
    // pads sheets with named but empty tail columns.
    let usable: Vec<bool> = (0..headers.len())
        .map(|i| rows.iter().any(|r| !cell(r, i).is_empty()))
        .collect();

    let columns = ColumnMap::discover(&headers, &usable);
    let Some(date_col) = columns.date else {
        return Err(StatementError::ColumnNotFound { column: "date", path: path.to_path_buf() });
    };
    debug!(?columns, "discovered statement columns");

    let mut txns = Vec::new();
    let mut dropped = 0usize;

    for row in &rows {
        let date = match NaiveDate::parse_from_str(cell(row, date_col), DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let raw_text = columns.narration.map(|i| cell(row, i)).unwrap_or("").to_string();
        let debit = columns.debit.map(|i| parse_amount(cell(row, i))).unwrap_or(0.0);
        let credit = columns.credit.map(|i| parse_amount(cell(row, i))).unwrap_or(0.0);
        let balance = columns.balance.and_then(|i| parse_balance(cell(row, i)));

        let amount = credit - debit;
        let category = classify(&raw_text, TxnType::from_amount(amount));

        txns.push(
            Transaction::new(date, raw_text, amount)
                .with_balance(balance)
                .with_categories(category.l1, category.l2, category.l3, category.l4)
                .with_source(SOURCE_BANK),
        );
    }

    if dropped > 0 {
        debug!(dropped, "dropped rows without a parseable date");
    }

    Ok(txns)
}

fn cell<'a>(record: &'a StringRecord, i: usize) -> &'a str {
    record.get(i).unwrap_or("").trim()
}

fn is_empty_row(record: &StringRecord) -> bool {
    record.iter().all(|c| c.trim().is_empty())
}

/// Numeric coercion for debit/credit cells: non-numeric becomes zero.
fn parse_amount(raw: &str) -> f64 {
    raw.replace(',', "").parse().unwrap_or(0.0)
}

fn parse_balance(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}
