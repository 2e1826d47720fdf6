//! Load-failure taxonomy for statement ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a statement load.
///
/// Row-level problems (unparseable dates, non-numeric cells) are recovered
/// inline by the parser and never surface here.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("statement not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{column} column not found in {}", .path.display())]
    ColumnNotFound { column: &'static str, path: PathBuf },

    #[error("failed to read statement {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed statement {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
