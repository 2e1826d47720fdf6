//! ledgerlens-ingest: statement loading, column discovery, and category rules

pub mod classifier;
pub mod columns;
pub mod error;
pub mod parsers;

pub use classifier::{CategoryPath, classify};
pub use columns::ColumnMap;
pub use error::StatementError;
pub use parsers::icici::{SOURCE_BANK, load_statement, parse_statement};
