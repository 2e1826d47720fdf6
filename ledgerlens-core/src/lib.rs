//! ledgerlens-core: canonical transaction types and narration utilities

pub mod text;
pub mod transaction;

pub use text::clean_narration;
pub use transaction::{Transaction, TxnType};
