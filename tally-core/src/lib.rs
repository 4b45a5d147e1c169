//! tally-core: transaction record and summary metrics shared by the tally crates

pub mod summary;
pub mod transaction;

pub use summary::{CategoryTotal, MonthlyTotal, Summary, format_money};
pub use transaction::{Direction, Transaction, TransactionError, UNCATEGORIZED};
