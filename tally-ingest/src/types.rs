use std::path::PathBuf;

use tally_core::Transaction;
use thiserror::Error;

/// Header names a statement export must carry (matched after trimming)
pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Details", "Amount", "Debit/Credit"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Normalized output of the statement parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub transactions: Vec<Transaction>,
    /// Rows dropped because date, amount or Debit/Credit flag did not parse
    pub skipped_rows: usize,
}
