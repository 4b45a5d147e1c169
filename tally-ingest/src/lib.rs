//! tally-ingest: bank statement CSV ingestion into typed transaction records.

pub mod parsers;
pub mod types;

pub use parsers::statement_csv::{parse_statement_csv, parse_statement_reader};
pub use types::{IngestError, ParsedStatement, REQUIRED_COLUMNS};
