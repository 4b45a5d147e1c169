//! Generic bank statement CSV parser.
//!
//! Expected header (column order does not matter, names are trimmed):
//!   Date,Details,Amount,Debit/Credit
//!   14/03/2024,NETFLIX.COM,15.99,Debit
//!   15/03/2024,SALARY ACME LTD,"5,000.00",Credit

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tally_core::{Direction, Transaction};
use tracing::{debug, info};

use crate::parsers::fields::{FieldParser, parse_amount};
use crate::types::{IngestError, ParsedStatement, REQUIRED_COLUMNS};

struct ColumnIndex {
    date: usize,
    details: usize,
    amount: usize,
    direction: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns(missing));
        }

        let [date, details, amount, direction] = REQUIRED_COLUMNS.map(|name| position(name).unwrap_or(0));
        Ok(Self {
            date,
            details,
            amount,
            direction,
        })
    }
}

/// Parse a statement CSV file on disk.
pub fn parse_statement_csv(path: impl AsRef<Path>) -> Result<ParsedStatement, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IngestError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let parsed = parse_statement_reader(file)?;
    info!(
        path = %path.display(),
        parsed = parsed.transactions.len(),
        skipped = parsed.skipped_rows,
        "statement ingested"
    );
    Ok(parsed)
}

/// Parse statement CSV data from any reader.
///
/// Rows with an unparseable date, amount or Debit/Credit flag are dropped and
/// counted in [`ParsedStatement::skipped_rows`]; they never fail the import.
/// Cells that are not valid UTF-8 are decoded lossily.
pub fn parse_statement_reader<R: Read>(reader: R) -> Result<ParsedStatement, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(rdr.headers()?)?;
    let fields = FieldParser::new()?;

    let mut transactions = Vec::new();
    let mut skipped_rows = 0;

    for (row, result) in rdr.byte_records().enumerate() {
        let record = result?;
        // Exports in legacy code pages carry non-UTF-8 bytes; decode lossily.
        let cell = |idx: usize| String::from_utf8_lossy(record.get(idx).unwrap_or(b"")).trim().to_string();
        let (date_text, amount_text, flag_text) = (cell(columns.date), cell(columns.amount), cell(columns.direction));

        let Some(date) = fields.parse_date(&date_text) else {
            debug!(row, value = %date_text, "dropping row: unparseable date");
            skipped_rows += 1;
            continue;
        };

        let Some(amount) = parse_amount(&amount_text) else {
            debug!(row, value = %amount_text, "dropping row: unparseable amount");
            skipped_rows += 1;
            continue;
        };

        let Some(direction) = Direction::from_flag(&flag_text) else {
            debug!(row, value = %flag_text, "dropping row: unknown Debit/Credit flag");
            skipped_rows += 1;
            continue;
        };

        match Transaction::new(date, cell(columns.details), amount, direction) {
            Ok(t) => transactions.push(t),
            Err(e) => {
                debug!(row, error = %e, "dropping row");
                skipped_rows += 1;
            }
        }
    }

    Ok(ParsedStatement {
        transactions,
        skipped_rows,
    })
}
