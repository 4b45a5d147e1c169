//! Statement transaction record shared by ingest, categorization and summaries

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback category for records no keyword matched
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error("amount must be a non-negative magnitude, got {0}")]
    NegativeAmount(Decimal),
}

/// Whether money left the account (expense) or entered it (income)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
}

impl Direction {
    /// Parse a statement Debit/Credit flag. Accepts the short bank forms too.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim().to_ascii_lowercase().as_str() {
            "debit" | "dr" | "d" => Some(Direction::Debit),
            "credit" | "cr" | "c" => Some(Direction::Credit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Debit => "Debit",
            Direction::Credit => "Credit",
        }
    }
}

/// One row of a bank statement.
///
/// `amount` is always stored as a non-negative magnitude; whether it counts
/// as income or expense is carried by `direction`. Records are value types:
/// categorization produces copies via [`Transaction::with_category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    date: NaiveDate,
    details: String,
    amount: Decimal,
    direction: Direction,
    category: String,
}

#[derive(Deserialize)]
struct RawTransaction {
    date: NaiveDate,
    details: String,
    amount: Decimal,
    direction: Direction,
    #[serde(default = "default_category")]
    category: String,
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = TransactionError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        Ok(Transaction::new(raw.date, raw.details, raw.amount, raw.direction)?
            .with_category(raw.category))
    }
}

impl Transaction {
    /// Create an uncategorized record
    pub fn new(
        date: NaiveDate,
        details: impl Into<String>,
        amount: Decimal,
        direction: Direction,
    ) -> Result<Self, TransactionError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(TransactionError::NegativeAmount(amount));
        }
        Ok(Self {
            date,
            details: details.into(),
            amount,
            direction,
            category: UNCATEGORIZED.to_string(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Copy of this record with `category` set
    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
    }

    pub fn is_categorized(&self) -> bool {
        self.category != UNCATEGORIZED
    }

    /// Returns true if money left the account
    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Debit
    }

    /// Returns true if money entered the account
    pub fn is_income(&self) -> bool {
        self.direction == Direction::Credit
    }

    /// Amount with the sign implied by direction (debits negative)
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Debit => -self.amount,
            Direction::Credit => self.amount,
        }
    }
}
