//! Field-level parsing for statement rows: dates and amounts.
//!
//! Dates are read day-first regardless of locale:
//!   14/03/2024   14-03-2024   14.03.24   2024-03-14   14 Mar 2024

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

pub struct FieldParser {
    day_first: Regex,
    iso: Regex,
    named_month: Regex,
}

impl FieldParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            day_first: Regex::new(r"^(?P<d>\d{1,2})[/.\-](?P<m>\d{1,2})[/.\-](?P<y>\d{4}|\d{2})$")?,
            iso: Regex::new(r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})(?:[T ].*)?$")?,
            named_month: Regex::new(
                r"^(?P<d>\d{1,2})[\s\-]+(?P<mon>[A-Za-z]{3,9})\.?[\s\-,]+(?P<y>\d{4}|\d{2})$",
            )?,
        })
    }

    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Some(caps) = self.iso.captures(s) {
            return ymd(&caps["y"], caps["m"].parse().ok()?, &caps["d"]);
        }

        if let Some(caps) = self.day_first.captures(s) {
            return ymd(&caps["y"], caps["m"].parse().ok()?, &caps["d"]);
        }

        if let Some(caps) = self.named_month.captures(s) {
            return ymd(&caps["y"], month_from_name(&caps["mon"])?, &caps["d"]);
        }

        None
    }
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    let mut y: i32 = year.parse().ok()?;
    if year.len() == 2 {
        y += 2000;
    }
    NaiveDate::from_ymd_opt(y, month, day.parse().ok()?)
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse an amount cell into a non-negative magnitude.
///
/// Currency symbols, thousands separators and accounting parentheses are
/// dropped; any sign is discarded because direction comes from the flag column.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(*c, '$' | '€' | '£' | ',' | '(' | ')' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok().map(|d| d.abs())
}
