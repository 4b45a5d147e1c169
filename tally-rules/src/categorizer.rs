//! Deterministic keyword categorizer.
//!
//! Categories are tried in store order and, within a category, keywords in
//! stored order. The first keyword that is a substring of the uppercased
//! description decides. Nothing matches -> "Uncategorized".
//!
//! Matching is a plain substring test: "NET" matches both "NETFLIX.COM" and
//! "SUPERMARKET".

use tally_core::{Transaction, UNCATEGORIZED};

use crate::store::CategoryStore;

/// Category for a single description
pub fn match_category<'a>(details: &str, store: &'a CategoryStore) -> &'a str {
    if details.is_empty() {
        return UNCATEGORIZED;
    }
    let desc = details.to_uppercase();

    store
        .iter()
        .filter(|(name, _)| *name != UNCATEGORIZED)
        .find(|(_, keywords)| keywords.iter().any(|k| desc.contains(k.as_str())))
        .map(|(name, _)| name)
        .unwrap_or(UNCATEGORIZED)
}

/// Categorize every record, in input order.
///
/// Returns copies with `category` set; the input is left untouched.
pub fn categorize(records: &[Transaction], store: &CategoryStore) -> Vec<Transaction> {
    records
        .iter()
        .map(|t| t.with_category(match_category(t.details(), store)))
        .collect()
}

/// Re-run categorization only on records selected by `filter`; the rest keep
/// their current category (including manual overrides).
pub fn recategorize<F>(records: &[Transaction], store: &CategoryStore, filter: F) -> Vec<Transaction>
where
    F: Fn(&Transaction) -> bool,
{
    records
        .iter()
        .map(|t| {
            if filter(t) {
                t.with_category(match_category(t.details(), store))
            } else {
                t.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tally_core::Direction;

    fn txn(details: &str, amount: i64, direction: Direction) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            details,
            Decimal::new(amount, 0),
            direction,
        )
        .unwrap()
    }

    fn store(rules: Vec<(&str, Vec<&str>)>) -> CategoryStore {
        let mut s = CategoryStore::new();
        for (name, keywords) in rules {
            s.add_category(name);
            for k in keywords {
                s.add_keyword(name, k).unwrap();
            }
        }
        s
    }

    #[test]
    fn test_end_to_end_example() {
        let s = store(vec![("Streaming", vec!["NETFLIX"])]);
        let records = vec![
            txn("NETFLIX.COM", 50, Direction::Debit),
            txn("SALARY", 5000, Direction::Credit),
        ];
        let out = categorize(&records, &s);
        assert_eq!(out[0].category(), "Streaming");
        assert_eq!(out[1].category(), UNCATEGORIZED);
        assert_eq!(out[0].amount(), Decimal::new(50, 0));
        assert_eq!(out[1].direction(), Direction::Credit);
    }

    #[test]
    fn test_category_order_is_primary_tie_break() {
        let s = store(vec![("Shopping", vec!["AMAZON"]), ("Streaming", vec!["NETFLIX"])]);
        assert_eq!(match_category("AMAZON PRIME NETFLIX BUNDLE", &s), "Shopping");

        let reversed = store(vec![("Streaming", vec!["NETFLIX"]), ("Shopping", vec!["AMAZON"])]);
        assert_eq!(match_category("AMAZON PRIME NETFLIX BUNDLE", &reversed), "Streaming");
    }

    #[test]
    fn test_keyword_order_within_category() {
        // An earlier category's second keyword outranks a later category's first.
        let s = store(vec![("Food", vec!["GROCERY", "CAFE"]), ("Coffee", vec!["CAFE"])]);
        assert_eq!(match_category("CAFE NERO", &s), "Food");
    }

    #[test]
    fn test_case_insensitive() {
        let s = store(vec![("Transport", vec!["uber"])]);
        assert_eq!(match_category("Uber *Trip help.uber.com", &s), "Transport");
        assert_eq!(match_category("uber eats", &s), "Transport");
    }

    #[test]
    fn test_empty_details_is_uncategorized() {
        let s = store(vec![("Anything", vec!["A", "E"])]);
        let out = categorize(&[txn("", 1, Direction::Debit)], &s);
        assert_eq!(out[0].category(), UNCATEGORIZED);
    }

    #[test]
    fn test_crude_substring_match_is_kept() {
        let s = store(vec![("Streaming", vec!["NET"])]);
        assert_eq!(match_category("NETFLIX.COM", &s), "Streaming");
        assert_eq!(match_category("SUPERMARKET", &s), "Streaming");
    }

    #[test]
    fn test_cold_start_store_matches_nothing() {
        let s = CategoryStore::new();
        assert_eq!(match_category("NETFLIX.COM", &s), UNCATEGORIZED);
    }

    #[test]
    fn test_input_not_mutated_and_idempotent() {
        let s = CategoryStore::starter();
        let records = vec![
            txn("AMAZON MKTPLACE", 30, Direction::Debit),
            txn("CITY WATER BOARD", 45, Direction::Debit),
            txn("PAYROLL", 3000, Direction::Credit),
        ];
        let first = categorize(&records, &s);
        let second = categorize(&records, &s);
        assert_eq!(first, second);
        assert!(records.iter().all(|t| t.category() == UNCATEGORIZED));
        assert_eq!(first[0].category(), "Shopping");
        assert_eq!(first[1].category(), "Utilities");
    }

    #[test]
    fn test_recategorize_only_touches_filtered() {
        let mut s = store(vec![("Streaming", vec!["NETFLIX"])]);
        let records = categorize(
            &[txn("NETFLIX.COM", 15, Direction::Debit), txn("UBER TRIP", 20, Direction::Debit)],
            &s,
        );
        let overridden = vec![records[0].with_category("Manual"), records[1].clone()];

        s.add_category("Transport");
        s.add_keyword("Transport", "uber").unwrap();
        s.add_keyword("Streaming", "uber").unwrap();

        let out = recategorize(&overridden, &s, |t| !t.is_categorized());
        assert_eq!(out[0].category(), "Manual");
        // Streaming comes first in the store, so its new keyword wins
        assert_eq!(out[1].category(), "Streaming");
    }
}
