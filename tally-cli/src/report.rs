//! Plain-text rendering of categorized records and summaries.

use std::fmt::Write;

use tally_core::{Summary, Transaction, format_money};
use tally_rules::CategoryStore;

pub fn render_records(records: &[Transaction], limit: usize, currency: &str) -> String {
    let shown = if limit == 0 { records.len() } else { limit.min(records.len()) };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:<36}  {:>12}  {:<6}  {}",
        "Date", "Details", "Amount", "Dir", "Category"
    );
    for t in &records[..shown] {
        let _ = writeln!(
            out,
            "{:<10}  {:<36}  {:>12}  {:<6}  {}",
            t.date().format("%Y-%m-%d").to_string(),
            truncate(t.details(), 36),
            format_money(t.amount(), currency),
            t.direction().label(),
            t.category()
        );
    }
    if shown < records.len() {
        let _ = writeln!(out, "... and {} more", records.len() - shown);
    }
    out
}

pub fn render_summary(summary: &Summary, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Income:   {}", format_money(summary.total_income, currency));
    let _ = writeln!(out, "Total Expenses: {}", format_money(summary.total_expenses, currency));
    let _ = writeln!(out, "Net Income:     {}", format_money(summary.net_income, currency));
    let _ = writeln!(out, "Transactions:   {}", summary.transaction_count);

    if !summary.by_category.is_empty() {
        let _ = writeln!(out, "\nSpending by category:");
        for c in &summary.by_category {
            let _ = writeln!(
                out,
                "  {:<24} {:>14}  ({} txns)",
                c.category,
                format_money(c.total, currency),
                c.count
            );
        }
    }

    if !summary.monthly.is_empty() {
        let _ = writeln!(out, "\nMonthly trend:");
        for m in &summary.monthly {
            let _ = writeln!(
                out,
                "  {}  in {:>14}  out {:>14}  net {:>14}",
                m.label(),
                format_money(m.income, currency),
                format_money(m.expenses, currency),
                format_money(m.net, currency)
            );
        }
    }
    out
}

pub fn render_store(store: &CategoryStore) -> String {
    let mut out = String::new();
    for (name, keywords) in store.iter() {
        if keywords.is_empty() {
            let _ = writeln!(out, "{name}");
        } else {
            let _ = writeln!(out, "{name}: {}", keywords.join(", "));
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max.saturating_sub(3)).collect();
    t.push_str("...");
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tally_core::Direction;

    fn txn(details: &str, cents: i64, direction: Direction, category: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            details,
            Decimal::new(cents, 2),
            direction,
        )
        .unwrap()
        .with_category(category)
    }

    #[test]
    fn test_render_records_with_limit() {
        let records = vec![
            txn("NETFLIX.COM", 5_000, Direction::Debit, "Streaming"),
            txn("SALARY", 500_000, Direction::Credit, "Uncategorized"),
        ];
        let out = render_records(&records, 1, "$");
        assert!(out.contains("NETFLIX.COM"));
        assert!(out.contains("$50.00"));
        assert!(out.contains("Streaming"));
        assert!(!out.contains("SALARY"));
        assert!(out.contains("... and 1 more"));

        let all = render_records(&records, 0, "$");
        assert!(all.contains("$5,000.00"));
    }

    #[test]
    fn test_render_summary() {
        let records = vec![
            txn("NETFLIX.COM", 5_000, Direction::Debit, "Streaming"),
            txn("SALARY", 500_000, Direction::Credit, "Uncategorized"),
        ];
        let out = render_summary(&Summary::from_records(&records), "$");
        assert!(out.contains("Total Income:   $5,000.00"));
        assert!(out.contains("Total Expenses: $50.00"));
        assert!(out.contains("Net Income:     $4,950.00"));
        assert!(out.contains("2024-03"));
    }

    #[test]
    fn test_render_store() {
        let mut store = CategoryStore::new();
        store.add_category("Streaming");
        store.add_keyword("Streaming", "netflix").unwrap();
        store.add_keyword("Streaming", "hulu").unwrap();
        assert_eq!(render_store(&store), "Uncategorized\nStreaming: NETFLIX, HULU\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("A VERY LONG MERCHANT NAME", 10), "A VERY ...");
    }
}
