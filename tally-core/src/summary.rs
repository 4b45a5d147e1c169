//! Summary metrics over categorized transactions: totals, per-category
//! spending, and a month-by-month trend.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::transaction::Transaction;

/// Aggregate view of a statement
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Income minus expenses; negative when spending exceeded income
    pub net_income: Decimal,
    pub transaction_count: usize,
    /// Expense totals per category, largest first
    pub by_category: Vec<CategoryTotal>,
    /// Oldest month first
    pub monthly: Vec<MonthlyTotal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

impl MonthlyTotal {
    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl Summary {
    pub fn from_records(records: &[Transaction]) -> Self {
        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut net_income = Decimal::ZERO;
        let mut categories: HashMap<&str, (Decimal, usize)> = HashMap::new();
        // (year, month) -> (income, expenses, net)
        let mut months: BTreeMap<(i32, u32), (Decimal, Decimal, Decimal)> = BTreeMap::new();

        for t in records {
            let month = months
                .entry((t.date().year(), t.date().month()))
                .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
            net_income += t.signed_amount();
            month.2 += t.signed_amount();

            if t.is_expense() {
                total_expenses += t.amount();
                month.1 += t.amount();
                let entry = categories.entry(t.category()).or_insert((Decimal::ZERO, 0));
                entry.0 += t.amount();
                entry.1 += 1;
            } else {
                total_income += t.amount();
                month.0 += t.amount();
            }
        }

        let mut by_category: Vec<CategoryTotal> = categories
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category: category.to_string(),
                total,
                count,
            })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

        let monthly = months
            .into_iter()
            .map(|((year, month), (income, expenses, net))| MonthlyTotal {
                year,
                month,
                income,
                expenses,
                net,
            })
            .collect();

        Summary {
            total_income,
            total_expenses,
            net_income,
            transaction_count: records.len(),
            by_category,
            monthly,
        }
    }
}

/// Format an amount as `$1,234.50` (or `-$1,234.50`)
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(2);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{frac_part}")
}
