//! Expense reductions for the console report: per-category totals and the
//! largest individual outflows.

use std::collections::HashMap;

use crate::transaction::Transaction;

/// Label applied to expenses the classifier never categorized.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Total spent per category label, magnitudes, descending.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_spent: f64,
}

/// Sum expense rows (`amount < 0`) by category label, descending by total.
/// Uncategorized rows group under [`FALLBACK_CATEGORY`].
pub fn expense_by_category(txns: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for t in txns.iter().filter(|t| t.is_expense()) {
        let label = t.category.as_deref().unwrap_or(FALLBACK_CATEGORY);
        *totals.entry(label).or_insert(0.0) += -t.amount;
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_spent)| CategoryTotal {
            category: category.to_string(),
            total_spent,
        })
        .collect();
    // Descending by amount; label breaks ties so the order is deterministic.
    out.sort_by(|a, b| {
        b.total_spent
            .partial_cmp(&a.total_spent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}

/// The `n` largest outflows by magnitude, most expensive first.
pub fn top_expenses(txns: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut expenses: Vec<&Transaction> = txns.iter().filter(|t| t.is_expense()).collect();
    expenses.sort_by(|a, b| {
        a.amount
            .partial_cmp(&b.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    expenses.truncate(n);
    expenses
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn tx(day: u32, amount: f64, category: Option<&str>) -> Transaction {
        let mut t = Transaction::new(ts(day), amount, 0.0, "desc", "X");
        t.category = category.map(str::to_string);
        t
    }

    #[test]
    fn test_expenses_grouped_descending() {
        let txns = vec![
            tx(1, -30.0, Some("Groceries")),
            tx(2, -20.0, Some("Dining")),
            tx(3, -25.0, Some("Groceries")),
            tx(4, 100.0, Some("Savings")), // income ignored
        ];
        let totals = expense_by_category(&txns);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Groceries");
        assert_eq!(totals[0].total_spent, 55.0);
        assert_eq!(totals[1].category, "Dining");
        assert_eq!(totals[1].total_spent, 20.0);
    }

    #[test]
    fn test_uncategorized_groups_under_other() {
        let txns = vec![tx(1, -10.0, None), tx(2, -15.0, None)];
        let totals = expense_by_category(&txns);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category, FALLBACK_CATEGORY);
        assert_eq!(totals[0].total_spent, 25.0);
    }

    #[test]
    fn test_top_expenses_largest_first() {
        let txns = vec![
            tx(1, -10.0, None),
            tx(2, -50.0, None),
            tx(3, 70.0, None),
            tx(4, -30.0, None),
        ];
        let top = top_expenses(&txns, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].amount, -50.0);
        assert_eq!(top[1].amount, -30.0);
    }

    #[test]
    fn test_top_expenses_handles_short_input() {
        let txns = vec![tx(1, -10.0, None)];
        assert_eq!(top_expenses(&txns, 5).len(), 1);
        assert!(top_expenses(&[], 5).is_empty());
    }
}
