//! Inclusive date-range filtering over normalized transactions.

use chrono::NaiveDateTime;

use crate::transaction::Transaction;

/// Restrict a transaction set to an inclusive date window.
///
/// A `None` bound leaves that side open. The input is never mutated; an
/// empty result is valid.
pub fn filter_date_range(
    txns: &[Transaction],
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| start.map_or(true, |s| t.date >= s) && end.map_or(true, |e| t.date <= e))
        .cloned()
        .collect()
}
