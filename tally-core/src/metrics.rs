//! Per-month income/expense/balance aggregation for a single source.

use std::collections::BTreeMap;

use crate::transaction::{Transaction, YearMonth};

/// Aggregated metrics for one source over one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyMetric {
    pub year_month: YearMonth,
    /// Sum of positive amounts, always >= 0
    pub total_income: f64,
    /// Magnitude of the summed negative amounts, always >= 0
    pub total_expense: f64,
    /// Balance after the chronologically first transaction of the month
    pub balance_beginning: f64,
    /// Balance after the chronologically last transaction of the month
    pub balance_ending: f64,
}

/// Aggregate date-sorted transactions into one row per month present,
/// ascending by month.
///
/// Months with no transactions are absent from the result; downstream
/// combination treats a missing month as zero contribution.
pub fn aggregate_monthly(txns: &[Transaction]) -> Vec<MonthlyMetric> {
    let mut buckets: BTreeMap<YearMonth, MonthlyMetric> = BTreeMap::new();

    for t in txns {
        let metric = buckets.entry(t.year_month()).or_insert_with(|| MonthlyMetric {
            year_month: t.year_month(),
            total_income: 0.0,
            total_expense: 0.0,
            balance_beginning: t.balance,
            balance_ending: t.balance,
        });

        if t.amount > 0.0 {
            metric.total_income += t.amount;
        } else if t.amount < 0.0 {
            metric.total_expense += -t.amount;
        }
        metric.balance_ending = t.balance;
    }

    buckets.into_values().collect()
}
