//! Cross-source combination of per-source monthly metrics.

use std::collections::BTreeMap;

use crate::metrics::MonthlyMetric;
use crate::transaction::YearMonth;

/// Monthly metrics summed across every source, plus the derived savings rate.
///
/// Beginning/ending balances are summed across sources, NOT reconciled into
/// a true combined account balance. Treat the balance columns as an
/// approximation when sources are separate real accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedMonthlyMetric {
    pub year_month: YearMonth,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance_beginning: f64,
    pub balance_ending: f64,
    /// `(income - expense) / income`; non-finite when income is 0
    pub savings_rate: f64,
}

/// Merge per-source monthly tables into one combined table, ascending by
/// month. A source missing a month contributes zero to that month's sums.
pub fn combine_sources(per_source: &[Vec<MonthlyMetric>]) -> Vec<CombinedMonthlyMetric> {
    let mut buckets: BTreeMap<YearMonth, CombinedMonthlyMetric> = BTreeMap::new();

    for metrics in per_source {
        for m in metrics {
            let combined = buckets
                .entry(m.year_month)
                .or_insert_with(|| CombinedMonthlyMetric {
                    year_month: m.year_month,
                    total_income: 0.0,
                    total_expense: 0.0,
                    balance_beginning: 0.0,
                    balance_ending: 0.0,
                    savings_rate: 0.0,
                });
            combined.total_income += m.total_income;
            combined.total_expense += m.total_expense;
            combined.balance_beginning += m.balance_beginning;
            combined.balance_ending += m.balance_ending;
        }
    }

    buckets
        .into_values()
        .map(|mut c| {
            c.savings_rate = (c.total_income - c.total_expense) / c.total_income;
            c
        })
        .collect()
}
