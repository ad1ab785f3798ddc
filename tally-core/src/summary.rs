//! Top-line totals across every source and month.

use crate::combine::CombinedMonthlyMetric;
use crate::metrics::MonthlyMetric;

/// Run-level summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Income summed over all months and sources
    pub total_income: f64,
    /// Expense summed over all months and sources
    pub total_expense: f64,
    /// Sum over sources of (final ending balance - first beginning balance)
    pub balance_change: f64,
    /// Mean of the finite monthly savings rates; NaN when none are finite
    pub avg_savings_rate: f64,
}

/// Reduce per-source and combined monthly tables to the four summary values.
///
/// Non-finite savings rates (months with zero income) are excluded from the
/// average. A source with an empty metric table contributes zero to the
/// balance change.
pub fn summarize(
    per_source: &[(String, Vec<MonthlyMetric>)],
    combined: &[CombinedMonthlyMetric],
) -> Summary {
    let total_income = combined.iter().map(|c| c.total_income).sum();
    let total_expense = combined.iter().map(|c| c.total_expense).sum();

    let balance_change = per_source
        .iter()
        .filter_map(|(_, metrics)| {
            let first = metrics.first()?;
            let last = metrics.last()?;
            Some(last.balance_ending - first.balance_beginning)
        })
        .sum();

    let finite_rates: Vec<f64> = combined
        .iter()
        .map(|c| c.savings_rate)
        .filter(|r| r.is_finite())
        .collect();
    let avg_savings_rate = if finite_rates.is_empty() {
        f64::NAN
    } else {
        finite_rates.iter().sum::<f64>() / finite_rates.len() as f64
    };

    Summary {
        total_income,
        total_expense,
        balance_change,
        avg_savings_rate,
    }
}
