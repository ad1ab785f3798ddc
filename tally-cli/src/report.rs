//! Console tables and CSV artifacts for the aggregated results.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use tally_core::{CategoryTotal, CombinedMonthlyMetric, MonthlyMetric, Summary, Transaction};

#[derive(Debug, Serialize, Deserialize)]
struct MonthlyRow {
    year_month: String,
    total_income: f64,
    total_expense: f64,
    balance_beginning: f64,
    balance_ending: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CombinedRow {
    year_month: String,
    total_income: f64,
    total_expense: f64,
    balance_beginning: f64,
    balance_ending: f64,
    savings_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SummaryRow {
    metric: String,
    value: f64,
}

#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    date: String,
    amount: f64,
    balance: f64,
    description: &'a str,
    source: &'a str,
    category: &'a str,
}

pub fn write_monthly_csv(path: &Path, metrics: &[MonthlyMetric]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for m in metrics {
        wtr.serialize(MonthlyRow {
            year_month: m.year_month.to_string(),
            total_income: m.total_income,
            total_expense: m.total_expense,
            balance_beginning: m.balance_beginning,
            balance_ending: m.balance_ending,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a per-source metrics table back from disk.
pub fn read_monthly_csv(path: &Path) -> Result<Vec<MonthlyMetric>> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
    let mut metrics = Vec::new();
    for row in rdr.deserialize() {
        let row: MonthlyRow = row?;
        metrics.push(MonthlyMetric {
            year_month: row.year_month.parse()?,
            total_income: row.total_income,
            total_expense: row.total_expense,
            balance_beginning: row.balance_beginning,
            balance_ending: row.balance_ending,
        });
    }
    Ok(metrics)
}

pub fn write_combined_csv(path: &Path, combined: &[CombinedMonthlyMetric]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for c in combined {
        wtr.serialize(CombinedRow {
            year_month: c.year_month.to_string(),
            total_income: c.total_income,
            total_expense: c.total_expense,
            balance_beginning: c.balance_beginning,
            balance_ending: c.balance_ending,
            savings_rate: c.savings_rate,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_csv(path: &Path, summary: &Summary) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for (metric, value) in summary_rows(summary) {
        wtr.serialize(SummaryRow {
            metric: metric.to_string(),
            value,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_transactions_csv(path: &Path, txns: &[Transaction]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for t in txns {
        wtr.serialize(TransactionRow {
            date: t.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            amount: t.amount,
            balance: t.balance,
            description: &t.description,
            source: &t.source_name,
            category: t.category.as_deref().unwrap_or(""),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn summary_rows(summary: &Summary) -> [(&'static str, f64); 4] {
    [
        ("Total Income", summary.total_income),
        ("Total Expense", summary.total_expense),
        ("Overall Balance Change", summary.balance_change),
        ("Savings Rate (Average)", summary.avg_savings_rate),
    ]
}

/// Render rows as an aligned plain-text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    for (i, h) in headers.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", h, width = widths[i]));
    }
    out.push('\n');
    for (i, _) in headers.iter().enumerate() {
        out.push_str(&"-".repeat(widths[i]));
        out.push_str("  ");
    }
    out.push('\n');
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}

pub fn monthly_table(metrics: &[MonthlyMetric]) -> String {
    let rows: Vec<Vec<String>> = metrics
        .iter()
        .map(|m| {
            vec![
                m.year_month.to_string(),
                format!("{:.2}", m.total_income),
                format!("{:.2}", m.total_expense),
                format!("{:.2}", m.balance_beginning),
                format!("{:.2}", m.balance_ending),
            ]
        })
        .collect();
    render_table(
        &["Month", "Income", "Expense", "Balance Begin", "Balance End"],
        &rows,
    )
}

pub fn combined_table(combined: &[CombinedMonthlyMetric]) -> String {
    let rows: Vec<Vec<String>> = combined
        .iter()
        .map(|c| {
            vec![
                c.year_month.to_string(),
                format!("{:.2}", c.total_income),
                format!("{:.2}", c.total_expense),
                format!("{:.2}", c.balance_beginning),
                format!("{:.2}", c.balance_ending),
                format!("{:.4}", c.savings_rate),
            ]
        })
        .collect();
    render_table(
        &["Month", "Income", "Expense", "Balance Begin", "Balance End", "Savings Rate"],
        &rows,
    )
}

pub fn category_table(totals: &[CategoryTotal]) -> String {
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|t| vec![t.category.clone(), format!("{:.2}", t.total_spent)])
        .collect();
    render_table(&["Category", "Total Spent"], &rows)
}

pub fn summary_table(summary: &Summary) -> String {
    let rows: Vec<Vec<String>> = summary_rows(summary)
        .iter()
        .map(|(metric, value)| vec![metric.to_string(), format!("{value:.2}")])
        .collect();
    render_table(&["Metric", "Value"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::YearMonth;

    fn metric(income: f64, expense: f64) -> MonthlyMetric {
        MonthlyMetric {
            year_month: YearMonth::new(2024, 6),
            total_income: income,
            total_expense: expense,
            balance_beginning: 1100.0,
            balance_ending: 1060.0,
        }
    }

    #[test]
    fn test_monthly_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let metrics = vec![metric(100.0, 40.0), {
            let mut m = metric(0.125, 9999.99);
            m.year_month = YearMonth::new(2024, 7);
            m
        }];

        write_monthly_csv(&path, &metrics).unwrap();
        let back = read_monthly_csv(&path).unwrap();

        assert_eq!(back.len(), metrics.len());
        for (a, b) in metrics.iter().zip(&back) {
            assert_eq!(a.year_month, b.year_month);
            assert!((a.total_income - b.total_income).abs() < 1e-9);
            assert!((a.total_expense - b.total_expense).abs() < 1e-9);
            assert!((a.balance_beginning - b.balance_beginning).abs() < 1e-9);
            assert!((a.balance_ending - b.balance_ending).abs() < 1e-9);
        }
    }

    #[test]
    fn test_summary_csv_has_four_named_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let summary = Summary {
            total_income: 310.0,
            total_expense: 95.0,
            balance_change: 115.0,
            avg_savings_rate: 0.6,
        };
        write_summary_csv(&path, &summary).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<SummaryRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].metric, "Total Income");
        assert_eq!(rows[3].metric, "Savings Rate (Average)");
        assert_eq!(rows[3].value, 0.6);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(
            &["A", "Long Header"],
            &[vec!["xx".to_string(), "1".to_string()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("A "));
        assert!(lines[1].contains("-----------"));
    }

    #[test]
    fn test_tables_render_without_error() {
        let metrics = vec![metric(100.0, 40.0)];
        assert!(monthly_table(&metrics).contains("2024-06"));

        let combined = tally_core::combine_sources(&[metrics]);
        assert!(combined_table(&combined).contains("0.6000"));

        let totals = vec![CategoryTotal {
            category: "Groceries".to_string(),
            total_spent: 55.0,
        }];
        assert!(category_table(&totals).contains("Groceries"));
    }
}
