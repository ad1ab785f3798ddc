//! Standard transaction schema shared by every institution parser.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single normalized financial movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Moment the institution recorded the movement
    pub date: NaiveDateTime,
    /// Positive = inflow, negative = outflow
    pub amount: f64,
    /// Account balance immediately after this movement, as reported by the source
    pub balance: f64,
    /// Institution-supplied narrative, used as classifier input
    pub description: String,
    /// Originating institution tag, constant per parser invocation
    pub source_name: String,
    /// Spending category; `None` until classification runs
    pub category: Option<String>,
}

impl Transaction {
    /// Create a new transaction with category unset.
    pub fn new(
        date: NaiveDateTime,
        amount: f64,
        balance: f64,
        description: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            balance,
            description: description.into(),
            source_name: source_name.into(),
            category: None,
        }
    }

    /// Calendar month this movement falls into.
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.date.year(),
            month: self.date.month(),
        }
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// Calendar year + month bucketing key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    /// Parse the `YYYY-MM` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("invalid year-month: {s:?}"))?;
        let year: i32 = y.parse()?;
        let month: u32 = m.parse()?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("invalid month in year-month: {s:?}");
        }
        Ok(YearMonth { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_year_month_derived_from_date() {
        let t = Transaction::new(ts(2024, 6, 15), -40.0, 1060.0, "Groceries", "Openbank");
        assert_eq!(t.year_month(), YearMonth::new(2024, 6));
    }

    #[test]
    fn test_year_month_display_and_parse() {
        let ym = YearMonth::new(2024, 6);
        assert_eq!(ym.to_string(), "2024-06");
        assert_eq!("2024-06".parse::<YearMonth>().unwrap(), ym);
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("garbage".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_ordering() {
        assert!(YearMonth::new(2023, 12) < YearMonth::new(2024, 1));
        assert!(YearMonth::new(2024, 6) < YearMonth::new(2024, 7));
    }

    #[test]
    fn test_income_expense_flags() {
        let inflow = Transaction::new(ts(2024, 6, 1), 100.0, 1100.0, "Payroll", "Openbank");
        let outflow = Transaction::new(ts(2024, 6, 15), -40.0, 1060.0, "Market", "Openbank");
        let zero = Transaction::new(ts(2024, 6, 20), 0.0, 1060.0, "Adjustment", "Openbank");
        assert!(inflow.is_income() && !inflow.is_expense());
        assert!(outflow.is_expense() && !outflow.is_income());
        assert!(!zero.is_income() && !zero.is_expense());
    }
}
