//! Revolut export parser.
//!
//! Comma-delimited with a header row; columns are located by (trimmed)
//! header name, so extra columns and reordering are tolerated. Timestamps
//! are YYYY-MM-DD HH:MM:SS, numbers plain dot-decimal.

use std::io::Read;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::IngestError;
use tally_core::Transaction;

pub const SOURCE_NAME: &str = "Revolut";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a Revolut export, returning all valid transactions.
///
/// Rows missing a parseable completed date, amount, or balance are dropped.
pub fn parse(reader: impl Read) -> Result<Vec<Transaction>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| -> Result<usize, IngestError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(IngestError::MissingColumn {
                source_name: SOURCE_NAME,
                column: name,
            })
    };

    let date_col = column("Completed Date")?;
    let desc_col = column("Description")?;
    let amount_col = column("Amount")?;
    let balance_col = column("Balance")?;

    let mut txns = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result?;

        let date_str = record.get(date_col).unwrap_or("").trim();
        let date = match NaiveDateTime::parse_from_str(date_str, DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let amount: f64 = match record.get(amount_col).unwrap_or("").trim().parse() {
            Ok(a) => a,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };
        let balance: f64 = match record.get(balance_col).unwrap_or("").trim().parse() {
            Ok(b) => b,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        txns.push(Transaction::new(
            date,
            amount,
            balance,
            record.get(desc_col).unwrap_or("").trim(),
            SOURCE_NAME,
        ));
    }

    if txns.is_empty() {
        return Err(IngestError::NoTransactions {
            source_name: SOURCE_NAME,
        });
    }
    if dropped > 0 {
        debug!("{SOURCE_NAME}: dropped {dropped} malformed rows");
    }

    Ok(txns)
}
