//! Openbank (ES) export parser.
//!
//! Exports are semicolon-delimited with a ~10-row metadata banner before the
//! column header:
//! Fecha Operación;Fecha Valor;Concepto;Importe;Saldo
//! Dates are DD/MM/YYYY (no time of day). Numbers use `.` as thousands
//! separator and `,` as decimal separator ("1.234,56").

use std::io::Read;

use chrono::NaiveDate;
use tracing::debug;

use crate::IngestError;
use tally_core::Transaction;

pub const SOURCE_NAME: &str = "Openbank";

const DATE_FORMAT: &str = "%d/%m/%Y";
const HEADER_FIRST_COLUMN: &str = "Fecha Operación";

/// Parse an Openbank export, returning all valid transactions.
///
/// Skips the metadata banner automatically. Malformed rows (trailing
/// summaries, unparseable dates or numbers) are dropped, not fatal.
pub fn parse(reader: impl Read) -> Result<Vec<Transaction>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut txns = Vec::new();
    let mut dropped = 0usize;
    let mut header_found = false;

    for result in rdr.records() {
        let record = result?;

        // Skip the banner until the column header row.
        if !header_found {
            if record.get(0).map(str::trim) == Some(HEADER_FIRST_COLUMN) {
                header_found = true;
            }
            continue;
        }

        if record.len() < 5 {
            dropped += 1;
            continue;
        }

        let date_str = record.get(0).unwrap_or("").trim();
        let date = match NaiveDate::parse_from_str(date_str, DATE_FORMAT) {
            Ok(d) => d.and_hms_opt(0, 0, 0).unwrap(),
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let (amount, balance) = match (
            parse_es_number(record.get(3).unwrap_or("")),
            parse_es_number(record.get(4).unwrap_or("")),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                dropped += 1;
                continue;
            }
        };

        txns.push(Transaction::new(
            date,
            amount,
            balance,
            record.get(2).unwrap_or("").trim(),
            SOURCE_NAME,
        ));
    }

    if !header_found {
        return Err(IngestError::MissingColumn {
            source_name: SOURCE_NAME,
            column: HEADER_FIRST_COLUMN,
        });
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

/// Parse a Spanish-locale number: `.` thousands separator, `,` decimal
/// separator ("1.234,56" -> 1234.56).
fn parse_es_number(s: &str) -> Option<f64> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().ok()
}
