//! Per-source normalization: chronological ordering and categorization.
//!
//! Date coercion happens inside the parsers (rows with unparseable dates
//! never reach this point), so normalization is ordering plus the
//! classification pass.

use tracing::warn;

use crate::classify::{Classifier, classify_in_batches};
use crate::transaction::Transaction;

/// Normalize one source's parsed transactions: stable-sort ascending by
/// date (ties keep input order), then fill categories through the injected
/// classifier.
///
/// Classifier failure never aborts the pipeline; affected rows keep
/// `category = None` and everything downstream proceeds. Pass `None` to skip
/// classification entirely.
pub fn normalize(
    mut txns: Vec<Transaction>,
    classifier: Option<&dyn Classifier>,
    labels: &[String],
    batch_size: usize,
) -> Vec<Transaction> {
    txns.sort_by_key(|t| t.date);

    if let Some(classifier) = classifier {
        let texts: Vec<String> = txns.iter().map(|t| t.description.clone()).collect();
        match classify_in_batches(classifier, &texts, labels, batch_size) {
            Ok(assigned) => {
                for (t, label) in txns.iter_mut().zip(assigned) {
                    t.category = Some(label);
                }
            }
            Err(err) => {
                warn!("classification unavailable, leaving categories unset: {err:#}");
            }
        }
    }

    txns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::stub::{FailingStub, KeywordStub};
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn labels() -> Vec<String> {
        vec!["Groceries".to_string(), "Other".to_string()]
    }

    #[test]
    fn test_sorts_ascending_keeping_tie_order() {
        let txns = vec![
            Transaction::new(ts(15, 9), -1.0, 9.0, "third", "X"),
            Transaction::new(ts(1, 9), 1.0, 10.0, "first-tie", "X"),
            Transaction::new(ts(1, 9), 2.0, 12.0, "second-tie", "X"),
        ];
        let out = normalize(txns, None, &labels(), 32);
        assert_eq!(out[0].description, "first-tie");
        assert_eq!(out[1].description, "second-tie");
        assert_eq!(out[2].description, "third");
    }

    #[test]
    fn test_classifier_fills_categories() {
        let txns = vec![
            Transaction::new(ts(1, 9), -5.0, 5.0, "MERCADONA GROCERIES", "X"),
            Transaction::new(ts(2, 9), -5.0, 0.0, "UNKNOWN SHOP", "X"),
        ];
        let out = normalize(txns, Some(&KeywordStub), &labels(), 32);
        assert_eq!(out[0].category.as_deref(), Some("Groceries"));
        assert_eq!(out[1].category.as_deref(), Some("Other"));
    }

    #[test]
    fn test_classifier_failure_leaves_pipeline_intact() {
        let txns = vec![
            Transaction::new(ts(2, 9), -5.0, 5.0, "b", "X"),
            Transaction::new(ts(1, 9), 10.0, 10.0, "a", "X"),
        ];
        let with_failure = normalize(txns.clone(), Some(&FailingStub), &labels(), 32);
        let without = normalize(txns, None, &labels(), 32);
        // Same ordering, all categories unset.
        assert_eq!(with_failure, without);
        assert!(with_failure.iter().all(|t| t.category.is_none()));
    }

    #[test]
    fn test_batch_size_does_not_change_normalization() {
        let txns: Vec<Transaction> = (1..=28)
            .map(|d| Transaction::new(ts(d, 9), -1.0, 0.0, format!("GROCERIES {d}"), "X"))
            .collect();
        let one = normalize(txns.clone(), Some(&KeywordStub), &labels(), 1);
        let thirty_two = normalize(txns.clone(), Some(&KeywordStub), &labels(), 32);
        let all = normalize(txns.clone(), Some(&KeywordStub), &labels(), txns.len());
        assert_eq!(one, thirty_two);
        assert_eq!(thirty_two, all);
    }
}
