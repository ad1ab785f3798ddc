//! Classification collaborator boundary.
//!
//! The pipeline never talks to a model directly; it goes through the
//! [`Classifier`] trait so tests can inject a deterministic stub.

use anyhow::{Result, bail};

/// External capability that assigns one label per input text, drawn from the
/// given label set. Synchronous, and allowed to fail entirely.
pub trait Classifier {
    fn classify(&self, texts: &[String], labels: &[String]) -> Result<Vec<String>>;
}

/// Drive the classifier over fixed-size chunks.
///
/// Batch size is a throughput knob only: results are identical for any size,
/// since classification is per-row and order-independent. A size of 0 is
/// treated as 1.
pub fn classify_in_batches(
    classifier: &dyn Classifier,
    texts: &[String],
    labels: &[String],
    batch_size: usize,
) -> Result<Vec<String>> {
    let batch_size = batch_size.max(1);
    let mut out = Vec::with_capacity(texts.len());

    for chunk in texts.chunks(batch_size) {
        let mut assigned = classifier.classify(chunk, labels)?;
        if assigned.len() != chunk.len() {
            bail!(
                "classifier returned {} labels for {} inputs",
                assigned.len(),
                chunk.len()
            );
        }
        out.append(&mut assigned);
    }

    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::stub::KeywordStub;
    use super::*;

    fn labels() -> Vec<String> {
        vec!["Groceries".to_string(), "Dining".to_string(), "Other".to_string()]
    }

    fn texts() -> Vec<String> {
        (0..70)
            .map(|i| match i % 3 {
                0 => format!("MERCADONA GROCERIES {i}"),
                1 => format!("RESTAURANT DINING {i}"),
                _ => format!("MISC {i}"),
            })
            .collect()
    }

    #[test]
    fn test_batch_size_never_changes_results() {
        let texts = texts();
        let labels = labels();
        let one = classify_in_batches(&KeywordStub, &texts, &labels, 1).unwrap();
        let thirty_two = classify_in_batches(&KeywordStub, &texts, &labels, 32).unwrap();
        let all = classify_in_batches(&KeywordStub, &texts, &labels, texts.len()).unwrap();
        assert_eq!(one, thirty_two);
        assert_eq!(thirty_two, all);
        assert_eq!(one.len(), texts.len());
    }

    #[test]
    fn test_zero_batch_size_treated_as_one() {
        let texts = texts();
        let labels = labels();
        let zero = classify_in_batches(&KeywordStub, &texts, &labels, 0).unwrap();
        let one = classify_in_batches(&KeywordStub, &texts, &labels, 1).unwrap();
        assert_eq!(zero, one);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        struct ShortStub;
        impl Classifier for ShortStub {
            fn classify(&self, _texts: &[String], labels: &[String]) -> Result<Vec<String>> {
                Ok(vec![labels[0].clone()])
            }
        }
        let err = classify_in_batches(&ShortStub, &texts(), &labels(), 8);
        assert!(err.is_err());
    }
}
