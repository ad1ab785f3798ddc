//! tally-classify: HTTP zero-shot classification collaborator.
//!
//! Wraps a Hugging Face-style zero-shot inference endpoint behind the
//! `tally-core` [`Classifier`] trait. The whole call may fail (network,
//! model cold start); the pipeline recovers by leaving categories unset.

use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use tally_core::Classifier;

/// Default spending category label set, ordered most-specific first.
pub const DEFAULT_LABELS: [&str; 17] = [
    "Groceries",
    "Dining",
    "Transport",
    "Shopping",
    "Entertainment",
    "Utilities",
    "Rent",
    "Healthcare",
    "Insurance",
    "Savings",
    "Transfer",
    "Subscriptions",
    "Education",
    "Gifts & Donations",
    "Travel",
    "Personal Care",
    "Other",
];

/// The default label set as owned strings, for config plumbing.
pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Client for a zero-shot classification endpoint.
#[derive(Debug, Clone)]
pub struct ZeroShotClient {
    endpoint: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a [String],
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
}

/// One ranked result per input; `labels[0]` is the winning label.
#[derive(Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
}

impl ZeroShotClient {
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.filter(|t| !t.is_empty()),
        }
    }

    async fn classify_async(&self, texts: &[String], labels: &[String]) -> Result<Vec<String>> {
        let body = ZeroShotRequest {
            inputs: texts,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.api_token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }

        let client = reqwest::Client::new();
        let resp = client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("posting to {}", self.endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("classification endpoint returned {status}: {text}");
        }

        let results: Vec<ZeroShotResponse> =
            resp.json().await.context("decoding zero-shot response")?;
        if results.len() != texts.len() {
            bail!(
                "endpoint returned {} results for {} inputs",
                results.len(),
                texts.len()
            );
        }

        results
            .into_iter()
            .map(|r| {
                r.labels
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("empty label ranking in response"))
            })
            .collect()
    }
}

impl Classifier for ZeroShotClient {
    fn classify(&self, texts: &[String], labels: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        // Callers may or may not already be inside a tokio runtime; a nested
        // block_on would panic, so branch on the current handle.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.classify_async(texts, labels)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.classify_async(texts, labels))
        }
    }
}
