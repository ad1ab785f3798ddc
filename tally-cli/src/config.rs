use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tally_ingest::SourceKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the CSV artifacts are written to
    pub output_dir: PathBuf,
    /// Inclusive window start, "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD"
    pub start_date: Option<String>,
    /// Inclusive window end, same formats
    pub end_date: Option<String>,
    pub classifier: ClassifierSection,
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSection {
    pub enabled: bool,
    pub endpoint: String,
    /// Bearer token for the inference endpoint; empty means unauthenticated
    #[serde(default)]
    pub api_token: String,
    /// Throughput knob only; never changes categorization results
    pub batch_size: usize,
    /// Candidate category labels; empty means the built-in default set
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Registered institution kind, e.g. "openbank" or "revolut"
    pub kind: String,
    /// Path to that institution's export file
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            start_date: Some("2024-06-01 12:00:00".to_string()),
            end_date: Some("2024-08-21 12:00:00".to_string()),
            classifier: ClassifierSection {
                enabled: true,
                endpoint:
                    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli"
                        .to_string(),
                api_token: String::new(),
                batch_size: 32,
                labels: Vec::new(),
            },
            sources: vec![
                SourceEntry {
                    kind: "openbank".to_string(),
                    path: PathBuf::from("data/openbank_junio-agosto.csv"),
                },
                SourceEntry {
                    kind: "revolut".to_string(),
                    path: PathBuf::from("data/revolut_junio-agosto.csv"),
                },
            ],
        }
    }
}

impl Config {
    /// Resolve every configured source through the registry. Unknown kinds
    /// fail here, before any export file is opened.
    pub fn resolved_sources(&self) -> Result<Vec<(SourceKind, PathBuf)>> {
        self.sources
            .iter()
            .map(|s| {
                let kind = SourceKind::from_name(&s.kind)
                    .with_context(|| format!("config source {:?}", s.kind))?;
                Ok((kind, s.path.clone()))
            })
            .collect()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config")?;
    cfg.resolved_sources()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(&Config::default(), path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Parse a window bound: "YYYY-MM-DD HH:MM:SS", or "YYYY-MM-DD" (midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid timestamp {s:?}: {e}"))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.sources.len(), 2);
        assert_eq!(back.classifier.batch_size, 32);
        assert_eq!(back.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_default_sources_resolve() {
        let cfg = Config::default();
        let resolved = cfg.resolved_sources().unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].0, SourceKind::Openbank);
        assert_eq!(resolved[1].0, SourceKind::Revolut);
    }

    #[test]
    fn test_unknown_source_kind_fails_before_io() {
        let mut cfg = Config::default();
        cfg.sources.push(SourceEntry {
            kind: "monzo".to_string(),
            path: PathBuf::from("does/not/matter.csv"),
        });
        let err = cfg.resolved_sources().unwrap_err();
        assert!(format!("{err:#}").contains("monzo"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let full = parse_timestamp("2024-06-01 12:00:00").unwrap();
        assert_eq!(full.to_string(), "2024-06-01 12:00:00");
        let midnight = parse_timestamp("2024-06-01").unwrap();
        assert_eq!(midnight.to_string(), "2024-06-01 00:00:00");
        assert!(parse_timestamp("June 1st").is_err());
    }
}
