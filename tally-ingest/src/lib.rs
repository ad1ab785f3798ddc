//! tally-ingest: institution-specific export parsers and the source registry.

pub mod parsers;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use tally_core::Transaction;

/// Ingest failure taxonomy. Structural problems are fatal for one source's
/// run; individual malformed rows are dropped inside the parsers instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{source_name}: missing expected column {column:?}")]
    MissingColumn {
        source_name: &'static str,
        column: &'static str,
    },
    #[error("{source_name}: no transaction rows after header strip")]
    NoTransactions { source_name: &'static str },
    #[error("unrecognized source kind {0:?}")]
    UnknownSource(String),
}

/// Known institutions, one parser each.
///
/// Resolution happens at configuration-load time so an unknown name fails
/// before any file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Openbank,
    Revolut,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Openbank, SourceKind::Revolut];

    /// Canonical source tag stamped on every parsed transaction.
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Openbank => parsers::openbank::SOURCE_NAME,
            SourceKind::Revolut => parsers::revolut::SOURCE_NAME,
        }
    }

    /// Resolve a configured source name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, IngestError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openbank" => Ok(SourceKind::Openbank),
            "revolut" => Ok(SourceKind::Revolut),
            _ => Err(IngestError::UnknownSource(name.to_string())),
        }
    }

    /// Parse an export through this institution's parser.
    pub fn parse_reader(self, reader: impl Read) -> Result<Vec<Transaction>, IngestError> {
        match self {
            SourceKind::Openbank => parsers::openbank::parse(reader),
            SourceKind::Revolut => parsers::revolut::parse(reader),
        }
    }

    /// Convenience wrapper opening `path` and parsing it.
    pub fn parse_path(self, path: impl AsRef<Path>) -> Result<Vec<Transaction>, IngestError> {
        let file = File::open(path.as_ref())?;
        self.parse_reader(BufReader::new(file))
    }
}
