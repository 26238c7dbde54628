//! Error type shared by the readers, loaders and exporters.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// An expected input file does not exist. Raised before any parsing.
    #[error("missing {kind} file: {}", path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    pub fn is_missing_file(&self) -> bool {
        matches!(self, IngestError::MissingFile { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
