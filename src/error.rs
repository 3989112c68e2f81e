//! Errors that abort an audit run.
//!
//! Anything that goes wrong for a single package or release is recorded on
//! that record instead (see [`PackageRecord::error`](crate::record::PackageRecord::error))
//! so one broken directory never stops the batch.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum AuditError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Catalog directory does not exist: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("Invalid package filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        source: regex::Error,
    },

    #[error("Failed to read analysis {}: {source}", path.display())]
    AnalysisRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse analysis {}: {source}", path.display())]
    AnalysisParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to render HTML report: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
