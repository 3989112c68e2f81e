//! JSON output formatter.
//!
//! The document is the serialized [`AuditReport`] itself, so it can be read
//! back with [`read`] and rendered again (the `report` subcommand does this).

use crate::error::AuditError;
use crate::record::AuditReport;
use std::path::Path;

/// Formats an [`AuditReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &AuditReport) -> String {
    serde_json::to_string_pretty(report).expect("JSON serialization failed")
}

/// Reads a report previously written by [`format`].
pub fn read(path: &Path) -> Result<AuditReport, AuditError> {
    let content = std::fs::read_to_string(path).map_err(|source| AuditError::AnalysisRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AuditError::AnalysisParse {
        path: path.to_path_buf(),
        source,
    })
}
