//! Output formatting for audit reports.
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Json`](OutputFormat::Json)       | [`json`]    | Automation, input to `report` |
//! | [`Csv`](OutputFormat::Csv)         | [`csv`]     | Spreadsheets |
//! | [`Summary`](OutputFormat::Summary) | [`summary`] | Terminal review |
//! | [`Html`](OutputFormat::Html)       | [`html`]    | Shareable dashboard |
//! | [`Sarif`](OutputFormat::Sarif)     | [`sarif`]   | CI/CD code-scanning upload |
//!
//! Use [`format_report`] to render an [`AuditReport`] in any of the above
//! formats.

pub mod csv;
pub mod html;
pub mod json;
pub mod sarif;
pub mod summary;

use crate::error::AuditError;
use crate::record::AuditReport;

/// Supported output formats for audit reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON with every package and release.
    Json,
    /// One row per package.
    Csv,
    /// Human-readable colored text.
    Summary,
    /// Self-contained HTML page.
    Html,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats an [`AuditReport`] in the requested [`OutputFormat`].
///
/// # Errors
///
/// Only the HTML renderer can fail.
///
/// # Examples
///
/// ```rust,no_run
/// use operator_audit::output::{format_report, OutputFormat};
/// # use operator_audit::record::AuditReport;
/// # fn example(report: &AuditReport) {
/// let json = format_report(report, OutputFormat::Json).unwrap();
/// println!("{json}");
/// # }
/// ```
pub fn format_report(report: &AuditReport, format: OutputFormat) -> Result<String, AuditError> {
    match format {
        OutputFormat::Json => Ok(json::format(report)),
        OutputFormat::Csv => Ok(csv::format(report)),
        OutputFormat::Summary => Ok(summary::format(report)),
        OutputFormat::Html => html::format(report),
        OutputFormat::Sarif => Ok(sarif::format(report)),
    }
}
