//! CSV output formatter.
//!
//! One row per package. Fields are quoted per RFC 4180 when they contain a
//! comma, a quote, or a line break; the version list is comma-joined inside
//! a single quoted field.

use crate::record::{AuditReport, PackageRecord};

const HEADER: [&str; 10] = [
    "package_name",
    "total_releases",
    "latest_release",
    "platform_versions",
    "last_update",
    "specifier_shape",
    "risk_level",
    "has_ci_yaml",
    "has_makefile",
    "error",
];

/// Formats an [`AuditReport`] as CSV with a header row.
pub fn format(report: &AuditReport) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|h| h.to_string()));
    for package in &report.packages {
        push_row(&mut out, row(package));
    }
    out
}

fn row(package: &PackageRecord) -> impl Iterator<Item = String> {
    let versions: Vec<String> = package
        .platform_versions
        .iter()
        .map(|v| v.to_string())
        .collect();

    [
        package.name.clone(),
        package.total_releases().to_string(),
        package.latest_release.clone().unwrap_or_default(),
        versions.join(","),
        package
            .last_update
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        package.shape.to_string(),
        package.risk.to_string(),
        package.has_ci_yaml.to_string(),
        package.has_makefile.to_string(),
        package.error.clone().unwrap_or_default(),
    ]
    .into_iter()
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| escape(&f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Quotes a field when needed, doubling embedded quotes.
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
