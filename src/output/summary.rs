//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly overview with ANSI color codes: batch totals,
//! platform-version coverage, shape and risk distributions, the packages that
//! qualify for removal, and the most recently updated packages.

use crate::record::AuditReport;
use crate::risk::RiskLevel;
use crate::specifier::SpecifierShape;
use colored::Colorize;

/// How many high-risk and recently updated packages are listed.
const LIST_LIMIT: usize = 10;

/// Formats an [`AuditReport`] as human-readable, ANSI-colored text.
pub fn format(report: &AuditReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        "  Catalog Audit Summary  ".bold().on_blue().white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", summary.analysis_timestamp.to_rfc3339()));

    out.push_str(&format!("  Total packages:             {}\n", summary.total_packages));
    out.push_str(&format!("  Total releases:             {}\n", summary.total_releases));
    out.push_str(&format!("  Packages with releases:     {}\n", summary.packages_with_releases));
    out.push_str(&format!("  Packages without releases:  {}\n", summary.packages_without_releases));
    out.push_str(&format!("  File-based catalogs:        {}\n", summary.fbc_packages));
    out.push_str(&format!("  Analysis errors:            {}\n\n", summary.errors));

    // Platform versions
    out.push_str(&format!(
        "{} ({} found)\n",
        "Platform Versions".bold().underline(),
        summary.all_platform_versions.len()
    ));
    for version in &summary.all_platform_versions {
        let count = summary.platform_version_counts.get(version).copied().unwrap_or(0);
        out.push_str(&format!("  {:<10} {} packages\n", version.to_string(), count));
    }
    out.push('\n');

    // Specifier shapes
    out.push_str(&format!("{}\n", "Specifier Shapes".bold().underline()));
    for shape in SpecifierShape::ALL {
        let label = match shape {
            SpecifierShape::OpenEnded | SpecifierShape::Mixed => shape.as_str().red().to_string(),
            SpecifierShape::Explicit | SpecifierShape::Ranged => shape.as_str().green().to_string(),
            SpecifierShape::None => shape.as_str().dimmed().to_string(),
        };
        out.push_str(&format!("  {label:<20} {}\n", summary.shape_count(shape)));
    }
    out.push('\n');

    // Risk
    out.push_str(&format!("{}\n", "Staleness Risk".bold().underline()));
    for risk in RiskLevel::ALL {
        out.push_str(&format!(
            "  [{}] {}\n",
            risk_label(risk),
            summary.risk_count(risk)
        ));
    }
    out.push('\n');

    let high = report.packages_at(RiskLevel::High);
    if !high.is_empty() {
        out.push_str(&format!(
            "{} ({} packages)\n",
            "Removal Candidates".bold().underline(),
            high.len()
        ));
        for package in high.iter().take(LIST_LIMIT) {
            out.push_str(&format!(
                "  {:<40} {}  {:.1} months\n",
                package.name,
                date_or_unknown(package.last_update),
                package.months_since_update.unwrap_or_default(),
            ));
        }
        if high.len() > LIST_LIMIT {
            out.push_str(&format!("  ... and {} more\n", high.len() - LIST_LIMIT).dimmed().to_string());
        }
        out.push('\n');
    }

    // Recently updated
    let recent = report.recently_updated(LIST_LIMIT);
    if !recent.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format!("Top {LIST_LIMIT} Most Recently Updated").bold().underline()
        ));
        for package in recent {
            out.push_str(&format!(
                "  {:<40} {}\n",
                package.name,
                date_or_unknown(package.last_update).dimmed()
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Result: {} packages, {} releases  |  {} high, {} medium, {} low, {} unknown\n",
        summary.total_packages,
        summary.total_releases,
        summary.risk_count(RiskLevel::High),
        summary.risk_count(RiskLevel::Medium),
        summary.risk_count(RiskLevel::Low),
        summary.risk_count(RiskLevel::Unknown),
    ));

    out
}

fn risk_label(risk: RiskLevel) -> String {
    match risk {
        RiskLevel::High => "   HIGH".red().bold().to_string(),
        RiskLevel::Medium => " MEDIUM".yellow().bold().to_string(),
        RiskLevel::Low => "    LOW".magenta().to_string(),
        RiskLevel::None => "   NONE".green().to_string(),
        RiskLevel::Unknown => "UNKNOWN".dimmed().to_string(),
    }
}

fn date_or_unknown(instant: Option<chrono::DateTime<chrono::Utc>>) -> String {
    instant
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
