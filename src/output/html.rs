//! HTML report renderer.
//!
//! Builds a view model from the [`AuditReport`] and renders it through the
//! embedded Handlebars template (`report.hbs`). All numbers are formatted
//! here; the template only lays them out. Handlebars escapes every value, so
//! package names coming from the filesystem are safe to embed.

use crate::error::AuditError;
use crate::record::{AuditReport, PackageRecord};
use crate::risk::RiskLevel;
use crate::specifier::{SpecifierShape, SupportedVersion};
use chrono::{DateTime, Datelike, Duration, Utc};
use handlebars::Handlebars;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const TEMPLATE: &str = include_str!("report.hbs");

/// Packages listed in the per-package tables.
const TABLE_LIMIT: usize = 20;
/// Versions shown in the bar charts.
const CHART_LIMIT: usize = 10;
/// Vendors need at least this many packages to be scored for freshness.
const FRESHNESS_MIN_PACKAGES: usize = 3;
/// A package updated within this many days counts as fresh.
const FRESHNESS_WINDOW_DAYS: i64 = 180;
/// Vendors listed in the freshness chart.
const FRESHNESS_LIMIT: usize = 15;

/// Renders an [`AuditReport`] as a self-contained HTML page.
///
/// Ages are measured against the report's analysis timestamp, so rendering
/// a saved analysis later gives the same page.
pub fn format(report: &AuditReport) -> Result<String, AuditError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars
        .register_template_string("report", TEMPLATE)
        .map_err(|e| AuditError::Render(e.to_string()))?;

    handlebars
        .render("report", &view_model(report))
        .map_err(|e| AuditError::Render(e.to_string()))
}

fn view_model(report: &AuditReport) -> Value {
    let summary = &report.summary;
    let now = summary.analysis_timestamp;
    let total = summary.total_packages;

    json!({
        "generated": now.format("%Y-%m-%d %H:%M:%S").to_string(),
        "total_packages": total,
        "packages_with_releases": summary.packages_with_releases,
        "packages_without_releases": summary.packages_without_releases,
        "total_releases": summary.total_releases,
        "fbc_packages": summary.fbc_packages,
        "platform_version_total": summary.all_platform_versions.len(),
        "packages_at_risk": summary.packages_at_risk,
        "shapes": shape_bars(report),
        "shape_table": shape_table(report),
        "risks": risk_bars(report),
        "removal_candidates": report
            .packages_at(RiskLevel::High)
            .into_iter()
            .take(TABLE_LIMIT)
            .map(|p| package_row(p, 5))
            .collect::<Vec<_>>(),
        "top_versions": version_bars(&summary.platform_version_counts, total, CHART_LIMIT),
        "version_distribution": version_bars(&summary.platform_version_counts, total, usize::MAX),
        "fbc_versions": fbc_bars(report),
        "top_packages": top_packages(report),
        "recent_packages": report
            .recently_updated(TABLE_LIMIT)
            .into_iter()
            .map(|p| package_row(p, 3))
            .collect::<Vec<_>>(),
        "vendors": top_vendors(report),
        "freshness": vendor_freshness(report, now),
        "timeline": timeline(report),
    })
}

fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        "0.0".to_string()
    } else {
        format!("{:.1}", part as f64 / whole as f64 * 100.0)
    }
}

fn title(shape: SpecifierShape) -> &'static str {
    match shape {
        SpecifierShape::OpenEnded => "Open Ended",
        SpecifierShape::Explicit => "Explicit",
        SpecifierShape::Ranged => "Ranged",
        SpecifierShape::Mixed => "Mixed",
        SpecifierShape::None => "None",
    }
}

fn shape_bars(report: &AuditReport) -> Vec<Value> {
    let counts = &report.summary.shape_counts;
    let max = counts.values().copied().max().unwrap_or(0);
    let mut shapes: Vec<(SpecifierShape, usize)> = counts
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(s, n)| (*s, *n))
        .collect();
    shapes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    shapes
        .into_iter()
        .map(|(shape, count)| {
            json!({
                "key": shape.as_str(),
                "label": title(shape),
                "count": count,
                "width": percent(count, max),
            })
        })
        .collect()
}

fn shape_table(report: &AuditReport) -> Vec<Value> {
    let summary = &report.summary;
    [
        (SpecifierShape::OpenEnded, "Versions like \"v4.8\" - claim support for all subsequent versions"),
        (SpecifierShape::Explicit, "Versions like \"=v4.8\" - support only specific versions"),
        (SpecifierShape::Ranged, "Versions like \"v4.8-v4.12\" - support an explicit range"),
        (SpecifierShape::Mixed, "Combination of different version types"),
        (SpecifierShape::None, "No recognizable version specifier"),
    ]
    .into_iter()
    .map(|(shape, description)| {
        json!({
            "key": shape.as_str(),
            "label": title(shape),
            "description": description,
            "count": summary.shape_count(shape),
        })
    })
    .collect()
}

fn risk_bars(report: &AuditReport) -> Vec<Value> {
    let summary = &report.summary;
    RiskLevel::ALL
        .into_iter()
        .map(|risk| {
            let count = summary.risk_count(risk);
            json!({
                "key": risk.as_str(),
                "count": count,
                "width": percent(count, summary.total_packages),
                "pct": percent(count, summary.total_packages),
            })
        })
        .collect()
}

fn version_bars(counts: &BTreeMap<SupportedVersion, usize>, total: usize, limit: usize) -> Vec<Value> {
    let mut sorted: Vec<(&SupportedVersion, usize)> = counts.iter().map(|(v, n)| (v, *n)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let max = sorted.first().map(|(_, n)| *n).unwrap_or(0);

    sorted
        .into_iter()
        .take(limit)
        .map(|(version, count)| {
            json!({
                "version": version.to_string(),
                "count": count,
                "pct": percent(count, total),
                "width": percent(count, max),
            })
        })
        .collect()
}

fn fbc_bars(report: &AuditReport) -> Vec<Value> {
    let summary = &report.summary;
    let mut sorted: Vec<_> = summary.fbc_platform_version_counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    let max = sorted.first().map(|(_, n)| **n).unwrap_or(0);

    sorted
        .into_iter()
        .map(|(version, count)| {
            json!({
                "version": version.to_string(),
                "count": count,
                "pct": percent(*count, summary.fbc_packages),
                "width": percent(*count, max),
            })
        })
        .collect()
}

/// One table row; at most `shown` versions are listed before "+ N more".
fn package_row(package: &PackageRecord, shown: usize) -> Value {
    let versions: Vec<String> = package
        .platform_versions
        .iter()
        .take(shown)
        .map(|v| v.to_string())
        .collect();
    let mut versions = versions.join(", ");
    if package.platform_versions.len() > shown {
        versions.push_str(&format!(" + {} more", package.platform_versions.len() - shown));
    }

    json!({
        "name": package.name,
        "releases": package.total_releases(),
        "versions": versions,
        "last_update": package
            .last_update
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        "months": package.months_since_update.map(|m| format!("{m:.1}")),
        "shape": package.shape.as_str(),
        "risk": package.risk.as_str(),
        "fbc": package.fbc.is_some(),
    })
}

fn top_packages(report: &AuditReport) -> Vec<Value> {
    let mut packages: Vec<&PackageRecord> = report.packages.iter().collect();
    packages.sort_by(|a, b| {
        b.total_releases()
            .cmp(&a.total_releases())
            .then(a.name.cmp(&b.name))
    });
    packages
        .into_iter()
        .take(TABLE_LIMIT)
        .map(|p| package_row(p, 5))
        .collect()
}

fn top_vendors(report: &AuditReport) -> Vec<Value> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for package in &report.packages {
        *counts.entry(package.vendor()).or_default() += 1;
    }
    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    sorted
        .into_iter()
        .take(CHART_LIMIT)
        .map(|(vendor, count)| {
            json!({
                "vendor": vendor,
                "count": count,
                "pct": percent(count, report.summary.total_packages),
            })
        })
        .collect()
}

#[derive(Default)]
struct Freshness {
    count: usize,
    recent: usize,
    total_days: i64,
}

fn vendor_freshness(report: &AuditReport, now: DateTime<Utc>) -> Vec<Value> {
    let cutoff = now - Duration::days(FRESHNESS_WINDOW_DAYS);
    let mut vendors: BTreeMap<&str, Freshness> = BTreeMap::new();

    for package in &report.packages {
        let stats = vendors.entry(package.vendor()).or_default();
        stats.count += 1;
        if let Some(last) = package.last_update {
            stats.total_days += (now - last).num_days();
            if last > cutoff {
                stats.recent += 1;
            }
        }
    }

    let mut scored: Vec<(&str, Freshness, f64)> = vendors
        .into_iter()
        .filter(|(_, s)| s.count >= FRESHNESS_MIN_PACKAGES)
        .map(|(vendor, s)| {
            let score = s.recent as f64 / s.count as f64 * 100.0;
            (vendor, s, score)
        })
        .collect();
    scored.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(b.0)));
    scored.truncate(FRESHNESS_LIMIT);

    let max = scored.iter().map(|(_, _, score)| *score).fold(0.0, f64::max);

    scored
        .into_iter()
        .map(|(vendor, s, score)| {
            let width = if max > 0.0 { score / max * 100.0 } else { 0.0 };
            json!({
                "vendor": vendor,
                "count": s.count,
                "recent": s.recent,
                "score": format!("{score:.1}"),
                "width": format!("{width:.1}"),
                "avg_days": format!("{:.0}", s.total_days as f64 / s.count as f64),
            })
        })
        .collect()
}

/// Packages per half-year of their last update, newest period first.
fn timeline(report: &AuditReport) -> Vec<Value> {
    let mut periods: BTreeMap<String, usize> = BTreeMap::new();
    for last in report.packages.iter().filter_map(|p| p.last_update) {
        let half = if last.month() <= 6 { "H1" } else { "H2" };
        *periods.entry(format!("{}-{}", last.year(), half)).or_default() += 1;
    }

    let total: usize = periods.values().sum();
    let max = periods.values().copied().max().unwrap_or(0);

    periods
        .into_iter()
        .rev()
        .map(|(period, count)| {
            json!({
                "period": period,
                "count": count,
                "pct": percent(count, total),
                "width": percent(count, max),
            })
        })
        .collect()
}
