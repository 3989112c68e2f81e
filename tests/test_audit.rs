use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use operator_audit::audit::{aggregate_shape, analyze_package, run_audit};
use operator_audit::config::Config;
use operator_audit::error::AuditError;
use operator_audit::history::UpdateSource;
use operator_audit::record::{AuditReport, PackageRecord};
use operator_audit::risk::RiskLevel;
use operator_audit::specifier::{PlatformVersion, SpecifierShape, SupportedVersion};

const CATALOG: &str = "tests/fixtures/catalog";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

/// Serves recorded ages (in days) per package name.
struct FixedHistory(HashMap<&'static str, i64>);

impl UpdateSource for FixedHistory {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn last_update(&self, dir: &Path) -> Option<DateTime<Utc>> {
        let name = dir.file_name()?.to_str()?;
        self.0.get(name).map(|days| now() - Duration::days(*days))
    }
}

fn history() -> FixedHistory {
    FixedHistory(HashMap::from([
        ("acme-operator", 400),
        ("beta-operator", 400),
        ("broken-operator", 30),
    ]))
}

fn fixture_report() -> AuditReport {
    run_audit(Path::new(CATALOG), &Config::default(), None, &history(), now()).unwrap()
}

fn package<'a>(report: &'a AuditReport, name: &str) -> &'a PackageRecord {
    report
        .packages
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("package {name} missing"))
}

fn v(major: u32, minor: u32) -> SupportedVersion {
    SupportedVersion::Release(PlatformVersion::new(major, minor))
}

// ---------------------------------------------------------------------------
// Per-package analysis
// ---------------------------------------------------------------------------

#[test]
fn packages_are_audited_in_name_order() {
    let report = fixture_report();
    let names: Vec<&str> = report.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        ["acme-operator", "beta-operator", "broken-operator", "empty-operator"]
    );
}

#[test]
fn mixed_package_is_fully_described() {
    let report = fixture_report();
    let acme = package(&report, "acme-operator");

    assert_eq!(acme.total_releases(), 3);
    assert_eq!(acme.latest_release.as_deref(), Some("1.10.0"));
    assert_eq!(acme.shape, SpecifierShape::Mixed);
    assert!(acme.has_ci_yaml);
    assert!(acme.has_makefile);

    let expected: Vec<SupportedVersion> = (12..=20).map(|minor| v(4, minor)).collect();
    assert_eq!(acme.platform_versions.iter().cloned().collect::<Vec<_>>(), expected);

    let fbc = acme.fbc.as_ref().expect("acme ships catalog templates");
    assert_eq!(fbc.platform_versions.len(), 2);
}

#[test]
fn releases_keep_their_own_specifier_and_shape() {
    let report = fixture_report();
    let acme = package(&report, "acme-operator");
    let shapes: Vec<(&str, SpecifierShape)> = acme
        .releases
        .iter()
        .map(|r| (r.version.as_str(), r.shape))
        .collect();

    assert_eq!(
        shapes,
        [
            ("1.0.0", SpecifierShape::OpenEnded),
            ("1.2.0", SpecifierShape::Explicit),
            ("1.10.0", SpecifierShape::Ranged),
        ]
    );
    assert_eq!(acme.releases[1].specifier.as_deref(), Some("=v4.14,=v4.15"));
    assert_eq!(
        acme.releases[0].annotations["operators.operatorframework.io.bundle.channels.v1"],
        "stable"
    );
}

#[test]
fn stale_open_ended_package_is_high_risk() {
    let report = fixture_report();
    let acme = package(&report, "acme-operator");
    assert_eq!(acme.risk, RiskLevel::High);
    let months = acme.months_since_update.unwrap();
    assert!((months - 400.0 / 30.44).abs() < 1e-9);
}

#[test]
fn stale_explicit_package_is_not_at_risk() {
    let report = fixture_report();
    let beta = package(&report, "beta-operator");
    assert_eq!(beta.shape, SpecifierShape::Explicit);
    assert_eq!(beta.platform_versions.iter().cloned().collect::<Vec<_>>(), [v(4, 13)]);
    assert_eq!(beta.risk, RiskLevel::None);
}

#[test]
fn unknown_history_is_unknown_risk() {
    let report = fixture_report();
    let empty = package(&report, "empty-operator");
    assert!(empty.releases.is_empty());
    assert!(empty.latest_release.is_none());
    assert_eq!(empty.shape, SpecifierShape::None);
    assert_eq!(empty.last_update, None);
    assert_eq!(empty.months_since_update, None);
    assert_eq!(empty.risk, RiskLevel::Unknown);
    assert!(empty.fbc.is_none());
}

#[test]
fn unreadable_metadata_is_recorded_on_the_release() {
    let report = fixture_report();
    let broken = package(&report, "broken-operator");

    assert_eq!(broken.total_releases(), 1);
    let release = &broken.releases[0];
    assert!(release.error.is_some());
    assert!(release.specifier.is_none());
    assert!(release.platform_versions.is_empty());
    assert_eq!(release.shape, SpecifierShape::None);
    assert!(broken.error.is_none());
    assert_eq!(broken.risk, RiskLevel::None);
}

#[test]
fn blank_specifier_is_treated_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let package_dir = dir.path().join("blank-operator");
    std::fs::create_dir_all(package_dir.join("1.0.0/metadata")).unwrap();
    std::fs::write(
        package_dir.join("1.0.0/metadata/annotations.yaml"),
        "annotations:\n  com.redhat.openshift.versions: \"  \"\n",
    )
    .unwrap();

    let record = analyze_package(&package_dir, &Config::default(), &history(), now());
    assert_eq!(record.releases[0].specifier, None);
    assert_eq!(record.shape, SpecifierShape::None);
}

#[test]
fn custom_annotation_key_and_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let package_dir = dir.path().join("acme-operator");
    std::fs::create_dir_all(package_dir.join("1.0.0/metadata")).unwrap();
    std::fs::write(
        package_dir.join("1.0.0/metadata/annotations.yaml"),
        "annotations:\n  example.com/versions: \"v4.21\"\n",
    )
    .unwrap();

    let mut config = Config::default();
    config.catalog.annotation_key = "example.com/versions".to_string();
    config.policy.ceiling = PlatformVersion::new(4, 22);

    let record = analyze_package(&package_dir, &config, &history(), now());
    assert_eq!(
        record.platform_versions.iter().cloned().collect::<Vec<_>>(),
        [v(4, 21), v(4, 22)]
    );
    assert_eq!(record.risk, RiskLevel::High);
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[test]
fn summary_counts() {
    let report = fixture_report();
    let summary = &report.summary;

    assert_eq!(summary.analysis_timestamp, now());
    assert_eq!(summary.total_packages, 4);
    assert_eq!(summary.total_releases, 5);
    assert_eq!(summary.packages_with_releases, 3);
    assert_eq!(summary.packages_without_releases, 1);
    assert_eq!(summary.fbc_packages, 1);
    assert_eq!(summary.errors, 0);

    assert_eq!(summary.shape_count(SpecifierShape::Mixed), 1);
    assert_eq!(summary.shape_count(SpecifierShape::Explicit), 1);
    assert_eq!(summary.shape_count(SpecifierShape::None), 2);
    assert_eq!(summary.shape_count(SpecifierShape::OpenEnded), 0);

    assert_eq!(summary.risk_count(RiskLevel::High), 1);
    assert_eq!(summary.risk_count(RiskLevel::None), 2);
    assert_eq!(summary.risk_count(RiskLevel::Unknown), 1);
    assert_eq!(summary.packages_at_risk, 1);

    // v4.12..v4.20 from acme plus v4.13 from beta.
    assert_eq!(summary.all_platform_versions.len(), 9);
    assert_eq!(summary.platform_version_counts[&v(4, 13)], 2);
    assert_eq!(summary.platform_version_counts[&v(4, 12)], 1);
    assert_eq!(
        summary.fbc_platform_version_counts[&PlatformVersion::new(4, 14)],
        1
    );
}

#[test]
fn filter_limits_the_batch() {
    let filter = regex::Regex::new("beta").unwrap();
    let report = run_audit(
        Path::new(CATALOG),
        &Config::default(),
        Some(&filter),
        &history(),
        now(),
    )
    .unwrap();

    assert_eq!(report.summary.total_packages, 1);
    assert_eq!(report.packages[0].name, "beta-operator");
}

#[test]
fn empty_catalog_yields_an_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_audit(dir.path(), &Config::default(), None, &history(), now()).unwrap();
    assert_eq!(report.summary.total_packages, 0);
    assert_eq!(report.summary.total_releases, 0);
    assert!(report.summary.all_platform_versions.is_empty());
}

#[test]
fn missing_catalog_is_an_error() {
    let err = run_audit(
        Path::new("tests/fixtures/does-not-exist"),
        &Config::default(),
        None,
        &history(),
        now(),
    )
    .unwrap_err();
    assert!(matches!(err, AuditError::CatalogNotFound(_)));
}

#[test]
fn report_queries() {
    let report = fixture_report();

    let high: Vec<&str> = report
        .packages_at(RiskLevel::High)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(high, ["acme-operator"]);

    let recent: Vec<&str> = report
        .recently_updated(2)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(recent, ["broken-operator", "acme-operator"]);

    assert_eq!(report.errored().count(), 0);
}

#[test]
fn aggregate_shape_folds_release_specifiers() {
    assert_eq!(aggregate_shape([Some("=v4.8"), Some("=v4.9")]), SpecifierShape::Explicit);
    assert_eq!(aggregate_shape([Some("=v4.8"), Some("v4.9")]), SpecifierShape::Mixed);
    assert_eq!(aggregate_shape([None, Some("v4.9-v4.10")]), SpecifierShape::Ranged);
    assert_eq!(aggregate_shape([None, Some("")]), SpecifierShape::None);
}

#[test]
fn vendor_is_the_name_prefix() {
    let record = PackageRecord::new("acme-cloud-operator", "x".into());
    assert_eq!(record.vendor(), "acme");
    let record = PackageRecord::new("standalone", "x".into());
    assert_eq!(record.vendor(), "standalone");
}
