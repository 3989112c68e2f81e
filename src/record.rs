use crate::risk::RiskLevel;
use crate::specifier::{PlatformVersion, ShapeSet, SpecifierShape, SupportedVersion, VersionSet};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One published release of a package.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReleaseRecord {
    /// Release directory name (not guaranteed to be semver).
    pub version: String,
    pub path: PathBuf,
    /// Raw specifier as authored, if the annotation is present.
    pub specifier: Option<String>,
    pub platform_versions: VersionSet,
    pub shape: SpecifierShape,
    /// Every scalar annotation found in the metadata file.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// File-based catalog templates found in a package.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FbcCatalog {
    pub platform_versions: Vec<PlatformVersion>,
    pub catalog_files: Vec<String>,
}

/// Everything known about one package after analysis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub path: PathBuf,
    pub releases: Vec<ReleaseRecord>,
    pub latest_release: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    /// Union of every release's expansion.
    pub platform_versions: VersionSet,
    /// Union of every release's clause kinds, collapsed.
    pub shape: SpecifierShape,
    pub months_since_update: Option<f64>,
    pub risk: RiskLevel,
    pub has_ci_yaml: bool,
    pub has_makefile: bool,
    #[serde(default)]
    pub fbc: Option<FbcCatalog>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PackageRecord {
    /// A package with no releases yet; fields are filled in by the audit.
    pub fn new(name: &str, path: PathBuf) -> Self {
        PackageRecord {
            name: name.to_string(),
            path,
            releases: vec![],
            latest_release: None,
            last_update: None,
            platform_versions: VersionSet::new(),
            shape: SpecifierShape::None,
            months_since_update: None,
            risk: RiskLevel::Unknown,
            has_ci_yaml: false,
            has_makefile: false,
            fbc: None,
            error: None,
        }
    }

    pub fn total_releases(&self) -> usize {
        self.releases.len()
    }

    /// Vendor prefix: the package name up to the first `-`.
    pub fn vendor(&self) -> &str {
        self.name.split('-').next().unwrap_or(&self.name)
    }

    /// Recomputes the version union and aggregate shape from the releases.
    pub(crate) fn aggregate_releases(&mut self) {
        self.platform_versions = self
            .releases
            .iter()
            .flat_map(|r| r.platform_versions.iter().cloned())
            .collect();
        self.shape = self
            .releases
            .iter()
            .map(|r| ShapeSet::of(r.specifier.as_deref()))
            .collect::<ShapeSet>()
            .shape();
    }
}

/// Batch-level statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuditSummary {
    pub analysis_timestamp: DateTime<Utc>,
    pub total_packages: usize,
    pub total_releases: usize,
    pub packages_with_releases: usize,
    pub packages_without_releases: usize,
    pub all_platform_versions: Vec<SupportedVersion>,
    pub platform_version_counts: BTreeMap<SupportedVersion, usize>,
    pub fbc_packages: usize,
    pub fbc_platform_version_counts: BTreeMap<PlatformVersion, usize>,
    pub shape_counts: BTreeMap<SpecifierShape, usize>,
    pub risk_counts: BTreeMap<RiskLevel, usize>,
    pub packages_at_risk: usize,
    pub errors: usize,
}

impl AuditSummary {
    pub fn from_packages(packages: &[PackageRecord], now: DateTime<Utc>) -> Self {
        let mut platform_version_counts: BTreeMap<SupportedVersion, usize> = BTreeMap::new();
        let mut fbc_platform_version_counts: BTreeMap<PlatformVersion, usize> = BTreeMap::new();
        let mut shape_counts: BTreeMap<SpecifierShape, usize> = BTreeMap::new();
        let mut risk_counts: BTreeMap<RiskLevel, usize> = BTreeMap::new();

        for package in packages {
            for version in &package.platform_versions {
                *platform_version_counts.entry(version.clone()).or_default() += 1;
            }
            if let Some(fbc) = &package.fbc {
                for version in &fbc.platform_versions {
                    *fbc_platform_version_counts.entry(*version).or_default() += 1;
                }
            }
            *shape_counts.entry(package.shape).or_default() += 1;
            *risk_counts.entry(package.risk).or_default() += 1;
        }

        let packages_with_releases = packages.iter().filter(|p| !p.releases.is_empty()).count();

        AuditSummary {
            analysis_timestamp: now,
            total_packages: packages.len(),
            total_releases: packages.iter().map(PackageRecord::total_releases).sum(),
            packages_with_releases,
            packages_without_releases: packages.len() - packages_with_releases,
            all_platform_versions: platform_version_counts.keys().cloned().collect(),
            platform_version_counts,
            fbc_packages: packages.iter().filter(|p| p.fbc.is_some()).count(),
            fbc_platform_version_counts,
            shape_counts,
            risk_counts,
            packages_at_risk: packages.iter().filter(|p| p.risk.is_at_risk()).count(),
            errors: packages.iter().filter(|p| p.error.is_some()).count(),
        }
    }

    pub fn risk_count(&self, risk: RiskLevel) -> usize {
        self.risk_counts.get(&risk).copied().unwrap_or(0)
    }

    pub fn shape_count(&self, shape: SpecifierShape) -> usize {
        self.shape_counts.get(&shape).copied().unwrap_or(0)
    }
}

/// The complete result of auditing one catalog.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    pub packages: Vec<PackageRecord>,
}

impl AuditReport {
    pub fn from_packages(packages: Vec<PackageRecord>, now: DateTime<Utc>) -> Self {
        AuditReport {
            summary: AuditSummary::from_packages(&packages, now),
            packages,
        }
    }

    /// Packages at the given risk level, stalest first.
    pub fn packages_at(&self, risk: RiskLevel) -> Vec<&PackageRecord> {
        let mut found: Vec<&PackageRecord> =
            self.packages.iter().filter(|p| p.risk == risk).collect();
        found.sort_by(|a, b| a.last_update.cmp(&b.last_update).then(a.name.cmp(&b.name)));
        found
    }

    /// Packages with a known last update, most recent first.
    pub fn recently_updated(&self, limit: usize) -> Vec<&PackageRecord> {
        let mut found: Vec<&PackageRecord> = self
            .packages
            .iter()
            .filter(|p| p.last_update.is_some())
            .collect();
        found.sort_by(|a, b| b.last_update.cmp(&a.last_update).then(a.name.cmp(&b.name)));
        found.truncate(limit);
        found
    }

    /// Packages with any per-package error.
    pub fn errored(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.iter().filter(|p| p.error.is_some())
    }
}
