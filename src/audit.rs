//! Audit orchestration.
//!
//! [`run_audit`] walks a catalog directory, analyzes every package in turn,
//! and assembles the [`AuditReport`]. Packages are processed sequentially in
//! name order; each one is independent of the others.

use crate::config::Config;
use crate::discovery::{self, fbc, metadata};
use crate::error::AuditError;
use crate::history::UpdateSource;
use crate::record::{AuditReport, PackageRecord, ReleaseRecord};
use crate::risk;
use crate::specifier::{self, SpecifierShape};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Audits every package of a catalog.
///
/// # Pipeline
///
/// 1. Lists package directories (see [`discovery::find_packages`]).
/// 2. For each package, reads every release's metadata, expands and
///    classifies its specifier, and asks `source` for the last update.
/// 3. Scores the package with the configured [`RiskPolicy`](crate::risk::RiskPolicy)
///    against `now`.
/// 4. Builds the summary.
///
/// # Errors
///
/// Fails only when the catalog directory is missing or cannot be listed.
/// Problems inside a single package are recorded on its [`PackageRecord`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use operator_audit::{audit, config::Config, history};
///
/// let config = Config::load(None).unwrap();
/// let source = history::source_for(config.history.source);
/// let report = audit::run_audit(Path::new("operators"), &config, None, source.as_ref(), chrono::Utc::now()).unwrap();
/// println!("{} packages at risk", report.summary.packages_at_risk);
/// ```
pub fn run_audit(
    catalog: &Path,
    config: &Config,
    filter: Option<&regex::Regex>,
    source: &dyn UpdateSource,
    now: DateTime<Utc>,
) -> Result<AuditReport, AuditError> {
    if !catalog.is_dir() {
        return Err(AuditError::CatalogNotFound(catalog.to_path_buf()));
    }

    let package_dirs = discovery::find_packages(catalog, filter)?;
    tracing::info!(
        catalog = %catalog.display(),
        packages = package_dirs.len(),
        history = source.name(),
        "auditing catalog"
    );

    let packages: Vec<PackageRecord> = package_dirs
        .iter()
        .enumerate()
        .map(|(i, dir)| {
            tracing::debug!("analyzing {}/{}: {}", i + 1, package_dirs.len(), dir.display());
            analyze_package(dir, config, source, now)
        })
        .collect();

    Ok(AuditReport::from_packages(packages, now))
}

/// Analyzes one package directory.
///
/// Never fails: a package whose releases cannot be listed carries an
/// `error` and no releases.
pub fn analyze_package(
    dir: &Path,
    config: &Config,
    source: &dyn UpdateSource,
    now: DateTime<Utc>,
) -> PackageRecord {
    let name = package_name(dir);
    let mut package = PackageRecord::new(&name, dir.to_path_buf());

    package.has_ci_yaml = dir.join("ci.yaml").exists();
    package.has_makefile = dir.join("Makefile").exists();
    package.last_update = source.last_update(dir);
    package.fbc = fbc::scan_catalog_templates(dir, &config.catalog.catalog_templates_dir);

    match discovery::find_releases(dir, &config.catalog) {
        Ok(releases) => {
            package.releases = releases
                .into_iter()
                .map(|release| analyze_release(release, config))
                .collect();
        }
        Err(e) => {
            tracing::warn!(package = %name, error = %e, "failed to list releases");
            package.error = Some(e.to_string());
        }
    }

    package.latest_release = package.releases.last().map(|r| r.version.clone());
    package.aggregate_releases();
    package.months_since_update = package
        .last_update
        .map(|last| risk::months_since(last, now));
    package.risk = config.policy.risk.assess(
        package.last_update,
        package.releases.iter().map(|r| r.shape),
        now,
    );

    tracing::debug!(
        package = %name,
        releases = package.releases.len(),
        shape = %package.shape,
        risk = %package.risk,
        "package analyzed"
    );
    package
}

fn analyze_release(release: discovery::ReleaseDir, config: &Config) -> ReleaseRecord {
    let (annotations, error) = match metadata::read_annotations(&release.metadata_path) {
        Ok(a) => (a, None),
        Err(e) => {
            tracing::warn!(release = %release.path.display(), error = %e, "unreadable metadata");
            (Default::default(), Some(e))
        }
    };

    let specifier = annotations
        .get(&config.catalog.annotation_key)
        .filter(|s| !s.trim().is_empty())
        .cloned();
    let platform_versions =
        specifier::parse_with_ceiling(specifier.as_deref(), config.policy.ceiling);
    let shape = specifier::classify(specifier.as_deref());

    ReleaseRecord {
        version: release.version,
        path: release.path,
        specifier,
        platform_versions,
        shape,
        annotations,
        error,
    }
}

/// Last path component, or `"unknown"` for paths without one.
fn package_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Aggregate shape of a set of raw specifiers.
///
/// Equivalent to the shape stored on a [`PackageRecord`] whose releases carry
/// exactly these specifiers.
pub fn aggregate_shape<'a, I>(specifiers: I) -> SpecifierShape
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    specifiers
        .into_iter()
        .map(specifier::ShapeSet::of)
        .collect::<specifier::ShapeSet>()
        .shape()
}
