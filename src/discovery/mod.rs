//! Catalog layout discovery.
//!
//! A catalog is a directory of packages; a package is a directory of
//! releases; a release is a subdirectory carrying a metadata file:
//!
//! ```text
//! operators/
//!   acme-operator/
//!     ci.yaml
//!     catalog-templates/v4.14.yaml
//!     1.0.0/metadata/annotations.yaml
//!     1.1.0/metadata/annotations.yaml
//! ```

pub mod fbc;
pub mod metadata;

use crate::config::CatalogConfig;
use crate::error::AuditError;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// A release directory that carries a metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDir {
    pub version: String,
    pub path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Returns the package directories directly under `catalog`, sorted by name.
///
/// Hidden directories are skipped. When `filter` is given, only packages
/// whose name contains a match are returned.
pub fn find_packages(catalog: &Path, filter: Option<&regex::Regex>) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(catalog)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            !name.starts_with('.') && filter.map_or(true, |re| re.is_match(&name))
        })
        .map(|e| e.path())
        .collect();

    dirs.sort();
    Ok(dirs)
}

/// Compiles a `--filter` pattern. The match is unanchored.
pub fn compile_filter(pattern: &str) -> Result<regex::Regex, AuditError> {
    regex::Regex::new(pattern).map_err(|source| AuditError::InvalidFilter {
        pattern: pattern.to_string(),
        source,
    })
}

/// Returns the release directories of a package, sorted by [`release_order`].
pub fn find_releases(package: &Path, catalog: &CatalogConfig) -> std::io::Result<Vec<ReleaseDir>> {
    let mut releases: Vec<ReleaseDir> = std::fs::read_dir(package)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let version = e.file_name().to_string_lossy().to_string();
            if catalog.skip_dirs.iter().any(|s| *s == version) {
                return None;
            }
            let path = e.path();
            let metadata_path = path.join(&catalog.metadata_file);
            metadata_path.is_file().then_some(ReleaseDir {
                version,
                path,
                metadata_path,
            })
        })
        .collect();

    releases.sort_by(|a, b| release_order(&a.version, &b.version));
    Ok(releases)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart<'a> {
    Number(u64),
    Text(&'a str),
}

/// Orders release identifiers like `1.2.10` after `1.2.9`.
///
/// A leading `v` is ignored; the rest is split on `.` and `-`; numeric parts
/// compare numerically and sort before textual ones. Identical keys fall back
/// to plain string order so the result is total.
pub fn release_order(a: &str, b: &str) -> Ordering {
    release_key(a).cmp(&release_key(b)).then_with(|| a.cmp(b))
}

fn release_key(version: &str) -> Vec<KeyPart<'_>> {
    version
        .strip_prefix('v')
        .unwrap_or(version)
        .split(['.', '-'])
        .map(|part| match part.parse::<u64>() {
            Ok(n) => KeyPart::Number(n),
            Err(_) => KeyPart::Text(part),
        })
        .collect()
}
