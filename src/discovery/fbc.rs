//! File-based catalog (FBC) templates.
//!
//! Packages that ship a `catalog-templates/` directory declare one template
//! per platform version, named after it: `v4.14.yaml`, `v4.15.yml`, ...

use crate::record::FbcCatalog;
use crate::specifier::PlatformVersion;
use std::path::Path;
use std::sync::LazyLock;

static RE_TEMPLATE_NAME: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^(v[0-9]+\.[0-9]+)\.ya?ml$").unwrap());

/// Scans the templates directory of a package.
///
/// Returns `None` when the directory does not exist. Files whose names are
/// not a platform version are ignored.
pub fn scan_catalog_templates(package: &Path, templates_dir: &str) -> Option<FbcCatalog> {
    let dir = package.join(templates_dir);
    if !dir.is_dir() {
        return None;
    }

    let mut catalog = FbcCatalog::default();
    match std::fs::read_dir(&dir) {
        Ok(entries) => {
            for entry in entries.filter_map(|e| e.ok()) {
                let name = entry.file_name().to_string_lossy().to_string();
                let Some(caps) = RE_TEMPLATE_NAME.captures(&name) else {
                    continue;
                };
                if let Ok(version) = caps[1].parse::<PlatformVersion>() {
                    catalog.platform_versions.push(version);
                    catalog.catalog_files.push(name.clone());
                }
            }
        }
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "failed to read catalog templates");
        }
    }

    catalog.platform_versions.sort();
    catalog.platform_versions.dedup();
    catalog.catalog_files.sort();
    Some(catalog)
}
