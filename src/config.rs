//! Configuration loading and management.
//!
//! The default configuration file is `operator-audit.toml` in the current
//! working directory. Every field has a default, so the file can be omitted
//! entirely:
//!
//! ```rust,no_run
//! use operator_audit::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert_eq!(config.catalog.annotation_key, "com.redhat.openshift.versions");
//! ```

use crate::error::AuditError;
use crate::risk::RiskPolicy;
use crate::specifier::{PlatformVersion, POLICY_CEILING};
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "operator-audit.toml";

/// Main configuration for an audit run.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Where release metadata lives inside each package directory.
    pub catalog: CatalogConfig,
    /// Open-ended horizon and risk thresholds.
    pub policy: PolicyConfig,
    /// How the last-update instant of a package is obtained.
    pub history: HistoryConfig,
}

/// Layout of the audited catalog.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Annotation holding the version specifier.
    pub annotation_key: String,
    /// Metadata file, relative to a release directory.
    pub metadata_file: String,
    /// Package subdirectories that are never releases.
    pub skip_dirs: Vec<String>,
    /// File-based catalog templates directory, relative to a package.
    pub catalog_templates_dir: String,
}

/// Platform horizon and staleness thresholds.
///
/// ```toml
/// [policy]
/// ceiling = "v4.21"
/// high_after_months = 12.0
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Last platform version open-ended clauses expand to.
    pub ceiling: PlatformVersion,
    #[serde(flatten)]
    pub risk: RiskPolicy,
}

/// Source of package last-update instants.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub source: HistorySource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    /// Last commit touching the package directory, falling back to mtime.
    #[default]
    Git,
    /// Newest modification time below the package directory.
    Mtime,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            annotation_key: "com.redhat.openshift.versions".to_string(),
            metadata_file: "metadata/annotations.yaml".to_string(),
            skip_dirs: vec!["catalog-templates".to_string(), "tests".to_string()],
            catalog_templates_dir: "catalog-templates".to_string(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            ceiling: POLICY_CEILING,
            risk: RiskPolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CONFIG_FILE`] in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`] when the explicit path does not exist, the
    /// file cannot be read or parsed, or the policy thresholds are inconsistent.
    pub fn load(path: Option<&Path>) -> Result<Config, AuditError> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(AuditError::ConfigNotFound(p.to_path_buf()));
            }
        } else {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|source| {
                    AuditError::ConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                let config: Config = toml::from_str(&content)
                    .map_err(|source| AuditError::ConfigParse { path, source })?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Checks that the risk thresholds are ordered `high >= medium >= low >= 0`.
    pub fn validate(&self) -> Result<(), AuditError> {
        let risk = &self.policy.risk;
        if !risk.is_consistent() {
            return Err(AuditError::InvalidPolicy(format!(
                "thresholds must satisfy high ({}) >= medium ({}) >= low ({}) >= 0",
                risk.high_after_months, risk.medium_after_months, risk.low_after_months
            )));
        }
        Ok(())
    }
}
