//! Package last-update instants.
//!
//! The risk policy needs to know when a package directory last changed.
//! [`GitHistory`] asks `git log` for the last commit touching the directory
//! and falls back to [`MtimeHistory`] outside a repository or when `git`
//! cannot be run.

use crate::config::HistorySource;
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Anything that can tell when a directory was last updated.
///
/// Implement this to feed recorded or fixed instants into an audit.
pub trait UpdateSource {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns the last-update instant, or `None` when it is unknowable.
    fn last_update(&self, dir: &Path) -> Option<DateTime<Utc>>;
}

/// Returns the source selected in the configuration.
pub fn source_for(kind: HistorySource) -> Box<dyn UpdateSource> {
    match kind {
        HistorySource::Git => Box::new(GitHistory),
        HistorySource::Mtime => Box::new(MtimeHistory),
    }
}

/// Last commit time of a directory, with an mtime fallback.
pub struct GitHistory;

impl UpdateSource for GitHistory {
    fn name(&self) -> &'static str {
        "git"
    }

    fn last_update(&self, dir: &Path) -> Option<DateTime<Utc>> {
        let Ok(abs) = std::path::absolute(dir) else {
            return MtimeHistory.last_update(dir);
        };
        let Some(root) = find_repo_root(&abs) else {
            tracing::debug!(path = %dir.display(), "not inside a git repository, using mtime");
            return MtimeHistory.last_update(dir);
        };
        let relative = abs.strip_prefix(&root).unwrap_or(Path::new("."));
        let relative = if relative.as_os_str().is_empty() {
            Path::new(".")
        } else {
            relative
        };

        let output = match Command::new("git")
            .arg("-C")
            .arg(&root)
            .args(["log", "-1", "--format=%ct", "--"])
            .arg(relative)
            .output()
        {
            Ok(o) if o.status.success() => o,
            Ok(o) => {
                tracing::warn!(
                    path = %dir.display(),
                    status = %o.status,
                    "git log failed, using mtime"
                );
                return MtimeHistory.last_update(dir);
            }
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "failed to run git, using mtime");
                return MtimeHistory.last_update(dir);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stamp = stdout.trim();
        // No commit touches the path (e.g. it is untracked).
        if stamp.is_empty() {
            return None;
        }
        match stamp.parse::<i64>() {
            Ok(secs) => Utc.timestamp_opt(secs, 0).single(),
            Err(_) => {
                tracing::warn!(path = %dir.display(), output = stamp, "unexpected git log output, using mtime");
                MtimeHistory.last_update(dir)
            }
        }
    }
}

/// Newest modification time of a directory and everything below it.
pub struct MtimeHistory;

impl UpdateSource for MtimeHistory {
    fn name(&self) -> &'static str {
        "mtime"
    }

    fn last_update(&self, dir: &Path) -> Option<DateTime<Utc>> {
        if !dir.exists() {
            return None;
        }
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.metadata().ok())
            .filter_map(|m| m.modified().ok())
            .max()
            .map(DateTime::<Utc>::from)
    }
}

/// Walks up from `start` to the first directory containing `.git`.
fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}
