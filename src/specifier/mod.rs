//! Platform-version specifiers.
//!
//! Every release in the catalog declares which platform versions it supports
//! through a small comma-separated grammar:
//!
//! | Clause | Example | Meaning |
//! |--------|---------|---------|
//! | Ranged | `v4.8-v4.12` | every version in the closed interval |
//! | Explicit | `=v4.12` | exactly that version |
//! | Open-ended | `v4.12` | that version and everything after it, up to [`POLICY_CEILING`] |
//!
//! [`parser`] expands a specifier into a [`VersionSet`]; [`shape`] classifies
//! it without expanding. Both share the clause recognizer in this module so
//! that a clause is always understood the same way by both.

pub mod parser;
pub mod shape;

pub use parser::{parse, parse_with_ceiling};
pub use shape::{classify, ClauseKind, ShapeSet, SpecifierShape};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// The platform's current release horizon.
///
/// Open-ended clauses expand up to and including this major version, and
/// within every major the minor walk stops at this minor. Raise it as new
/// platform versions ship (or override it via `[policy] ceiling` in the
/// configuration file).
pub const POLICY_CEILING: PlatformVersion = PlatformVersion::new(4, 20);

/// Highest minor a ranged clause may reach before expansion stops.
pub const RANGE_MINOR_LIMIT: u32 = 99;

static RE_RANGED: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^v([0-9]+)\.([0-9]+)-v([0-9]+)\.([0-9]+)").unwrap()
});

static RE_EXPLICIT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^=v([0-9]+)\.([0-9]+)").unwrap());

static RE_OPEN_ENDED: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^v([0-9]+)\.([0-9]+)").unwrap());

/// A concrete `(major, minor)` platform version, rendered as `v{major}.{minor}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct PlatformVersion {
    pub major: u32,
    pub minor: u32,
}

impl PlatformVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        PlatformVersion { major, minor }
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Error returned when a string is not of the form `vMAJOR.MINOR`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid platform version '{0}': expected vMAJOR.MINOR")]
pub struct InvalidVersion(pub String);

impl FromStr for PlatformVersion {
    type Err = InvalidVersion;

    /// Parses `v4.12` (the leading `v` is optional). The whole string must match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let (major, minor) = body
            .split_once('.')
            .ok_or_else(|| InvalidVersion(s.to_string()))?;
        let is_number = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !is_number(major) || !is_number(minor) {
            return Err(InvalidVersion(s.to_string()));
        }
        Ok(PlatformVersion::new(
            major.parse().map_err(|_| InvalidVersion(s.to_string()))?,
            minor.parse().map_err(|_| InvalidVersion(s.to_string()))?,
        ))
    }
}

impl From<PlatformVersion> for String {
    fn from(v: PlatformVersion) -> Self {
        v.to_string()
    }
}

impl TryFrom<String> for PlatformVersion {
    type Error = InvalidVersion;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One element of an expanded specifier.
///
/// Clauses that look like a version (they start with `v`) but do not match
/// any known pattern are kept verbatim as [`Literal`](SupportedVersion::Literal)
/// so that odd metadata still shows up in reports. Concrete versions sort
/// before literals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SupportedVersion {
    Release(PlatformVersion),
    Literal(String),
}

impl SupportedVersion {
    /// Returns the concrete version, or `None` for a literal token.
    pub fn version(&self) -> Option<PlatformVersion> {
        match self {
            SupportedVersion::Release(v) => Some(*v),
            SupportedVersion::Literal(_) => None,
        }
    }
}

impl fmt::Display for SupportedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportedVersion::Release(v) => v.fmt(f),
            SupportedVersion::Literal(s) => f.write_str(s),
        }
    }
}

impl From<PlatformVersion> for SupportedVersion {
    fn from(v: PlatformVersion) -> Self {
        SupportedVersion::Release(v)
    }
}

impl From<SupportedVersion> for String {
    fn from(v: SupportedVersion) -> Self {
        v.to_string()
    }
}

impl From<String> for SupportedVersion {
    fn from(s: String) -> Self {
        match s.parse::<PlatformVersion>() {
            Ok(v) if s.starts_with('v') => SupportedVersion::Release(v),
            _ => SupportedVersion::Literal(s),
        }
    }
}

/// Anything the parser and classifier accept as a specifier: a string slice
/// or an optional one, so `parse("")` and `parse(None)` both work.
pub trait SpecifierInput<'a> {
    fn into_specifier(self) -> Option<&'a str>;
}

impl<'a> SpecifierInput<'a> for &'a str {
    fn into_specifier(self) -> Option<&'a str> {
        Some(self)
    }
}

impl<'a> SpecifierInput<'a> for &'a String {
    fn into_specifier(self) -> Option<&'a str> {
        Some(self.as_str())
    }
}

impl<'a> SpecifierInput<'a> for Option<&'a str> {
    fn into_specifier(self) -> Option<&'a str> {
        self
    }
}

/// Ordered, deduplicated set of supported versions.
pub type VersionSet = BTreeSet<SupportedVersion>;

/// A single recognized comma-separated clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Clause<'a> {
    Ranged(PlatformVersion, PlatformVersion),
    Explicit(PlatformVersion),
    OpenEnded(PlatformVersion),
    Literal(&'a str),
}

impl<'a> Clause<'a> {
    /// Recognizes one trimmed clause. Patterns are tried in precedence order
    /// (ranged, explicit, open-ended, literal) and only anchored at the start.
    /// Once a pattern matches, the clause is of that kind.
    pub(crate) fn recognize(text: &'a str) -> Option<Clause<'a>> {
        if let Some(caps) = RE_RANGED.captures(text) {
            return Some(Clause::Ranged(pair(&caps, 1), pair(&caps, 3)));
        }
        if let Some(caps) = RE_EXPLICIT.captures(text) {
            return Some(Clause::Explicit(pair(&caps, 1)));
        }
        if let Some(caps) = RE_OPEN_ENDED.captures(text) {
            return Some(Clause::OpenEnded(pair(&caps, 1)));
        }
        if text.starts_with('v') {
            return Some(Clause::Literal(text));
        }
        None
    }
}

/// Reads capture groups `first` and `first + 1` as a version pair.
/// A number too large for `u32` saturates, so the expansion bounds still apply.
fn pair(caps: &regex::Captures<'_>, first: usize) -> PlatformVersion {
    let number = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(u32::MAX)
    };
    PlatformVersion::new(number(first), number(first + 1))
}

/// Trims surrounding whitespace and quotes, splits on commas, and yields the
/// non-empty trimmed clauses.
pub(crate) fn clauses(specifier: &str) -> impl Iterator<Item = &str> {
    specifier
        .trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
}
