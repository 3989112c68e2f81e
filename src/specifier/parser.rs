//! Specifier expansion.
//!
//! Turns a raw specifier such as `"v4.8,v4.10-v4.12,=v4.15"` into the concrete
//! set of platform versions it claims. Malformed input never fails: empty or
//! unrecognized clauses simply contribute nothing.

use super::{
    clauses, Clause, PlatformVersion, SpecifierInput, SupportedVersion, VersionSet, POLICY_CEILING,
    RANGE_MINOR_LIMIT,
};

/// Expands a specifier using the default [`POLICY_CEILING`].
///
/// Accepts a `&str`, a `&String`, or an `Option<&str>`; an absent, empty, or
/// quote-only specifier yields the empty set.
///
/// # Examples
///
/// ```
/// use operator_audit::specifier::parse;
///
/// let versions: Vec<String> = parse("v4.11-v4.13").iter().map(|v| v.to_string()).collect();
/// assert_eq!(versions, ["v4.11", "v4.12", "v4.13"]);
/// assert!(parse(None).is_empty());
/// ```
pub fn parse<'a>(specifier: impl SpecifierInput<'a>) -> VersionSet {
    parse_with_ceiling(specifier, POLICY_CEILING)
}

/// Expands a specifier, bounding open-ended clauses by `ceiling`.
///
/// `ceiling.major` is the last major an open-ended clause reaches and
/// `ceiling.minor` is the last minor walked within every major.
pub fn parse_with_ceiling<'a>(
    specifier: impl SpecifierInput<'a>,
    ceiling: PlatformVersion,
) -> VersionSet {
    let mut versions = VersionSet::new();
    let Some(specifier) = specifier.into_specifier() else {
        return versions;
    };

    for text in clauses(specifier) {
        match Clause::recognize(text) {
            Some(Clause::Ranged(start, end)) => expand_range(start, end, &mut versions),
            Some(Clause::Explicit(v)) => {
                versions.insert(v.into());
            }
            Some(Clause::OpenEnded(start)) => expand_open_ended(start, ceiling, &mut versions),
            Some(Clause::Literal(token)) => {
                versions.insert(SupportedVersion::Literal(token.to_string()));
            }
            None => {}
        }
    }

    versions
}

/// Walks minor by one from `start` while still `<= end`.
///
/// There is no carry into the next major: once the minor would pass
/// [`RANGE_MINOR_LIMIT`] the walk stops, which caps absurd ranges such as
/// `v4.1-v9.99` at `v4.99`.
fn expand_range(start: PlatformVersion, end: PlatformVersion, out: &mut VersionSet) {
    let mut current = start;
    while current <= end {
        out.insert(current.into());
        match current.minor.checked_add(1) {
            Some(minor) if minor <= RANGE_MINOR_LIMIT => current.minor = minor,
            _ => break,
        }
    }
}

/// Walks from `start` up to the ceiling: minor up to `ceiling.minor`, then the
/// next major at minor 0, until the major passes `ceiling.major`.
///
/// A start whose major or minor already lies past the ceiling yields nothing.
fn expand_open_ended(start: PlatformVersion, ceiling: PlatformVersion, out: &mut VersionSet) {
    let mut current = start;
    while current.major <= ceiling.major && current.minor <= ceiling.minor {
        out.insert(current.into());
        match current.minor.checked_add(1) {
            Some(minor) if minor <= ceiling.minor => current.minor = minor,
            _ => match current.major.checked_add(1) {
                Some(major) if major <= ceiling.major => {
                    current = PlatformVersion::new(major, 0);
                }
                _ => break,
            },
        }
    }
}
