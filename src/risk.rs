//! Staleness risk scoring.
//!
//! A package is at risk when it advertises open-ended platform support but
//! has not been updated for a while: its metadata keeps promising
//! compatibility with platform releases nobody has tested it against.
//!
//! [`RiskPolicy::assess`] is pure. The current instant is always passed in,
//! never read from a clock.

use crate::specifier::SpecifierShape;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Average month length used to turn an age in days into months.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Policy risk for one package, ordered by severity.
///
/// `Unknown` means the last-update instant could not be determined. It is not
/// the same as `None`, which means "no risk".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Unknown,
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Every variant, most severe first.
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::None,
        RiskLevel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// `true` for `Low`, `Medium`, and `High`.
    pub fn is_at_risk(&self) -> bool {
        matches!(self, RiskLevel::Low | RiskLevel::Medium | RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month thresholds at which open-ended packages become `Low`, `Medium`, and
/// `High` risk. A package at `High` qualifies for removal from the next
/// catalog index.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub high_after_months: f64,
    pub medium_after_months: f64,
    pub low_after_months: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        RiskPolicy {
            high_after_months: 12.0,
            medium_after_months: 9.0,
            low_after_months: 6.0,
        }
    }
}

impl RiskPolicy {
    /// `true` when the thresholds are non-negative and non-increasing from
    /// `high` down to `low`.
    pub fn is_consistent(&self) -> bool {
        self.low_after_months >= 0.0
            && self.medium_after_months >= self.low_after_months
            && self.high_after_months >= self.medium_after_months
    }

    /// Scores a package from its last update and the shapes of its releases.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use operator_audit::risk::{RiskLevel, RiskPolicy};
    /// use operator_audit::specifier::SpecifierShape;
    ///
    /// let now = Utc::now();
    /// let policy = RiskPolicy::default();
    /// let stale = Some(now - Duration::days(400));
    ///
    /// assert_eq!(policy.assess(stale, [SpecifierShape::OpenEnded], now), RiskLevel::High);
    /// assert_eq!(policy.assess(stale, [SpecifierShape::Explicit], now), RiskLevel::None);
    /// assert_eq!(policy.assess(None, [SpecifierShape::OpenEnded], now), RiskLevel::Unknown);
    /// ```
    pub fn assess<I>(&self, last_update: Option<DateTime<Utc>>, shapes: I, now: DateTime<Utc>) -> RiskLevel
    where
        I: IntoIterator<Item = SpecifierShape>,
    {
        let Some(last_update) = last_update else {
            return RiskLevel::Unknown;
        };

        let months = months_since(last_update, now);
        let has_open_ended = shapes.into_iter().any(|s| s.is_open_ended());

        if !has_open_ended {
            RiskLevel::None
        } else if months >= self.high_after_months {
            RiskLevel::High
        } else if months >= self.medium_after_months {
            RiskLevel::Medium
        } else if months >= self.low_after_months {
            RiskLevel::Low
        } else {
            RiskLevel::None
        }
    }

    /// Like [`assess`](Self::assess) but takes the last update as text.
    /// A timestamp that does not parse yields `Unknown`.
    pub fn assess_timestamp<I>(&self, last_update: Option<&str>, shapes: I, now: DateTime<Utc>) -> RiskLevel
    where
        I: IntoIterator<Item = SpecifierShape>,
    {
        self.assess(last_update.and_then(parse_timestamp), shapes, now)
    }
}

/// Scores with the default [`RiskPolicy`].
pub fn assess<I>(last_update: Option<DateTime<Utc>>, shapes: I, now: DateTime<Utc>) -> RiskLevel
where
    I: IntoIterator<Item = SpecifierShape>,
{
    RiskPolicy::default().assess(last_update, shapes, now)
}

/// Whole days elapsed between `last_update` and `now`, divided by
/// [`DAYS_PER_MONTH`]. Negative when `last_update` lies in the future.
pub fn months_since(last_update: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_update).num_days() as f64 / DAYS_PER_MONTH
}

/// Parses an RFC 3339 timestamp, or a naive ISO-8601 one taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
