//! Specifier shape classification.
//!
//! The shape only records *which kinds* of clauses a specifier uses, never
//! what they expand to. It is the input to the risk policy: an open-ended
//! clause promises support for platform versions that have not shipped yet.

use super::{clauses, Clause, SpecifierInput};
use std::fmt;

/// The kind of a single recognized clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    OpenEnded,
    Explicit,
    Ranged,
}

/// Syntactic shape of a specifier (or of a whole package).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpecifierShape {
    OpenEnded,
    Explicit,
    Ranged,
    Mixed,
    /// Empty specifier, or no recognizable clause.
    #[default]
    None,
}

impl SpecifierShape {
    /// Every variant, in reporting order.
    pub const ALL: [SpecifierShape; 5] = [
        SpecifierShape::OpenEnded,
        SpecifierShape::Explicit,
        SpecifierShape::Ranged,
        SpecifierShape::Mixed,
        SpecifierShape::None,
    ];

    /// The lower-case vocabulary string used in every output format.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecifierShape::OpenEnded => "open_ended",
            SpecifierShape::Explicit => "explicit",
            SpecifierShape::Ranged => "ranged",
            SpecifierShape::Mixed => "mixed",
            SpecifierShape::None => "none",
        }
    }

    /// `true` for shapes that can promise support beyond a fixed bound.
    pub fn is_open_ended(&self) -> bool {
        matches!(self, SpecifierShape::OpenEnded | SpecifierShape::Mixed)
    }

    /// Merges two shapes with the same collapse rule as [`ShapeSet::shape`].
    ///
    /// `None` is the identity; equal shapes stay put; anything else is `Mixed`.
    pub fn combine(self, other: SpecifierShape) -> SpecifierShape {
        match (self, other) {
            (SpecifierShape::None, s) | (s, SpecifierShape::None) => s,
            (a, b) if a == b => a,
            _ => SpecifierShape::Mixed,
        }
    }
}

impl fmt::Display for SpecifierShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromIterator<SpecifierShape> for SpecifierShape {
    /// Folds per-release shapes into one aggregate shape.
    fn from_iter<I: IntoIterator<Item = SpecifierShape>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SpecifierShape::None, SpecifierShape::combine)
    }
}

/// The distinct clause kinds touched by one or more specifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeSet {
    open_ended: bool,
    explicit: bool,
    ranged: bool,
}

impl ShapeSet {
    /// Collects the clause kinds used by a specifier. Literal and
    /// unrecognized clauses contribute nothing.
    pub fn of<'a>(specifier: impl SpecifierInput<'a>) -> ShapeSet {
        let mut set = ShapeSet::default();
        if let Some(specifier) = specifier.into_specifier() {
            for text in clauses(specifier) {
                match Clause::recognize(text) {
                    Some(Clause::Ranged(..)) => set.insert(ClauseKind::Ranged),
                    Some(Clause::Explicit(_)) => set.insert(ClauseKind::Explicit),
                    Some(Clause::OpenEnded(_)) => set.insert(ClauseKind::OpenEnded),
                    Some(Clause::Literal(_)) | None => {}
                }
            }
        }
        set
    }

    pub fn insert(&mut self, kind: ClauseKind) {
        match kind {
            ClauseKind::OpenEnded => self.open_ended = true,
            ClauseKind::Explicit => self.explicit = true,
            ClauseKind::Ranged => self.ranged = true,
        }
    }

    pub fn contains(&self, kind: ClauseKind) -> bool {
        match kind {
            ClauseKind::OpenEnded => self.open_ended,
            ClauseKind::Explicit => self.explicit,
            ClauseKind::Ranged => self.ranged,
        }
    }

    /// Union of two sets.
    pub fn union(self, other: ShapeSet) -> ShapeSet {
        ShapeSet {
            open_ended: self.open_ended || other.open_ended,
            explicit: self.explicit || other.explicit,
            ranged: self.ranged || other.ranged,
        }
    }

    pub fn len(&self) -> usize {
        [self.open_ended, self.explicit, self.ranged]
            .iter()
            .filter(|b| **b)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collapses the set: nothing is `None`, one kind is that shape, two or
    /// more kinds are `Mixed`.
    pub fn shape(&self) -> SpecifierShape {
        match self.len() {
            0 => SpecifierShape::None,
            1 if self.open_ended => SpecifierShape::OpenEnded,
            1 if self.explicit => SpecifierShape::Explicit,
            1 => SpecifierShape::Ranged,
            _ => SpecifierShape::Mixed,
        }
    }
}

impl FromIterator<ShapeSet> for ShapeSet {
    fn from_iter<I: IntoIterator<Item = ShapeSet>>(iter: I) -> Self {
        iter.into_iter().fold(ShapeSet::default(), ShapeSet::union)
    }
}

/// Classifies a specifier without expanding it.
///
/// # Examples
///
/// ```
/// use operator_audit::specifier::{classify, SpecifierShape};
///
/// assert_eq!(classify("v4.8"), SpecifierShape::OpenEnded);
/// assert_eq!(classify("=v4.8"), SpecifierShape::Explicit);
/// assert_eq!(classify("v4.8-v4.9"), SpecifierShape::Ranged);
/// assert_eq!(classify("v4.8,=v4.9"), SpecifierShape::Mixed);
/// assert_eq!(classify(""), SpecifierShape::None);
/// ```
pub fn classify<'a>(specifier: impl SpecifierInput<'a>) -> SpecifierShape {
    ShapeSet::of(specifier).shape()
}
