//! Validation of heading hierarchies.
//!
//! A hierarchy is well formed when no heading descends more than one level
//! below the heading before it, and no heading is shallower than the first
//! heading of the sequence.

use std::fmt;

use crate::domain::{Heading, Level};

/// The first position at which a heading sequence stops being well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// Index of the offending heading.
    pub index: usize,
    /// What is wrong with it.
    pub kind: ViolationKind,
}

/// The ways a heading sequence can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The heading descends more than one level below its predecessor.
    SkippedLevel {
        /// Level of the preceding heading.
        from: Level,
        /// Level of the offending heading.
        to: Level,
    },
    /// The heading is shallower than the first heading of the sequence.
    AboveRoot {
        /// Level of the first heading.
        root: Level,
        /// Level of the offending heading.
        found: Level,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::SkippedLevel { from, to } => write!(
                f,
                "heading {} skips from {} to {}",
                self.index,
                from.tag(),
                to.tag()
            ),
            ViolationKind::AboveRoot { root, found } => write!(
                f,
                "heading {} is an {} above the first heading's {}",
                self.index,
                found.tag(),
                root.tag()
            ),
        }
    }
}

/// Returns the first violation in `headings`, or `None` if the sequence is
/// well formed.
///
/// An empty sequence and a single heading are always well formed.
#[must_use]
pub fn find_violation(headings: &[Heading]) -> Option<Violation> {
    let root = headings.first()?.level;

    headings
        .windows(2)
        .enumerate()
        .find_map(|(i, pair)| {
            let (level, next) = (pair[0].level, pair[1].level);
            let index = i + 1;
            if root > next {
                Some(Violation {
                    index,
                    kind: ViolationKind::AboveRoot { root, found: next },
                })
            } else if level.skips_to(next) {
                Some(Violation {
                    index,
                    kind: ViolationKind::SkippedLevel { from: level, to: next },
                })
            } else {
                None
            }
        })
}

/// Whether `headings` forms a well-formed hierarchy.
#[must_use]
pub fn is_valid_hierarchy(headings: &[Heading]) -> bool {
    find_violation(headings).is_none()
}
