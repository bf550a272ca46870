use std::{fmt, num::NonZeroU8, str::FromStr};

use serde::{Deserialize, Serialize};

/// The nesting level of a heading, from 1 (most significant) to 6.
///
/// A `Level` can only be constructed from values in `1..=6`, mirroring the
/// `<h1>`..`<h6>` elements of HTML and the `#`..`######` markers of markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(NonZeroU8);

impl Level {
    /// The most significant level (`h1`).
    pub const MIN: Self = Self(NonZeroU8::MIN);

    /// The least significant level (`h6`).
    pub const MAX: Self = match NonZeroU8::new(6) {
        Some(level) => Self(level),
        None => unreachable!(),
    };

    /// Creates a new `Level`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLevel`] if `level` is outside `1..=6`.
    pub const fn new(level: u8) -> Result<Self, InvalidLevel> {
        match NonZeroU8::new(level) {
            Some(value) if level <= 6 => Ok(Self(value)),
            _ => Err(InvalidLevel::OutOfRange(level)),
        }
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Parses a level from a tag designation such as `h2` or `H2`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLevel`] if the tag is not `h1`..`h6`.
    pub fn from_tag(tag: &str) -> Result<Self, InvalidLevel> {
        let digit = tag
            .strip_prefix(['h', 'H'])
            .filter(|rest| rest.len() == 1)
            .and_then(|rest| rest.parse::<u8>().ok())
            .ok_or_else(|| InvalidLevel::Tag(tag.to_string()))?;
        Self::new(digit).map_err(|_| InvalidLevel::Tag(tag.to_string()))
    }

    /// Returns the HTML tag name for this level, e.g. `h3`.
    #[must_use]
    pub fn tag(self) -> String {
        format!("h{}", self.get())
    }

    /// Whether `next` descends more than one level below `self`.
    #[must_use]
    pub const fn skips_to(self, next: Self) -> bool {
        next.get() > self.get() + 1
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.get()
    }
}

impl FromStr for Level {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u8>() {
            Ok(level) => Self::new(level),
            Err(_) => Self::from_tag(s),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a value cannot be interpreted as a heading level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidLevel {
    /// The numeric level was outside `1..=6`.
    #[error("heading level must be between 1 and 6, got {0}")]
    OutOfRange(u8),
    /// The tag name was not one of `h1`..`h6`.
    #[error("'{0}' is not a heading tag (expected h1..h6)")]
    Tag(String),
}
