//! Character level, clamped to the supported advancement range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A character level in `1..=10`.
///
/// Out-of-range input is clamped rather than rejected, so a `Level` is always
/// a valid advancement-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(10);

    /// Clamp any integer into the supported level range.
    pub fn clamped(raw: i32) -> Self {
        Self(raw.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based row in per-level tables.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// The following level, or `None` at the cap.
    pub fn next(self) -> Option<Level> {
        if self.is_max() {
            None
        } else {
            Some(Level(self.0 + 1))
        }
    }

    /// Every level from 1 through 10 in order.
    pub fn all() -> impl DoubleEndedIterator<Item = Level> {
        (Self::MIN.0..=Self::MAX.0).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<i32> for Level {
    fn from(raw: i32) -> Self {
        Self::clamped(raw)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> i32 {
        level.0 as i32
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
