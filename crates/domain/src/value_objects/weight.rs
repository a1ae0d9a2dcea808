//! Item weight categories for encumbrance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much room an item takes up when carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightCategory {
    NoSize,
    Minor,
    #[default]
    Regular,
    Heavy,
    /// Unrecognized category (for forward compatibility)
    #[serde(other)]
    Unknown,
}

impl WeightCategory {
    /// Encumbrance units per item of this category.
    ///
    /// Unknown categories weigh nothing.
    pub fn weight_factor(&self) -> u32 {
        match self {
            WeightCategory::NoSize => 1,
            WeightCategory::Minor => 2,
            WeightCategory::Regular => 10,
            WeightCategory::Heavy => 20,
            WeightCategory::Unknown => 0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WeightCategory::NoSize => "No Size",
            WeightCategory::Minor => "Minor",
            WeightCategory::Regular => "Regular",
            WeightCategory::Heavy => "Heavy",
            WeightCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for WeightCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "no_size" | "nosize" => WeightCategory::NoSize,
            "minor" => WeightCategory::Minor,
            "regular" => WeightCategory::Regular,
            "heavy" => WeightCategory::Heavy,
            _ => WeightCategory::Unknown,
        })
    }
}
