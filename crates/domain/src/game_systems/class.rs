//! The six character classes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A character class. Each class owns one kind of capability slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    /// Attunements to teachers, items, vehicles, pets and places
    #[default]
    Deft,
    /// Combat options
    Strong,
    /// Miracles
    Wise,
    /// Quirks, comeback dice and the power to say no
    Brave,
    /// Knacks and the unorthodox bonus
    Clever,
    /// Retainers
    Fortunate,
}

impl CharacterClass {
    /// All classes in table order.
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Deft,
            CharacterClass::Strong,
            CharacterClass::Wise,
            CharacterClass::Brave,
            CharacterClass::Clever,
            CharacterClass::Fortunate,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CharacterClass::Deft => "Deft",
            CharacterClass::Strong => "Strong",
            CharacterClass::Wise => "Wise",
            CharacterClass::Brave => "Brave",
            CharacterClass::Clever => "Clever",
            CharacterClass::Fortunate => "Fortunate",
        }
    }

    /// Heading for this class's slot collection.
    pub fn slot_label(&self) -> &'static str {
        match self {
            CharacterClass::Deft => "Attunements",
            CharacterClass::Strong => "Combat Options",
            CharacterClass::Wise => "Miracles",
            CharacterClass::Brave => "Quirks",
            CharacterClass::Clever => "Knacks",
            CharacterClass::Fortunate => "Retainers",
        }
    }

    /// Row index into per-class tables.
    pub(crate) fn index(&self) -> usize {
        match self {
            CharacterClass::Deft => 0,
            CharacterClass::Strong => 1,
            CharacterClass::Wise => 2,
            CharacterClass::Brave => 3,
            CharacterClass::Clever => 4,
            CharacterClass::Fortunate => 5,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deft" => Ok(CharacterClass::Deft),
            "strong" => Ok(CharacterClass::Strong),
            "wise" => Ok(CharacterClass::Wise),
            "brave" => Ok(CharacterClass::Brave),
            "clever" => Ok(CharacterClass::Clever),
            "fortunate" => Ok(CharacterClass::Fortunate),
            other => Err(DomainError::parse(format!("Unknown class: {}", other))),
        }
    }
}
