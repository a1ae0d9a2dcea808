//! Retainer - a hireling in a Fortunate character's service
//!
//! A plain data record. The roster that holds retainers owns the capacity
//! rule; the record itself only keeps its hit points in range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a retainer currently regards their employer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attitude {
    Loyal,
    #[default]
    Content,
    Wavering,
    Disloyal,
    /// Unknown attitude for forward compatibility
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loyal => write!(f, "Loyal"),
            Self::Content => write!(f, "Content"),
            Self::Wavering => write!(f, "Wavering"),
            Self::Disloyal => write!(f, "Disloyal"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A retainer record.
///
/// A blank `name` marks a vacant roster position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Retainer {
    pub name: String,
    /// Free-form role, e.g. "Torchbearer" or "Man-at-arms"
    pub retainer_type: String,
    pub hit_dice: String,
    pub defense: i32,
    pub movement: String,
    pub keywords: Vec<String>,
    pub attitude: Attitude,
    pub notes: String,
    current_hp: u32,
    max_hp: u32,
}

impl Retainer {
    pub fn new(name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            current_hp: max_hp,
            max_hp,
            ..Self::default()
        }
    }

    // =========================================================================
    // Builder-style methods
    // =========================================================================

    pub fn with_type(mut self, retainer_type: impl Into<String>) -> Self {
        self.retainer_type = retainer_type.into();
        self
    }

    pub fn with_hit_dice(mut self, hit_dice: impl Into<String>) -> Self {
        self.hit_dice = hit_dice.into();
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn with_attitude(mut self, attitude: Attitude) -> Self {
        self.attitude = attitude;
        self
    }

    // =========================================================================
    // Hit points
    // =========================================================================

    pub fn is_vacant(&self) -> bool {
        self.name.trim().is_empty()
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Change max HP, pulling current HP down if it no longer fits.
    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.current_hp = self.current_hp.min(max_hp);
    }

    pub fn damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn is_down(&self) -> bool {
        self.current_hp == 0 && !self.is_vacant()
    }

    /// Clamp current HP after deserializing foreign data.
    pub(crate) fn normalize(&mut self) {
        self.current_hp = self.current_hp.min(self.max_hp);
    }
}
