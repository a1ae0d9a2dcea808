//! Attribute scores.
//!
//! A character either uses the six standard attributes or a free-form list of
//! custom attributes. The two modes are mutually exclusive; the standard scores
//! are retained while in custom mode so switching back loses nothing.

use serde::{Deserialize, Serialize};

/// Score used when an attribute has no meaningful value (no bonus, no penalty).
pub const NEUTRAL_SCORE: i32 = 10;

/// Which attribute set is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    #[default]
    Standard,
    Custom,
}

/// The six standard attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AttributeScores {
    fn default() -> Self {
        Self {
            strength: NEUTRAL_SCORE,
            dexterity: NEUTRAL_SCORE,
            constitution: NEUTRAL_SCORE,
            intelligence: NEUTRAL_SCORE,
            wisdom: NEUTRAL_SCORE,
            charisma: NEUTRAL_SCORE,
        }
    }
}

/// A user-defined attribute, used in custom mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    pub name: String,
    pub score: i32,
}

impl CustomAttribute {
    pub fn new(name: impl Into<String>, score: i32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// A character's attribute block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default)]
    mode: AttributeMode,
    #[serde(default)]
    scores: AttributeScores,
    #[serde(default)]
    custom: Vec<CustomAttribute>,
}

impl Attributes {
    pub fn standard(scores: AttributeScores) -> Self {
        Self {
            mode: AttributeMode::Standard,
            scores,
            custom: Vec::new(),
        }
    }

    pub fn mode(&self) -> AttributeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AttributeMode) {
        self.mode = mode;
    }

    pub fn scores(&self) -> &AttributeScores {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut AttributeScores {
        &mut self.scores
    }

    pub fn custom(&self) -> &[CustomAttribute] {
        &self.custom
    }

    pub fn custom_mut(&mut self) -> &mut Vec<CustomAttribute> {
        &mut self.custom
    }

    /// The score that drives miracle capacity (wisdom).
    pub fn willpower(&self) -> i32 {
        match self.mode {
            AttributeMode::Standard => self.scores.wisdom,
            AttributeMode::Custom => NEUTRAL_SCORE,
        }
    }

    /// The score that drives initiative (dexterity).
    pub fn agility(&self) -> i32 {
        match self.mode {
            AttributeMode::Standard => self.scores.dexterity,
            AttributeMode::Custom => NEUTRAL_SCORE,
        }
    }
}
