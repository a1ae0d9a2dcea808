//! Value objects - Immutable objects defined by their attributes

mod attributes;
mod level;
mod names;
mod rules_config;
mod weight;

pub use attributes::{
    AttributeMode, AttributeScores, Attributes, CustomAttribute, NEUTRAL_SCORE,
};
pub use level::Level;
pub use names::CharacterName;
pub use rules_config::{RulesConfig, ShrinkPolicy, MAX_ADDITIONAL_MIRACLES};
pub use weight::WeightCategory;
