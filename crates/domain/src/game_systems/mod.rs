//! Rules data and calculations.
//!
//! - `class`: the six character classes
//! - `advancement`: the per-class, per-level advancement table
//! - `derived`: encumbrance, initiative and experience calculations

mod advancement;
mod class;
mod derived;

pub use advancement::{AdvancementTable, HitDice, ProgressionStats};
pub use class::CharacterClass;
pub use derived::{can_level_up, encumbrance, initiative_bonus, next_level_xp, xp_progress};
