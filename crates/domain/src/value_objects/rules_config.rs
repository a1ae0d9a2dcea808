//! Engine configuration
//!
//! `RulesConfig` is deserializable so a host application can load it from
//! whatever settings store it uses. Every field has a default, so an empty
//! document yields `RulesConfig::default()`.

use serde::{Deserialize, Serialize};

/// Upper bound on player-chosen additional miracles for the first Wise slot.
pub const MAX_ADDITIONAL_MIRACLES: u8 = 2;

/// What to do when a level change would shrink a slot collection that still
/// holds assigned data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkPolicy {
    /// Truncate from the tail and log what was dropped.
    #[default]
    Truncate,
    /// Refuse the change unless the caller has confirmed the loss.
    RequireConfirmation,
}

/// Tunables for the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub shrink_policy: ShrinkPolicy,
    /// Clamped to [`MAX_ADDITIONAL_MIRACLES`] when read.
    pub max_additional_miracles: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            shrink_policy: ShrinkPolicy::default(),
            max_additional_miracles: MAX_ADDITIONAL_MIRACLES,
        }
    }
}

impl RulesConfig {
    pub fn additional_miracle_cap(&self) -> u8 {
        self.max_additional_miracles.min(MAX_ADDITIONAL_MIRACLES)
    }
}
