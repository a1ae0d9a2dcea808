//! Clever: knacks and the daily unorthodox bonus.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reconcile::ReconcileOutcome;
use super::unique::{TaggedSlot, UniqueSlots};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Knack {
    /// Once per battle, exploit an opening
    CombatExploiter,
    Deceiver,
    Explorer,
    Healer,
    Linguist,
    Lockpicker,
    Scholar,
    Tinkerer,
    Trapper,
}

impl Knack {
    pub fn all() -> &'static [Knack] {
        &[
            Knack::CombatExploiter,
            Knack::Deceiver,
            Knack::Explorer,
            Knack::Healer,
            Knack::Linguist,
            Knack::Lockpicker,
            Knack::Scholar,
            Knack::Tinkerer,
            Knack::Trapper,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Knack::CombatExploiter => "Combat Exploiter",
            Knack::Deceiver => "Deceiver",
            Knack::Explorer => "Explorer",
            Knack::Healer => "Healer",
            Knack::Linguist => "Linguist",
            Knack::Lockpicker => "Lockpicker",
            Knack::Scholar => "Scholar",
            Knack::Tinkerer => "Tinkerer",
            Knack::Trapper => "Trapper",
        }
    }

    /// Whether the knack carries a once-per-battle use.
    pub fn is_per_battle(&self) -> bool {
        matches!(self, Knack::CombatExploiter)
    }
}

impl fmt::Display for Knack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Knack {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|knack| knack.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::parse(format!("Unknown knack: {}", wanted)))
    }
}

/// One Clever slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnackSlot {
    #[serde(default)]
    knack: Option<Knack>,
    /// Only meaningful while `knack` is per-battle
    #[serde(default)]
    used_this_battle: bool,
}

impl KnackSlot {
    pub fn knack(&self) -> Option<Knack> {
        self.knack
    }

    pub fn used_this_battle(&self) -> bool {
        self.used_this_battle
    }
}

impl TaggedSlot for KnackSlot {
    type Tag = Knack;

    fn tag(&self) -> Option<Knack> {
        self.knack
    }

    fn replace_tag(&mut self, tag: Option<Knack>) {
        if self.knack != tag {
            self.used_this_battle = false;
        }
        self.knack = tag;
    }

    fn normalize(&mut self) {
        if !self.knack.is_some_and(|knack| knack.is_per_battle()) {
            self.used_this_battle = false;
        }
    }
}

/// Clever slot collection plus the character-wide unorthodox bonus flag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleverKnacks {
    #[serde(default)]
    slots: UniqueSlots<KnackSlot>,
    #[serde(default)]
    unorthodox_bonus_used_today: bool,
}

impl CleverKnacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &UniqueSlots<KnackSlot> {
        &self.slots
    }

    pub fn knack(&self, index: usize) -> Option<Knack> {
        self.slots.option(index)
    }

    /// Assign or clear a knack.
    ///
    /// Writing past the end grows the collection to fit, so a picker may
    /// offer more slots than the advancement table grants.
    pub fn set_knack(&mut self, index: usize, knack: Option<Knack>) -> Result<(), DomainError> {
        if index >= self.slots.len() {
            let Some(knack) = knack else {
                // Nothing to clear past the end.
                return Ok(());
            };
            if let Some(holder) = self.slots.slot_of(knack) {
                tracing::debug!(slot = index, holder, knack = %knack, "Rejected duplicate knack");
                return Err(DomainError::constraint(format!(
                    "{} is already assigned to slot {}",
                    knack,
                    holder + 1
                )));
            }
            self.slots.ensure_min_len(index + 1);
        }
        self.slots.set_option(index, knack)
    }

    /// Mark a per-battle knack as spent.
    pub fn use_battle_power(&mut self, index: usize) -> Result<(), DomainError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| DomainError::slot_out_of_range(index, len))?;
        if !slot.knack.is_some_and(|knack| knack.is_per_battle()) {
            return Err(DomainError::constraint(
                "Only a per-battle knack can be marked as used",
            ));
        }
        slot.used_this_battle = true;
        Ok(())
    }

    pub fn unorthodox_bonus_used_today(&self) -> bool {
        self.unorthodox_bonus_used_today
    }

    pub fn use_unorthodox_bonus(&mut self) -> Result<(), DomainError> {
        if self.unorthodox_bonus_used_today {
            return Err(DomainError::constraint(
                "The unorthodox bonus has already been used today",
            ));
        }
        self.unorthodox_bonus_used_today = true;
        Ok(())
    }

    /// Clear the daily flag and every battle flag; knacks are untouched.
    pub fn reset_daily_powers(&mut self) {
        self.unorthodox_bonus_used_today = false;
        for slot in self.slots.slots_mut() {
            slot.used_this_battle = false;
        }
    }

    pub fn reconcile(&mut self, target: usize) -> ReconcileOutcome {
        self.slots.reconcile(target)
    }

    pub fn filled_beyond(&self, target: usize) -> usize {
        self.slots.filled_beyond(target)
    }
}
