//! Brave: quirks, comeback dice and the daily power to say no.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reconcile::ReconcileOutcome;
use super::unique::{TaggedSlot, UniqueSlots};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quirk {
    /// Guards one named ally
    Protector,
    Daredevil,
    Faithful,
    Stubborn,
    Lucky,
    Resilient,
    Intuitive,
    Underdog,
}

impl Quirk {
    pub fn all() -> &'static [Quirk] {
        &[
            Quirk::Protector,
            Quirk::Daredevil,
            Quirk::Faithful,
            Quirk::Stubborn,
            Quirk::Lucky,
            Quirk::Resilient,
            Quirk::Intuitive,
            Quirk::Underdog,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Quirk::Protector => "Protector",
            Quirk::Daredevil => "Daredevil",
            Quirk::Faithful => "Faithful",
            Quirk::Stubborn => "Stubborn",
            Quirk::Lucky => "Lucky",
            Quirk::Resilient => "Resilient",
            Quirk::Intuitive => "Intuitive",
            Quirk::Underdog => "Underdog",
        }
    }

    /// Whether this quirk names a protected ally.
    pub fn has_protected_ally(&self) -> bool {
        matches!(self, Quirk::Protector)
    }
}

impl fmt::Display for Quirk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Quirk {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|quirk| quirk.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::parse(format!("Unknown quirk: {}", wanted)))
    }
}

/// One Brave slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuirkSlot {
    #[serde(default)]
    quirk: Option<Quirk>,
    /// Only meaningful while `quirk` is `Protector`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protected_ally: Option<String>,
}

impl QuirkSlot {
    pub fn quirk(&self) -> Option<Quirk> {
        self.quirk
    }

    pub fn protected_ally(&self) -> Option<&str> {
        self.protected_ally.as_deref()
    }
}

impl TaggedSlot for QuirkSlot {
    type Tag = Quirk;

    fn tag(&self) -> Option<Quirk> {
        self.quirk
    }

    fn replace_tag(&mut self, tag: Option<Quirk>) {
        self.quirk = tag;
        self.normalize();
    }

    fn normalize(&mut self) {
        let keeps_ally = self.quirk.is_some_and(|quirk| quirk.has_protected_ally());
        if !keeps_ally || self.protected_ally.as_deref().is_some_and(|n| n.trim().is_empty()) {
            self.protected_ally = None;
        }
    }
}

/// Brave slot collection plus the class's daily resources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BraveQuirks {
    #[serde(default)]
    slots: UniqueSlots<QuirkSlot>,
    #[serde(default)]
    say_no_used_today: bool,
    #[serde(default)]
    comeback_dice_used: u8,
}

impl BraveQuirks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &UniqueSlots<QuirkSlot> {
        &self.slots
    }

    pub fn set_quirk(&mut self, index: usize, quirk: Option<Quirk>) -> Result<(), DomainError> {
        self.slots.set_option(index, quirk)
    }

    pub fn quirk(&self, index: usize) -> Option<Quirk> {
        self.slots.option(index)
    }

    /// Name the ally guarded by a `Protector` slot. Blank names clear it.
    pub fn set_protected_ally(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), DomainError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| DomainError::slot_out_of_range(index, len))?;
        if !slot.quirk.is_some_and(|quirk| quirk.has_protected_ally()) {
            return Err(DomainError::constraint(
                "Only a Protector quirk can name a protected ally",
            ));
        }
        let name = name.into();
        let name = name.trim();
        slot.protected_ally = (!name.is_empty()).then(|| name.to_string());
        Ok(())
    }

    pub fn say_no_used_today(&self) -> bool {
        self.say_no_used_today
    }

    /// Spend the once-per-day power to say no.
    pub fn use_say_no(&mut self) -> Result<(), DomainError> {
        if self.say_no_used_today {
            return Err(DomainError::constraint("Say no has already been used today"));
        }
        self.say_no_used_today = true;
        Ok(())
    }

    pub fn comeback_dice_used(&self) -> u8 {
        self.comeback_dice_used
    }

    /// Spend one comeback die out of `available` (from the advancement table).
    pub fn spend_comeback_die(&mut self, available: u8) -> Result<(), DomainError> {
        if self.comeback_dice_used >= available {
            return Err(DomainError::container_full(
                self.comeback_dice_used as u32,
                available as u32,
            ));
        }
        self.comeback_dice_used += 1;
        Ok(())
    }

    /// Clear daily resources; quirk assignments are untouched.
    pub fn reset_daily_powers(&mut self) {
        self.say_no_used_today = false;
        self.comeback_dice_used = 0;
    }

    pub fn reconcile(&mut self, target: usize) -> ReconcileOutcome {
        self.slots.reconcile(target)
    }

    pub fn filled_beyond(&self, target: usize) -> usize {
        self.slots.filled_beyond(target)
    }
}
