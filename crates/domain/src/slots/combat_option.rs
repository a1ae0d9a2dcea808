//! Strong: combat options.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::unique::{TaggedSlot, UniqueSlots};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOption {
    ProtectAdjacentAlly,
    Parry,
    Shove,
    Disarm,
    Trip,
    Feint,
    Charge,
    DoubleAttack,
}

impl CombatOption {
    pub fn all() -> &'static [CombatOption] {
        &[
            CombatOption::ProtectAdjacentAlly,
            CombatOption::Parry,
            CombatOption::Shove,
            CombatOption::Disarm,
            CombatOption::Trip,
            CombatOption::Feint,
            CombatOption::Charge,
            CombatOption::DoubleAttack,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CombatOption::ProtectAdjacentAlly => "Protect Adjacent Ally",
            CombatOption::Parry => "Parry",
            CombatOption::Shove => "Shove",
            CombatOption::Disarm => "Disarm",
            CombatOption::Trip => "Trip",
            CombatOption::Feint => "Feint",
            CombatOption::Charge => "Charge",
            CombatOption::DoubleAttack => "Double Attack",
        }
    }
}

impl fmt::Display for CombatOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for CombatOption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|option| option.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::parse(format!("Unknown combat option: {}", wanted)))
    }
}

/// One Strong slot: empty or a single combat option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatOptionSlot {
    #[serde(default)]
    pub option: Option<CombatOption>,
}

impl TaggedSlot for CombatOptionSlot {
    type Tag = CombatOption;

    fn tag(&self) -> Option<CombatOption> {
        self.option
    }

    fn replace_tag(&mut self, tag: Option<CombatOption>) {
        self.option = tag;
    }
}

/// Strong slot collection.
pub type CombatOptionSlots = UniqueSlots<CombatOptionSlot>;
