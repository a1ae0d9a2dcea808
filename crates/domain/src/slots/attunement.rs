//! Deft: attunement slots.
//!
//! Every slot carries a primary and a secondary attunement; exactly which of
//! the two is active is toggled with `switch_attunements`. The first slot may
//! additionally open a tertiary attunement and, only once that is open, a
//! quaternary one.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reconcile::{self, ReconcileOutcome};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttunementKind {
    Teacher,
    #[default]
    Item,
    Vehicle,
    Pet,
    Place,
}

impl AttunementKind {
    pub fn all() -> &'static [AttunementKind] {
        &[
            AttunementKind::Teacher,
            AttunementKind::Item,
            AttunementKind::Vehicle,
            AttunementKind::Pet,
            AttunementKind::Place,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AttunementKind::Teacher => "Teacher",
            AttunementKind::Item => "Item",
            AttunementKind::Vehicle => "Vehicle",
            AttunementKind::Pet => "Pet",
            AttunementKind::Place => "Place",
        }
    }
}

impl fmt::Display for AttunementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for AttunementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::parse(format!("Unknown attunement kind: {}", wanted)))
    }
}

/// A single attunement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attunement {
    pub name: String,
    pub kind: AttunementKind,
    pub active: bool,
    pub lost: bool,
}

impl Attunement {
    pub fn new(name: impl Into<String>, kind: AttunementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            active: false,
            lost: false,
        }
    }

    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Which attunement within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttunementPosition {
    Primary,
    Secondary,
    /// First slot only
    Tertiary,
    /// First slot only, requires tertiary
    Quaternary,
}

/// One Deft slot.
///
/// # Invariants
///
/// - `has_quaternary` implies `has_tertiary`.
/// - Both flags are false on every slot but the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttunementSlot {
    primary: Attunement,
    secondary: Attunement,
    #[serde(rename = "hasTertiaryAttunement")]
    has_tertiary: bool,
    tertiary: Attunement,
    #[serde(rename = "hasQuaternaryAttunement")]
    has_quaternary: bool,
    quaternary: Attunement,
    daily_power_used: bool,
}

impl Default for AttunementSlot {
    fn default() -> Self {
        Self {
            primary: Attunement {
                active: true,
                ..Attunement::default()
            },
            secondary: Attunement::default(),
            has_tertiary: false,
            tertiary: Attunement::default(),
            has_quaternary: false,
            quaternary: Attunement::default(),
            daily_power_used: false,
        }
    }
}

impl AttunementSlot {
    pub fn primary(&self) -> &Attunement {
        &self.primary
    }

    pub fn secondary(&self) -> &Attunement {
        &self.secondary
    }

    pub fn has_tertiary(&self) -> bool {
        self.has_tertiary
    }

    pub fn has_quaternary(&self) -> bool {
        self.has_quaternary
    }

    /// The tertiary attunement, if opened.
    pub fn tertiary(&self) -> Option<&Attunement> {
        self.has_tertiary.then_some(&self.tertiary)
    }

    /// The quaternary attunement, if opened.
    pub fn quaternary(&self) -> Option<&Attunement> {
        self.has_quaternary.then_some(&self.quaternary)
    }

    pub fn daily_power_used(&self) -> bool {
        self.daily_power_used
    }

    pub fn is_filled(&self) -> bool {
        self.primary.is_named() || self.secondary.is_named()
    }

    fn position_mut(&mut self, position: AttunementPosition) -> Option<&mut Attunement> {
        match position {
            AttunementPosition::Primary => Some(&mut self.primary),
            AttunementPosition::Secondary => Some(&mut self.secondary),
            AttunementPosition::Tertiary => self.has_tertiary.then_some(&mut self.tertiary),
            AttunementPosition::Quaternary => self.has_quaternary.then_some(&mut self.quaternary),
        }
    }

    /// Force the extra-attunement flags into a valid shape for `index`.
    fn normalize(&mut self, index: usize) {
        if index != 0 {
            self.has_tertiary = false;
        }
        if !self.has_tertiary {
            self.has_quaternary = false;
        }
    }
}

/// Deft slot collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<AttunementSlot>", into = "Vec<AttunementSlot>")]
pub struct AttunementSlots {
    slots: Vec<AttunementSlot>,
}

impl From<Vec<AttunementSlot>> for AttunementSlots {
    fn from(mut slots: Vec<AttunementSlot>) -> Self {
        for (index, slot) in slots.iter_mut().enumerate() {
            slot.normalize(index);
        }
        Self { slots }
    }
}

impl From<AttunementSlots> for Vec<AttunementSlot> {
    fn from(slots: AttunementSlots) -> Self {
        slots.slots
    }
}

impl AttunementSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[AttunementSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&AttunementSlot> {
        self.slots.get(index)
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut AttunementSlot, DomainError> {
        let len = self.slots.len();
        self.slots.get_mut(index).ok_or_else(|| {
            tracing::debug!(slot = index, len, "Rejected attunement write outside slot range");
            DomainError::slot_out_of_range(index, len)
        })
    }

    fn attunement_mut(
        &mut self,
        index: usize,
        position: AttunementPosition,
    ) -> Result<&mut Attunement, DomainError> {
        self.slot_mut(index)?
            .position_mut(position)
            .ok_or_else(|| DomainError::constraint(format!("{:?} attunement is not open", position)))
    }

    /// Replace an attunement's name and kind; flags are kept.
    pub fn set_attunement(
        &mut self,
        index: usize,
        position: AttunementPosition,
        name: impl Into<String>,
        kind: AttunementKind,
    ) -> Result<(), DomainError> {
        let attunement = self.attunement_mut(index, position)?;
        attunement.name = name.into();
        attunement.kind = kind;
        Ok(())
    }

    pub fn set_lost(
        &mut self,
        index: usize,
        position: AttunementPosition,
        lost: bool,
    ) -> Result<(), DomainError> {
        self.attunement_mut(index, position)?.lost = lost;
        Ok(())
    }

    /// Open or close the first slot's tertiary attunement.
    ///
    /// Closing it closes the quaternary attunement too.
    pub fn set_tertiary_enabled(&mut self, enabled: bool) -> Result<(), DomainError> {
        let slot = self.slot_mut(0)?;
        slot.has_tertiary = enabled;
        slot.normalize(0);
        Ok(())
    }

    /// Open or close the first slot's quaternary attunement.
    pub fn set_quaternary_enabled(&mut self, enabled: bool) -> Result<(), DomainError> {
        let slot = self.slot_mut(0)?;
        if enabled && !slot.has_tertiary {
            tracing::debug!("Rejected quaternary attunement without tertiary");
            return Err(DomainError::constraint(
                "A quaternary attunement requires a tertiary attunement",
            ));
        }
        slot.has_quaternary = enabled;
        Ok(())
    }

    /// Flip which of primary and secondary is active.
    pub fn switch_attunements(&mut self, index: usize) -> Result<(), DomainError> {
        let slot = self.slot_mut(index)?;
        slot.primary.active = !slot.primary.active;
        slot.secondary.active = !slot.secondary.active;
        Ok(())
    }

    pub fn set_daily_power_used(&mut self, index: usize, used: bool) -> Result<(), DomainError> {
        self.slot_mut(index)?.daily_power_used = used;
        Ok(())
    }

    pub fn reset_daily_powers(&mut self) {
        for slot in &mut self.slots {
            slot.daily_power_used = false;
        }
    }

    pub fn reconcile(&mut self, target: usize) -> ReconcileOutcome {
        reconcile::reconcile(&mut self.slots, target, AttunementSlot::default)
    }

    pub fn filled_beyond(&self, target: usize) -> usize {
        reconcile::filled_beyond(&self.slots, target, AttunementSlot::is_filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deft(slots: usize) -> AttunementSlots {
        let mut deft = AttunementSlots::new();
        deft.reconcile(slots);
        deft
    }

    fn assert_flags_valid(deft: &AttunementSlots) {
        for (i, slot) in deft.slots().iter().enumerate() {
            assert!(!slot.has_quaternary() || slot.has_tertiary());
            if i > 0 {
                assert!(!slot.has_tertiary());
            }
        }
    }

    mod switching {
        use super::*;

        #[test]
        fn switch_toggles_both() {
            let mut d = deft(1);
            assert!(d.get(0).unwrap().primary().active);
            assert!(!d.get(0).unwrap().secondary().active);

            d.switch_attunements(0).unwrap();
            assert!(!d.get(0).unwrap().primary().active);
            assert!(d.get(0).unwrap().secondary().active);
        }

        #[test]
        fn switch_out_of_range_fails_without_mutation() {
            let mut d = deft(1);
            let before = d.clone();
            assert_eq!(
                d.switch_attunements(1),
                Err(DomainError::slot_out_of_range(1, 1))
            );
            assert_eq!(d, before);
        }
    }

    mod extra_attunements {
        use super::*;

        #[test]
        fn quaternary_requires_tertiary() {
            let mut d = deft(2);
            assert!(d.set_quaternary_enabled(true).is_err());
            d.set_tertiary_enabled(true).unwrap();
            d.set_quaternary_enabled(true).unwrap();
            assert_flags_valid(&d);
        }

        #[test]
        fn closing_tertiary_closes_quaternary() {
            let mut d = deft(1);
            d.set_tertiary_enabled(true).unwrap();
            d.set_quaternary_enabled(true).unwrap();
            d.set_tertiary_enabled(false).unwrap();
            let slot = d.get(0).unwrap();
            assert!(!slot.has_tertiary());
            assert!(!slot.has_quaternary());
        }

        #[test]
        fn closed_positions_reject_writes() {
            let mut d = deft(1);
            assert!(d
                .set_attunement(0, AttunementPosition::Tertiary, "Old Mentor", AttunementKind::Teacher)
                .is_err());
            d.set_tertiary_enabled(true).unwrap();
            d.set_attunement(0, AttunementPosition::Tertiary, "Old Mentor", AttunementKind::Teacher)
                .unwrap();
            assert_eq!(d.get(0).unwrap().tertiary().unwrap().name, "Old Mentor");
        }

        #[test]
        fn no_slots_means_no_tertiary() {
            let mut d = deft(0);
            assert!(matches!(
                d.set_tertiary_enabled(true),
                Err(DomainError::SlotOutOfRange { .. })
            ));
        }

        #[test]
        fn deserialize_normalizes_flags() {
            let json = serde_json::json!([
                { "hasTertiaryAttunement": false, "hasQuaternaryAttunement": true },
                { "hasTertiaryAttunement": true }
            ]);
            let d: AttunementSlots = serde_json::from_value(json).unwrap();
            assert_flags_valid(&d);
            assert!(!d.get(1).unwrap().has_tertiary());
        }
    }

    #[test]
    fn edit_and_lose_attunements() {
        let mut d = deft(1);
        d.set_attunement(0, AttunementPosition::Primary, "Grey Mare", AttunementKind::Pet)
            .unwrap();
        d.set_lost(0, AttunementPosition::Primary, true).unwrap();
        let primary = d.get(0).unwrap().primary();
        assert_eq!(primary.name, "Grey Mare");
        assert_eq!(primary.kind, AttunementKind::Pet);
        assert!(primary.lost);
        assert!(primary.active);
    }

    #[test]
    fn daily_powers_reset() {
        let mut d = deft(2);
        d.set_daily_power_used(1, true).unwrap();
        assert!(d.get(1).unwrap().daily_power_used());
        d.reset_daily_powers();
        assert!(!d.get(1).unwrap().daily_power_used());
    }

    #[test]
    fn level_round_trip_keeps_first_slot() {
        let mut d = deft(1);
        d.set_attunement(0, AttunementPosition::Primary, "Silver Key", AttunementKind::Item)
            .unwrap();
        d.set_attunement(0, AttunementPosition::Secondary, "Lighthouse", AttunementKind::Place)
            .unwrap();
        let before = d.get(0).unwrap().clone();

        d.reconcile(3);
        d.set_attunement(2, AttunementPosition::Primary, "Skiff", AttunementKind::Vehicle)
            .unwrap();
        assert_eq!(d.filled_beyond(1), 1);
        d.reconcile(1);

        assert_eq!(d.len(), 1);
        assert_eq!(d.get(0).unwrap(), &before);
    }

    #[test]
    fn wire_flags_round_trip() {
        let mut d = deft(1);
        d.set_tertiary_enabled(true).unwrap();
        d.set_quaternary_enabled(true).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json[0]["hasTertiaryAttunement"], true);
        assert_eq!(json[0]["hasQuaternaryAttunement"], true);
        let back: AttunementSlots = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
