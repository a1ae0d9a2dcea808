//! Wise: miracle slots.
//!
//! Each slot lists base miracles (two, or `2 + bonus` for the first slot) and
//! the first slot may carry up to two additional miracles. Within a slot at
//! most one miracle is active. The third slot can instead hold a magic item.

use serde::{Deserialize, Serialize};

use super::reconcile::{self, ReconcileOutcome};
use crate::error::DomainError;
use crate::value_objects::{Level, MAX_ADDITIONAL_MIRACLES};

/// Base miracles per slot before the willpower bonus.
pub const BASE_MIRACLES_PER_SLOT: usize = 2;

/// The only slot that may hold a magic item.
pub const MAGIC_ITEM_SLOT: usize = 2;

/// Extra base miracles for the first slot from willpower.
pub fn willpower_bonus(willpower: i32) -> usize {
    match willpower {
        w if w >= 16 => 2,
        w if w >= 14 => 1,
        _ => 0,
    }
}

/// Base miracle count for the slot at `index`.
pub fn base_miracle_count(index: usize, willpower: i32) -> usize {
    if index == 0 {
        BASE_MIRACLES_PER_SLOT + willpower_bonus(willpower)
    } else {
        BASE_MIRACLES_PER_SLOT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Miracle {
    pub name: String,
    pub active: bool,
}

impl Miracle {
    fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }

    fn is_in_use(&self) -> bool {
        self.active || self.is_named()
    }
}

fn in_use_beyond(miracles: &[Miracle], len: usize) -> usize {
    miracles.iter().skip(len).filter(|m| m.is_in_use()).count()
}

/// Addresses one miracle within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiracleRef {
    Base(usize),
    Additional(usize),
}

/// One Wise slot.
///
/// # Invariants
///
/// - At most one miracle (base or additional) is active.
/// - `additional` is empty on every slot but the first.
/// - `is_magic_item` is only set on the third slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MiracleSlot {
    base_miracles: Vec<Miracle>,
    additional_miracles: Vec<Miracle>,
    is_magic_item: bool,
    magic_item_name: String,
}

impl MiracleSlot {
    pub fn base_miracles(&self) -> &[Miracle] {
        &self.base_miracles
    }

    pub fn additional_miracles(&self) -> &[Miracle] {
        &self.additional_miracles
    }

    pub fn is_magic_item(&self) -> bool {
        self.is_magic_item
    }

    /// The magic item's name, while the slot holds one.
    pub fn magic_item_name(&self) -> Option<&str> {
        self.is_magic_item.then_some(self.magic_item_name.as_str())
    }

    /// The active miracle, if any.
    pub fn active_miracle(&self) -> Option<MiracleRef> {
        if self.is_magic_item {
            return None;
        }
        self.base_miracles
            .iter()
            .position(|m| m.active)
            .map(MiracleRef::Base)
            .or_else(|| {
                self.additional_miracles
                    .iter()
                    .position(|m| m.active)
                    .map(MiracleRef::Additional)
            })
    }

    fn get_mut(&mut self, miracle: MiracleRef) -> Option<&mut Miracle> {
        match miracle {
            MiracleRef::Base(i) => self.base_miracles.get_mut(i),
            MiracleRef::Additional(i) => self.additional_miracles.get_mut(i),
        }
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut Miracle> {
        self.base_miracles
            .iter_mut()
            .chain(self.additional_miracles.iter_mut())
    }

    fn is_filled(&self) -> bool {
        self.is_magic_item
            || self
                .base_miracles
                .iter()
                .chain(&self.additional_miracles)
                .any(Miracle::is_named)
    }

    /// Keep the first active miracle, deactivate the rest.
    fn normalize_active(&mut self) {
        let mut seen = false;
        for miracle in self.all_mut() {
            if miracle.active {
                if seen {
                    miracle.active = false;
                }
                seen = true;
            }
        }
    }

    fn clear_miracles(&mut self) {
        for miracle in self.all_mut() {
            *miracle = Miracle::default();
        }
    }
}

/// Wise slot collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WiseMiraclesWire")]
pub struct WiseMiracles {
    slots: Vec<MiracleSlot>,
    additional_miracle_count: u8,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WiseMiraclesWire {
    slots: Vec<MiracleSlot>,
    additional_miracle_count: u8,
}

impl From<WiseMiraclesWire> for WiseMiracles {
    fn from(wire: WiseMiraclesWire) -> Self {
        let mut miracles = Self {
            slots: wire.slots,
            additional_miracle_count: wire.additional_miracle_count.min(MAX_ADDITIONAL_MIRACLES),
        };
        for (index, slot) in miracles.slots.iter_mut().enumerate() {
            if index != MAGIC_ITEM_SLOT {
                slot.is_magic_item = false;
            }
            if index != 0 {
                slot.additional_miracles.clear();
            }
            slot.normalize_active();
        }
        miracles
    }
}

impl WiseMiracles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[MiracleSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&MiracleSlot> {
        self.slots.get(index)
    }

    pub fn additional_miracle_count(&self) -> u8 {
        self.additional_miracle_count
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut MiracleSlot, DomainError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or_else(|| DomainError::slot_out_of_range(index, len))
    }

    /// Resize slots to `target` and every slot's miracle lists to what
    /// `willpower` and the additional count allow.
    ///
    /// Miracle list backing storage is sized even for a magic-item slot.
    pub fn reconcile(&mut self, target: usize, willpower: i32) -> ReconcileOutcome {
        let outcome = reconcile::reconcile(&mut self.slots, target, MiracleSlot::default);
        let additional = self.additional_miracle_count as usize;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            reconcile::reconcile(
                &mut slot.base_miracles,
                base_miracle_count(index, willpower),
                Miracle::default,
            );
            let additional_target = if index == 0 { additional } else { 0 };
            reconcile::reconcile(
                &mut slot.additional_miracles,
                additional_target,
                Miracle::default,
            );
        }
        outcome
    }

    /// Choose how many additional miracles the first slot carries.
    pub fn set_additional_miracle_count(&mut self, count: u8, cap: u8) -> Result<(), DomainError> {
        let cap = cap.min(MAX_ADDITIONAL_MIRACLES);
        if count > cap {
            return Err(DomainError::validation(format!(
                "At most {} additional miracles are allowed",
                cap
            )));
        }
        self.additional_miracle_count = count;
        if let Some(first) = self.slots.first_mut() {
            reconcile::reconcile(
                &mut first.additional_miracles,
                count as usize,
                Miracle::default,
            );
        }
        Ok(())
    }

    pub fn set_miracle_name(
        &mut self,
        index: usize,
        miracle: MiracleRef,
        name: impl Into<String>,
    ) -> Result<(), DomainError> {
        let slot = self.slot_mut(index)?;
        if slot.is_magic_item {
            return Err(DomainError::constraint("Slot holds a magic item"));
        }
        let target = slot
            .get_mut(miracle)
            .ok_or_else(|| DomainError::validation(format!("No miracle at {:?}", miracle)))?;
        target.name = name.into();
        Ok(())
    }

    /// Activate one miracle and deactivate every other miracle in the slot.
    ///
    /// A no-op on a magic-item slot.
    pub fn activate(&mut self, index: usize, miracle: MiracleRef) -> Result<(), DomainError> {
        let slot = self.slot_mut(index)?;
        if slot.is_magic_item {
            tracing::debug!(slot = index, "Ignored miracle activation on magic item slot");
            return Ok(());
        }
        if slot.get_mut(miracle).is_none() {
            return Err(DomainError::validation(format!("No miracle at {:?}", miracle)));
        }
        let base_len = slot.base_miracles.len();
        for (i, m) in slot.all_mut().enumerate() {
            let this = if i < base_len {
                MiracleRef::Base(i)
            } else {
                MiracleRef::Additional(i - base_len)
            };
            m.active = this == miracle;
        }
        Ok(())
    }

    pub fn deactivate(&mut self, index: usize, miracle: MiracleRef) -> Result<(), DomainError> {
        let slot = self.slot_mut(index)?;
        if slot.is_magic_item {
            return Ok(());
        }
        let target = slot
            .get_mut(miracle)
            .ok_or_else(|| DomainError::validation(format!("No miracle at {:?}", miracle)))?;
        target.active = false;
        Ok(())
    }

    /// Switch the third slot into or out of magic-item mode.
    ///
    /// Entering the mode clears the slot's miracles; leaving it does not bring
    /// them back.
    pub fn set_magic_item(&mut self, index: usize, enabled: bool) -> Result<(), DomainError> {
        if index != MAGIC_ITEM_SLOT {
            tracing::debug!(slot = index, "Rejected magic item on non-magic-item slot");
            return Err(DomainError::constraint(format!(
                "Only slot {} can hold a magic item",
                MAGIC_ITEM_SLOT + 1
            )));
        }
        let slot = self.slot_mut(index)?;
        if slot.is_magic_item == enabled {
            return Ok(());
        }
        slot.clear_miracles();
        slot.is_magic_item = enabled;
        if !enabled {
            slot.magic_item_name.clear();
        }
        Ok(())
    }

    pub fn set_magic_item_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let slot = self.slot_mut(MAGIC_ITEM_SLOT)?;
        if !slot.is_magic_item {
            return Err(DomainError::constraint("Slot does not hold a magic item"));
        }
        slot.magic_item_name = name.into();
        Ok(())
    }

    /// Max-HP bonus from a magic item: one per character level.
    pub fn magic_item_hp_bonus(&self, level: Level) -> u32 {
        match self.slots.get(MAGIC_ITEM_SLOT) {
            Some(slot) if slot.is_magic_item => level.get() as u32,
            _ => 0,
        }
    }

    pub fn filled_beyond(&self, target: usize) -> usize {
        reconcile::filled_beyond(&self.slots, target, MiracleSlot::is_filled)
    }

    /// Named or active miracles the first slot would lose if its lists were
    /// sized for `willpower` and `additional` extra miracles.
    pub fn miracles_beyond(&self, willpower: i32, additional: u8) -> usize {
        let Some(first) = self.slots.first() else {
            return 0;
        };
        in_use_beyond(&first.base_miracles, base_miracle_count(0, willpower))
            + in_use_beyond(&first.additional_miracles, additional as usize)
    }
}
