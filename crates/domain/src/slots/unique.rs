//! Slot collections whose option tags are unique across the whole collection.
//!
//! Combat options, quirks and knacks all share one rule: a tag may sit in at
//! most one slot at a time. `UniqueSlots` owns that rule; the per-class slot
//! types only describe their payload.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::reconcile::{self, ReconcileOutcome};
use crate::error::DomainError;

/// A slot holding at most one option tag.
pub trait TaggedSlot: Default {
    type Tag: Copy + Eq + fmt::Debug + fmt::Display;

    fn tag(&self) -> Option<Self::Tag>;

    /// Replace the tag. Implementations reset any per-slot state that only
    /// makes sense for the previous tag.
    fn replace_tag(&mut self, tag: Option<Self::Tag>);

    /// Drop per-slot state that does not belong to the current tag.
    fn normalize(&mut self) {}
}

/// Ordered slots with no tag assigned twice.
///
/// # Invariants
///
/// - No tag appears in two distinct slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueSlots<S> {
    slots: Vec<S>,
}

impl<S> Default for UniqueSlots<S> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<S: TaggedSlot> UniqueSlots<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing slots, rejecting duplicate tags.
    pub fn from_slots(slots: Vec<S>) -> Result<Self, DomainError> {
        for (i, slot) in slots.iter().enumerate() {
            if let Some(tag) = slot.tag() {
                if slots[..i].iter().any(|earlier| earlier.tag() == Some(tag)) {
                    return Err(DomainError::validation(format!(
                        "{} is assigned to more than one slot",
                        tag
                    )));
                }
            }
        }
        Ok(Self { slots })
    }

    /// Build from stored slots, keeping the first holder of each tag and
    /// clearing the rest.
    fn repaired(mut slots: Vec<S>) -> Self {
        for i in 0..slots.len() {
            match slots[i].tag() {
                Some(tag) if slots[..i].iter().any(|earlier| earlier.tag() == Some(tag)) => {
                    tracing::debug!(slot = i, option = %tag, "Cleared duplicate option on load");
                    slots[i].replace_tag(None);
                }
                _ => slots[i].normalize(),
            }
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[S] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.slots.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut S> {
        self.slots.get_mut(index)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut S> {
        self.slots.iter_mut()
    }

    /// The tag in `index`, if the slot exists and is filled.
    pub fn option(&self, index: usize) -> Option<S::Tag> {
        self.slots.get(index).and_then(|slot| slot.tag())
    }

    /// Assign or clear the tag in one slot.
    ///
    /// - `None` clears the slot.
    /// - A tag already held by this slot is a no-op.
    /// - A tag held by a different slot is refused.
    pub fn set_option(&mut self, index: usize, tag: Option<S::Tag>) -> Result<(), DomainError> {
        let len = self.slots.len();
        if index >= len {
            tracing::debug!(slot = index, len, "Rejected option write outside slot range");
            return Err(DomainError::slot_out_of_range(index, len));
        }

        let Some(tag) = tag else {
            self.slots[index].replace_tag(None);
            return Ok(());
        };

        match self.slot_of(tag) {
            Some(holder) if holder == index => Ok(()),
            Some(holder) => {
                tracing::debug!(
                    slot = index,
                    holder,
                    option = %tag,
                    "Rejected duplicate option assignment"
                );
                Err(DomainError::constraint(format!(
                    "{} is already assigned to slot {}",
                    tag,
                    holder + 1
                )))
            }
            None => {
                self.slots[index].replace_tag(Some(tag));
                Ok(())
            }
        }
    }

    /// Index of the slot holding `tag`.
    pub fn slot_of(&self, tag: S::Tag) -> Option<usize> {
        self.slots.iter().position(|slot| slot.tag() == Some(tag))
    }

    pub fn is_active(&self, tag: S::Tag) -> bool {
        self.slot_of(tag).is_some()
    }

    /// Assigned tags in slot order.
    pub fn active_options(&self) -> Vec<S::Tag> {
        self.slots.iter().filter_map(|slot| slot.tag()).collect()
    }

    /// Number of filled slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.tag().is_some()).count()
    }

    /// Tags a picker may offer for `index`: everything not held elsewhere.
    pub fn available_options(&self, index: usize, all: &[S::Tag]) -> Vec<S::Tag> {
        all.iter()
            .copied()
            .filter(|tag| match self.slot_of(*tag) {
                Some(holder) => holder == index,
                None => true,
            })
            .collect()
    }

    pub fn reconcile(&mut self, target: usize) -> ReconcileOutcome {
        reconcile::reconcile(&mut self.slots, target, S::default)
    }

    pub fn ensure_min_len(&mut self, min: usize) -> ReconcileOutcome {
        reconcile::ensure_min_len(&mut self.slots, min, S::default)
    }

    /// Filled slots a shrink to `target` would discard.
    pub fn filled_beyond(&self, target: usize) -> usize {
        reconcile::filled_beyond(&self.slots, target, |slot| slot.tag().is_some())
    }
}

impl<S: Serialize> Serialize for UniqueSlots<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        self.slots.serialize(serializer)
    }
}

impl<'de, S> Deserialize<'de> for UniqueSlots<S>
where
    S: TaggedSlot + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let slots = Vec::<S>::deserialize(deserializer)?;
        Ok(Self::repaired(slots))
    }
}
