//! Class capability slots.
//!
//! Every class owns one ordered slot collection whose length follows the
//! advancement table. All collections share the same resize rule
//! (`reconcile`); the option-tag classes also share `UniqueSlots`.

mod attunement;
mod combat_option;
mod knack;
mod miracle;
mod quirk;
mod reconcile;
mod retainer;
mod unique;

pub use attunement::{Attunement, AttunementKind, AttunementPosition, AttunementSlot, AttunementSlots};
pub use combat_option::{CombatOption, CombatOptionSlot, CombatOptionSlots};
pub use knack::{CleverKnacks, Knack, KnackSlot};
pub use miracle::{
    base_miracle_count, willpower_bonus, Miracle, MiracleRef, MiracleSlot, WiseMiracles,
    BASE_MIRACLES_PER_SLOT, MAGIC_ITEM_SLOT,
};
pub use quirk::{BraveQuirks, Quirk, QuirkSlot};
pub use reconcile::{ensure_min_len, filled_beyond, reconcile, ReconcileOutcome};
pub use retainer::RetainerRoster;
pub use unique::{TaggedSlot, UniqueSlots};
