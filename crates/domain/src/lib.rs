//! Character progression rules for a six-class tabletop RPG.
//!
//! The engine owns the advancement table, the class slot models and the
//! character aggregate that keeps them consistent. It performs no I/O and
//! installs no tracing subscriber.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod slots;
pub mod value_objects;

pub use aggregates::{Character, ClassSlots, ShrinkReport, SlotLoss};

pub use entities::{Attitude, CarriedItem, Coins, Equipment, Retainer};

pub use error::DomainError;

pub use game_systems::{
    can_level_up, encumbrance, initiative_bonus, next_level_xp, xp_progress, AdvancementTable,
    CharacterClass, HitDice, ProgressionStats,
};

pub use ids::CharacterId;

pub use slots::{
    Attunement, AttunementKind, AttunementPosition, AttunementSlot, AttunementSlots, BraveQuirks,
    CleverKnacks, CombatOption, CombatOptionSlot, CombatOptionSlots, Knack, KnackSlot, Miracle,
    MiracleRef, MiracleSlot, Quirk, QuirkSlot, ReconcileOutcome, RetainerRoster, TaggedSlot,
    UniqueSlots, WiseMiracles,
};

pub use value_objects::{
    AttributeMode, AttributeScores, Attributes, CharacterName, CustomAttribute, Level,
    RulesConfig, ShrinkPolicy, WeightCategory, MAX_ADDITIONAL_MIRACLES, NEUTRAL_SCORE,
};
