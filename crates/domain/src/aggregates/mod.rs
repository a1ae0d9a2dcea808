//! Aggregate roots - domain objects that own their related data
//!
//! The character owns its class slots, equipment and attributes outright.
//! Mutations go through its methods so that slot capacity always matches
//! the advancement table.

pub mod character;

pub use character::{Character, ClassSlots, ShrinkReport, SlotLoss};
