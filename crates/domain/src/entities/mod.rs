//! Domain entities - plain records owned by a character

mod equipment;
mod retainer;

pub use equipment::{CarriedItem, Coins, Equipment};
pub use retainer::{Attitude, Retainer};
