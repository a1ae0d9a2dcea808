//! Derived statistics: pure functions over character state.

use super::advancement::AdvancementTable;
use super::class::CharacterClass;
use crate::entities::CarriedItem;
use crate::value_objects::Level;

/// Total carried load, ignoring stashed items.
pub fn encumbrance<'a>(items: impl IntoIterator<Item = &'a CarriedItem>) -> u32 {
    items
        .into_iter()
        .fold(0u32, |total, item| total.saturating_add(item.load()))
}

/// Initiative modifier from the agility score.
pub fn initiative_bonus(agility: i32) -> i32 {
    match agility {
        a if a >= 16 => 2,
        a if a >= 13 => 1,
        _ => 0,
    }
}

/// XP needed for the next level, or `None` at the level cap.
pub fn next_level_xp(table: &AdvancementTable, class: CharacterClass, level: Level) -> Option<u32> {
    level.next().map(|next| table.xp_threshold(class, next))
}

/// Fraction of the way from this level's threshold to the next, in `[0, 1]`.
///
/// Always `1.0` at the level cap.
pub fn xp_progress(
    table: &AdvancementTable,
    class: CharacterClass,
    level: Level,
    experience: u32,
) -> f64 {
    let Some(next) = next_level_xp(table, class, level) else {
        return 1.0;
    };
    let current = table.xp_threshold(class, level);
    if next <= current {
        return 1.0;
    }
    let earned = experience.saturating_sub(current) as f64;
    (earned / (next - current) as f64).clamp(0.0, 1.0)
}

pub fn can_level_up(
    table: &AdvancementTable,
    class: CharacterClass,
    level: Level,
    experience: u32,
) -> bool {
    next_level_xp(table, class, level).is_some_and(|next| experience >= next)
}
