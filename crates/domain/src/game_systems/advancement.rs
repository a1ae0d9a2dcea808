//! Class advancement tables.
//!
//! For every class and level the table yields attack value, saving throw,
//! hit dice, slot count, affiliation groups and the XP needed to reach that
//! level. The table is total over `CharacterClass x Level`, so lookups have no
//! error path.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::class::CharacterClass;
use crate::value_objects::Level;

/// Hit dice at a level, e.g. `3+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDice {
    pub dice: u8,
    pub bonus: u8,
}

const fn hd(dice: u8, bonus: u8) -> HitDice {
    HitDice { dice, bonus }
}

impl fmt::Display for HitDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bonus == 0 {
            write!(f, "{}", self.dice)
        } else {
            write!(f, "{}+{}", self.dice, self.bonus)
        }
    }
}

/// One class's column set. Index is level - 1.
struct ClassTable {
    xp: [u32; 10],
    hit_dice: [HitDice; 10],
    attack: [u8; 10],
    save: [u8; 10],
    slots: [u8; 10],
    comeback_dice: Option<[u8; 10]>,
}

/// Affiliation groups are the same for every class.
const GROUPS: [u8; 10] = [2, 2, 2, 3, 3, 3, 4, 4, 4, 5];

const DEFT: ClassTable = ClassTable {
    xp: [0, 1500, 3000, 6000, 12000, 24000, 48000, 96000, 192000, 384000],
    hit_dice: [
        hd(1, 0),
        hd(2, 0),
        hd(2, 1),
        hd(3, 0),
        hd(3, 1),
        hd(4, 0),
        hd(4, 1),
        hd(5, 0),
        hd(5, 1),
        hd(6, 0),
    ],
    attack: [10, 11, 11, 12, 12, 13, 13, 14, 14, 15],
    save: [7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
    slots: [1, 1, 2, 2, 3, 3, 4, 4, 5, 5],
    comeback_dice: None,
};

const STRONG: ClassTable = ClassTable {
    xp: [0, 2000, 4000, 8000, 16000, 32000, 64000, 128000, 256000, 512000],
    hit_dice: [
        hd(1, 2),
        hd(2, 0),
        hd(3, 0),
        hd(4, 0),
        hd(5, 0),
        hd(6, 0),
        hd(7, 0),
        hd(8, 0),
        hd(9, 0),
        hd(10, 0),
    ],
    attack: [11, 12, 12, 13, 14, 14, 15, 16, 16, 17],
    save: [5, 6, 7, 8, 9, 10, 11, 12, 13, 14],
    slots: [1, 1, 2, 2, 2, 3, 3, 3, 4, 4],
    comeback_dice: None,
};

const WISE: ClassTable = ClassTable {
    xp: [0, 2500, 5000, 10000, 20000, 40000, 80000, 160000, 320000, 640000],
    hit_dice: [
        hd(1, 1),
        hd(2, 0),
        hd(2, 1),
        hd(3, 0),
        hd(3, 1),
        hd(4, 0),
        hd(4, 1),
        hd(5, 0),
        hd(5, 1),
        hd(6, 0),
    ],
    attack: [10, 11, 11, 11, 12, 12, 12, 13, 13, 13],
    save: [6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    slots: [1, 2, 2, 3, 3, 3, 4, 4, 4, 5],
    comeback_dice: None,
};

const BRAVE: ClassTable = ClassTable {
    xp: [0, 1250, 2500, 5000, 10000, 20000, 40000, 80000, 160000, 320000],
    hit_dice: [
        hd(1, 0),
        hd(2, 0),
        hd(2, 0),
        hd(3, 0),
        hd(3, 0),
        hd(4, 0),
        hd(4, 0),
        hd(5, 0),
        hd(5, 0),
        hd(6, 0),
    ],
    attack: [10, 10, 11, 11, 12, 12, 13, 13, 14, 14],
    save: [8, 9, 10, 11, 12, 13, 14, 15, 16, 17],
    slots: [1, 1, 1, 2, 2, 2, 3, 3, 3, 4],
    comeback_dice: Some([1, 1, 2, 2, 2, 3, 3, 3, 4, 4]),
};

const CLEVER: ClassTable = ClassTable {
    xp: [0, 1750, 3500, 7000, 14000, 28000, 56000, 112000, 224000, 448000],
    hit_dice: [
        hd(1, 0),
        hd(1, 1),
        hd(2, 0),
        hd(2, 1),
        hd(3, 0),
        hd(3, 1),
        hd(4, 0),
        hd(4, 1),
        hd(5, 0),
        hd(5, 1),
    ],
    attack: [10, 10, 11, 11, 11, 12, 12, 12, 13, 13],
    save: [7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
    slots: [1, 2, 2, 3, 3, 4, 4, 5, 5, 6],
    comeback_dice: None,
};

const FORTUNATE: ClassTable = ClassTable {
    xp: [0, 1500, 3000, 6000, 12000, 24000, 48000, 96000, 192000, 384000],
    hit_dice: [
        hd(1, 0),
        hd(1, 1),
        hd(2, 0),
        hd(2, 1),
        hd(3, 0),
        hd(3, 1),
        hd(4, 0),
        hd(4, 1),
        hd(5, 0),
        hd(5, 1),
    ],
    attack: [10, 10, 11, 11, 12, 12, 13, 13, 14, 14],
    save: [6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    slots: [1, 1, 2, 2, 2, 3, 3, 3, 4, 4],
    comeback_dice: None,
};

/// Rows ordered as `CharacterClass::index`.
static STANDARD_TABLES: [ClassTable; 6] = [DEFT, STRONG, WISE, BRAVE, CLEVER, FORTUNATE];

/// Progression statistics for one class at one level.
///
/// Always recomputed from the table; never the source of truth on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionStats {
    pub class: CharacterClass,
    pub level: Level,
    pub attack_value: u8,
    pub save_value: u8,
    pub hit_dice: HitDice,
    pub slot_count: usize,
    pub groups: u8,
    /// Brave only
    pub comeback_dice: Option<u8>,
    /// XP needed to reach `level`
    pub xp_threshold: u32,
    /// XP needed for the following level; `None` at level 10
    pub next_level_xp: Option<u32>,
}

/// Deterministic `(class, level) -> ProgressionStats` lookup.
#[derive(Clone, Copy)]
pub struct AdvancementTable {
    rows: &'static [ClassTable; 6],
}

impl fmt::Debug for AdvancementTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvancementTable").finish_non_exhaustive()
    }
}

impl Default for AdvancementTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl AdvancementTable {
    /// The built-in table.
    pub fn standard() -> Self {
        Self {
            rows: &STANDARD_TABLES,
        }
    }

    fn row(&self, class: CharacterClass) -> &'static ClassTable {
        &self.rows[class.index()]
    }

    pub fn stats(&self, class: CharacterClass, level: Level) -> ProgressionStats {
        let row = self.row(class);
        let i = level.index();
        ProgressionStats {
            class,
            level,
            attack_value: row.attack[i],
            save_value: row.save[i],
            hit_dice: row.hit_dice[i],
            slot_count: row.slots[i] as usize,
            groups: GROUPS[i],
            comeback_dice: row.comeback_dice.map(|dice| dice[i]),
            xp_threshold: row.xp[i],
            next_level_xp: level.next().map(|next| row.xp[next.index()]),
        }
    }

    /// Slot capacity for a class at a level.
    pub fn slot_count(&self, class: CharacterClass, level: Level) -> usize {
        self.row(class).slots[level.index()] as usize
    }

    /// XP required to reach `level`. Level 1 is always 0.
    pub fn xp_threshold(&self, class: CharacterClass, level: Level) -> u32 {
        self.row(class).xp[level.index()]
    }

    /// Highest level whose threshold `xp` meets.
    pub fn level_for_xp(&self, class: CharacterClass, xp: u32) -> Level {
        let row = self.row(class);
        Level::all()
            .rev()
            .find(|level| xp >= row.xp[level.index()])
            .unwrap_or(Level::MIN)
    }
}
