//! Equipment - weapons, armor, gear and coin carried by a character

use serde::{Deserialize, Serialize};

use crate::value_objects::WeightCategory;

/// One line of a carried-item list.
///
/// # Simple Data Struct
///
/// Any combination of values is valid; a stashed item is simply left behind
/// and does not count toward encumbrance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarriedItem {
    pub name: String,
    #[serde(default)]
    pub category: WeightCategory,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub stashed: bool,
}

fn default_quantity() -> u32 {
    1
}

impl CarriedItem {
    pub fn new(name: impl Into<String>, category: WeightCategory) -> Self {
        Self {
            name: name.into(),
            category,
            quantity: 1,
            equipped: false,
            stashed: false,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    pub fn stashed(mut self) -> Self {
        self.stashed = true;
        self
    }

    /// Weight this line contributes to encumbrance.
    pub fn load(&self) -> u32 {
        if self.stashed {
            0
        } else {
            self.quantity.saturating_mul(self.category.weight_factor())
        }
    }
}

/// Coin purse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coins {
    pub gold: u32,
    pub silver: u32,
    pub copper: u32,
}

impl Coins {
    pub fn new(gold: u32, silver: u32, copper: u32) -> Self {
        Self {
            gold,
            silver,
            copper,
        }
    }

    /// Value in copper at 10 copper per silver, 10 silver per gold.
    pub fn total_copper(&self) -> u64 {
        self.gold as u64 * 100 + self.silver as u64 * 10 + self.copper as u64
    }
}

/// Everything a character carries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub weapons: Vec<CarriedItem>,
    pub armor: Vec<CarriedItem>,
    pub gear: Vec<CarriedItem>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every list, weapons first.
    pub fn all_items(&self) -> impl Iterator<Item = &CarriedItem> {
        self.weapons.iter().chain(&self.armor).chain(&self.gear)
    }

    pub fn equipped(&self) -> impl Iterator<Item = &CarriedItem> {
        self.all_items().filter(|item| item.equipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stashed_items_weigh_nothing() {
        let sword = CarriedItem::new("Sword", WeightCategory::Regular).with_quantity(2);
        assert_eq!(sword.load(), 20);
        assert_eq!(sword.stashed().load(), 0);
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let json = serde_json::json!({ "name": "Rope", "category": "minor" });
        let item: CarriedItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.category, WeightCategory::Minor);
    }

    #[test]
    fn coin_total() {
        assert_eq!(Coins::new(1, 2, 3).total_copper(), 123);
    }

    #[test]
    fn all_items_spans_lists() {
        let mut eq = Equipment::new();
        eq.weapons.push(CarriedItem::new("Axe", WeightCategory::Regular).equipped());
        eq.armor.push(CarriedItem::new("Mail", WeightCategory::Heavy));
        eq.gear.push(CarriedItem::new("Torch", WeightCategory::Minor));
        assert_eq!(eq.all_items().count(), 3);
        assert_eq!(eq.equipped().count(), 1);
    }
}
