//! Character aggregate - one adventurer's sheet and the rules that keep it
//! consistent
//!
//! # Design
//!
//! - **Private fields**: every write goes through a method that keeps the
//!   slot collections sized to the advancement table.
//! - **All six collections retained**: only the one matching `class` is in
//!   play, but switching class never destroys another class's work.
//! - **Derived over stored**: attack and save values are always read from the
//!   advancement table. The stored copies exist for older records and are
//!   rewritten on every level or class change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::{Coins, Equipment};
use crate::error::DomainError;
use crate::game_systems::{self, AdvancementTable, CharacterClass, ProgressionStats};
use crate::ids::CharacterId;
use crate::slots::{
    AttunementSlots, BraveQuirks, CleverKnacks, CombatOptionSlots, ReconcileOutcome,
    RetainerRoster, WiseMiracles,
};
use crate::value_objects::{Attributes, CharacterName, Level, RulesConfig, ShrinkPolicy};

/// Filled slots a level change would discard from one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLoss {
    pub class: CharacterClass,
    pub slots: usize,
}

/// What a level, willpower or miracle-count change would do to the slot
/// collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkReport {
    pub from: Level,
    pub to: Level,
    /// Only collections that would lose something are listed.
    pub losses: Vec<SlotLoss>,
    /// Named or active miracles cut from the first Wise slot.
    pub miracles: usize,
}

impl ShrinkReport {
    pub fn is_lossless(&self) -> bool {
        self.losses.is_empty() && self.miracles == 0
    }

    pub fn total_discarded(&self) -> usize {
        self.losses.iter().map(|loss| loss.slots).sum::<usize>() + self.miracles
    }

    pub fn discarded(&self, class: CharacterClass) -> usize {
        self.losses
            .iter()
            .find(|loss| loss.class == class)
            .map_or(0, |loss| loss.slots)
    }
}

/// Borrowed view of the slot collection belonging to the current class.
#[derive(Debug, Clone, Copy)]
pub enum ClassSlots<'a> {
    Deft(&'a AttunementSlots),
    Strong(&'a CombatOptionSlots),
    Wise(&'a WiseMiracles),
    Brave(&'a BraveQuirks),
    Clever(&'a CleverKnacks),
    Fortunate(&'a RetainerRoster),
}

impl ClassSlots<'_> {
    pub fn class(&self) -> CharacterClass {
        match self {
            ClassSlots::Deft(_) => CharacterClass::Deft,
            ClassSlots::Strong(_) => CharacterClass::Strong,
            ClassSlots::Wise(_) => CharacterClass::Wise,
            ClassSlots::Brave(_) => CharacterClass::Brave,
            ClassSlots::Clever(_) => CharacterClass::Clever,
            ClassSlots::Fortunate(_) => CharacterClass::Fortunate,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ClassSlots::Deft(slots) => slots.len(),
            ClassSlots::Strong(slots) => slots.len(),
            ClassSlots::Wise(slots) => slots.len(),
            ClassSlots::Brave(slots) => slots.slots().len(),
            ClassSlots::Clever(slots) => slots.slots().len(),
            ClassSlots::Fortunate(slots) => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A player character.
///
/// # Invariants
///
/// - `1 <= level <= 10`; out-of-range input is clamped, never rejected
/// - after every level, class or willpower write, each slot collection has
///   exactly the table's slot count for its own class at the current level
/// - current HP never reads above the effective maximum
#[derive(Debug, Clone)]
pub struct Character {
    // Identity
    id: CharacterId,
    name: CharacterName,
    player_name: Option<String>,

    // Progression
    class: CharacterClass,
    level: Level,
    experience: u32,

    attributes: Attributes,

    // Hit points
    base_max_hp: u32,
    current_hp: u32,

    equipment: Equipment,
    coins: Coins,

    // Class slots
    attunements: AttunementSlots,
    combat_options: CombatOptionSlots,
    miracles: WiseMiracles,
    quirks: BraveQuirks,
    knacks: CleverKnacks,
    retainers: RetainerRoster,

    // Stored copies of table values, kept for older records
    legacy_attack_value: u8,
    legacy_save_value: u8,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a level 1 character with every slot collection sized.
    pub fn new(name: CharacterName, class: CharacterClass) -> Self {
        let mut character = Self {
            id: CharacterId::new(),
            name,
            player_name: None,
            class,
            level: Level::MIN,
            experience: 0,
            attributes: Attributes::default(),
            base_max_hp: 0,
            current_hp: 0,
            equipment: Equipment::default(),
            coins: Coins::default(),
            attunements: AttunementSlots::default(),
            combat_options: CombatOptionSlots::default(),
            miracles: WiseMiracles::default(),
            quirks: BraveQuirks::default(),
            knacks: CleverKnacks::default(),
            retainers: RetainerRoster::default(),
            legacy_attack_value: 0,
            legacy_save_value: 0,
        };
        character.reconcile_slots();
        character
    }

    // =========================================================================
    // Builder-style methods
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_player_name(mut self, player_name: impl Into<String>) -> Self {
        self.player_name = Some(player_name.into());
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.set_level(level);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.set_attributes(attributes);
        self
    }

    /// Set max HP and heal to full.
    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.base_max_hp = max_hp;
        self.current_hp = max_hp;
        self
    }

    // =========================================================================
    // Identity Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn rename(&mut self, name: CharacterName) {
        self.name = name;
    }

    // =========================================================================
    // Class and Level
    // =========================================================================

    #[inline]
    pub fn class(&self) -> CharacterClass {
        self.class
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Current progression statistics, straight from the table.
    pub fn stats(&self) -> ProgressionStats {
        table().stats(self.class, self.level)
    }

    pub fn attack_value(&self) -> u8 {
        self.stats().attack_value
    }

    pub fn save_value(&self) -> u8 {
        self.stats().save_value
    }

    /// What moving to `level` would discard, without changing anything.
    pub fn preview_level_change(&self, level: Level) -> ShrinkReport {
        let t = table();
        let losses = CharacterClass::all()
            .iter()
            .map(|&class| SlotLoss {
                class,
                slots: self.filled_beyond(class, t.slot_count(class, level)),
            })
            .filter(|loss| loss.slots > 0)
            .collect();
        ShrinkReport {
            from: self.level,
            to: level,
            losses,
            miracles: self.miracle_loss(
                self.attributes.willpower(),
                self.miracles.additional_miracle_count(),
            ),
        }
    }

    /// Move to `level` and resize every slot collection, truncating if needed.
    ///
    /// Returns what was discarded.
    pub fn set_level(&mut self, level: Level) -> ShrinkReport {
        let report = self.preview_level_change(level);
        if !report.is_lossless() {
            tracing::warn!(
                character = %self.id,
                from = %report.from,
                to = %report.to,
                discarded = report.total_discarded(),
                "Level change discarded filled slots"
            );
        }
        self.level = level;
        self.reconcile_slots();
        report
    }

    /// Apply a raw level under the configured shrink policy.
    ///
    /// Out-of-range input is clamped. With
    /// [`ShrinkPolicy::RequireConfirmation`], a change that would discard
    /// filled slots is rejected unless `confirmed` is set.
    pub fn try_set_level(
        &mut self,
        raw: i32,
        config: &RulesConfig,
        confirmed: bool,
    ) -> Result<ShrinkReport, DomainError> {
        let level = Level::clamped(raw);
        let report = self.preview_level_change(level);
        self.check_shrink(&report, config, confirmed, || {
            format!("Changing to level {}", level)
        })?;
        Ok(self.set_level(level))
    }

    /// Refuse a lossy change under [`ShrinkPolicy::RequireConfirmation`]
    /// unless `confirmed` is set.
    fn check_shrink(
        &self,
        report: &ShrinkReport,
        config: &RulesConfig,
        confirmed: bool,
        change: impl FnOnce() -> String,
    ) -> Result<(), DomainError> {
        if config.shrink_policy != ShrinkPolicy::RequireConfirmation
            || confirmed
            || report.is_lossless()
        {
            return Ok(());
        }
        let change = change();
        tracing::debug!(
            character = %self.id,
            change = %change,
            discarded = report.total_discarded(),
            "Rejected unconfirmed lossy change"
        );
        Err(DomainError::constraint(format!(
            "{} would discard {} filled entries",
            change,
            report.total_discarded()
        )))
    }

    fn miracle_loss(&self, willpower: i32, additional: u8) -> usize {
        self.miracles.miracles_beyond(willpower, additional)
    }

    fn same_level_report(&self, miracles: usize) -> ShrinkReport {
        ShrinkReport {
            from: self.level,
            to: self.level,
            losses: Vec::new(),
            miracles,
        }
    }

    /// Change class. Every collection is kept; only the legacy values move.
    pub fn set_class(&mut self, class: CharacterClass) {
        self.class = class;
        self.reconcile_slots();
    }

    /// Bring every collection back to the table size for the current level.
    ///
    /// Needed after loading a record written by another tool.
    pub fn reconcile_slots(&mut self) {
        let t = table();
        let level = self.level;
        let outcomes = [
            (
                CharacterClass::Deft,
                self.attunements
                    .reconcile(t.slot_count(CharacterClass::Deft, level)),
            ),
            (
                CharacterClass::Strong,
                self.combat_options
                    .reconcile(t.slot_count(CharacterClass::Strong, level)),
            ),
            (
                CharacterClass::Wise,
                self.miracles.reconcile(
                    t.slot_count(CharacterClass::Wise, level),
                    self.attributes.willpower(),
                ),
            ),
            (
                CharacterClass::Brave,
                self.quirks
                    .reconcile(t.slot_count(CharacterClass::Brave, level)),
            ),
            (
                CharacterClass::Clever,
                self.knacks
                    .reconcile(t.slot_count(CharacterClass::Clever, level)),
            ),
            (
                CharacterClass::Fortunate,
                self.retainers
                    .reconcile(t.slot_count(CharacterClass::Fortunate, level)),
            ),
        ];
        for (class, outcome) in outcomes {
            log_outcome(class, outcome);
        }
        self.sync_legacy_values();
    }

    fn filled_beyond(&self, class: CharacterClass, target: usize) -> usize {
        match class {
            CharacterClass::Deft => self.attunements.filled_beyond(target),
            CharacterClass::Strong => self.combat_options.filled_beyond(target),
            CharacterClass::Wise => self.miracles.filled_beyond(target),
            CharacterClass::Brave => self.quirks.filled_beyond(target),
            CharacterClass::Clever => self.knacks.filled_beyond(target),
            CharacterClass::Fortunate => self.retainers.filled_beyond(target),
        }
    }

    fn sync_legacy_values(&mut self) {
        let stats = self.stats();
        self.legacy_attack_value = stats.attack_value;
        self.legacy_save_value = stats.save_value;
    }

    // =========================================================================
    // Experience
    // =========================================================================

    #[inline]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn set_experience(&mut self, experience: u32) {
        self.experience = experience;
    }

    pub fn add_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    pub fn next_level_xp(&self) -> Option<u32> {
        game_systems::next_level_xp(&table(), self.class, self.level)
    }

    pub fn xp_progress(&self) -> f64 {
        game_systems::xp_progress(&table(), self.class, self.level, self.experience)
    }

    pub fn can_level_up(&self) -> bool {
        game_systems::can_level_up(&table(), self.class, self.level, self.experience)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Miracles a switch to `attributes` would cut from the first Wise slot.
    pub fn preview_attribute_change(&self, attributes: &Attributes) -> ShrinkReport {
        self.same_level_report(self.miracle_loss(
            attributes.willpower(),
            self.miracles.additional_miracle_count(),
        ))
    }

    /// Replace the attribute block. Miracle capacity follows willpower, so a
    /// lower willpower truncates the first Wise slot.
    ///
    /// Returns what was discarded.
    pub fn set_attributes(&mut self, attributes: Attributes) -> ShrinkReport {
        let report = self.preview_attribute_change(&attributes);
        if !report.is_lossless() {
            tracing::warn!(
                character = %self.id,
                willpower = attributes.willpower(),
                discarded = report.miracles,
                "Willpower change discarded miracles"
            );
        }
        self.attributes = attributes;
        let slots = table().slot_count(CharacterClass::Wise, self.level);
        let outcome = self.miracles.reconcile(slots, self.attributes.willpower());
        log_outcome(CharacterClass::Wise, outcome);
        report
    }

    /// Replace the attribute block under the configured shrink policy.
    pub fn try_set_attributes(
        &mut self,
        attributes: Attributes,
        config: &RulesConfig,
        confirmed: bool,
    ) -> Result<ShrinkReport, DomainError> {
        let report = self.preview_attribute_change(&attributes);
        self.check_shrink(&report, config, confirmed, || {
            format!("Lowering willpower to {}", attributes.willpower())
        })?;
        Ok(self.set_attributes(attributes))
    }

    pub fn initiative_bonus(&self) -> i32 {
        game_systems::initiative_bonus(self.attributes.agility())
    }

    // =========================================================================
    // Hit Points
    // =========================================================================

    pub fn base_max_hp(&self) -> u32 {
        self.base_max_hp
    }

    pub fn set_base_max_hp(&mut self, max_hp: u32) {
        self.base_max_hp = max_hp;
    }

    /// Base max HP plus a Wise magic item's bonus.
    pub fn effective_max_hp(&self) -> u32 {
        let bonus = match self.class {
            CharacterClass::Wise => self.miracles.magic_item_hp_bonus(self.level),
            _ => 0,
        };
        self.base_max_hp.saturating_add(bonus)
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp.min(self.effective_max_hp())
    }

    pub fn damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp().saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current_hp = self
            .current_hp()
            .saturating_add(amount)
            .min(self.effective_max_hp());
    }

    // =========================================================================
    // Equipment
    // =========================================================================

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn equipment_mut(&mut self) -> &mut Equipment {
        &mut self.equipment
    }

    pub fn coins(&self) -> &Coins {
        &self.coins
    }

    pub fn coins_mut(&mut self) -> &mut Coins {
        &mut self.coins
    }

    pub fn encumbrance(&self) -> u32 {
        game_systems::encumbrance(self.equipment.all_items())
    }

    // =========================================================================
    // Class Slots
    // =========================================================================

    /// The collection in play for the current class.
    pub fn active_slots(&self) -> ClassSlots<'_> {
        match self.class {
            CharacterClass::Deft => ClassSlots::Deft(&self.attunements),
            CharacterClass::Strong => ClassSlots::Strong(&self.combat_options),
            CharacterClass::Wise => ClassSlots::Wise(&self.miracles),
            CharacterClass::Brave => ClassSlots::Brave(&self.quirks),
            CharacterClass::Clever => ClassSlots::Clever(&self.knacks),
            CharacterClass::Fortunate => ClassSlots::Fortunate(&self.retainers),
        }
    }

    pub fn attunements(&self) -> &AttunementSlots {
        &self.attunements
    }

    pub fn attunements_mut(&mut self) -> &mut AttunementSlots {
        &mut self.attunements
    }

    pub fn combat_options(&self) -> &CombatOptionSlots {
        &self.combat_options
    }

    pub fn combat_options_mut(&mut self) -> &mut CombatOptionSlots {
        &mut self.combat_options
    }

    pub fn miracles(&self) -> &WiseMiracles {
        &self.miracles
    }

    pub fn miracles_mut(&mut self) -> &mut WiseMiracles {
        &mut self.miracles
    }

    /// Choose the first Wise slot's additional miracle count, capped by
    /// `config` and subject to its shrink policy.
    pub fn set_additional_miracle_count(
        &mut self,
        count: u8,
        config: &RulesConfig,
        confirmed: bool,
    ) -> Result<ShrinkReport, DomainError> {
        let report =
            self.same_level_report(self.miracle_loss(self.attributes.willpower(), count));
        self.check_shrink(&report, config, confirmed, || {
            format!("Setting {} additional miracles", count)
        })?;
        self.miracles
            .set_additional_miracle_count(count, config.additional_miracle_cap())?;
        if !report.is_lossless() {
            tracing::warn!(
                character = %self.id,
                count,
                discarded = report.miracles,
                "Additional miracle change discarded miracles"
            );
        }
        Ok(report)
    }

    pub fn quirks(&self) -> &BraveQuirks {
        &self.quirks
    }

    pub fn quirks_mut(&mut self) -> &mut BraveQuirks {
        &mut self.quirks
    }

    pub fn knacks(&self) -> &CleverKnacks {
        &self.knacks
    }

    pub fn knacks_mut(&mut self) -> &mut CleverKnacks {
        &mut self.knacks
    }

    pub fn retainers(&self) -> &RetainerRoster {
        &self.retainers
    }

    pub fn retainers_mut(&mut self) -> &mut RetainerRoster {
        &mut self.retainers
    }

    /// Comeback dice still unspent today.
    pub fn comeback_dice_remaining(&self) -> u8 {
        let available = self.stats().comeback_dice.unwrap_or(0);
        available.saturating_sub(self.quirks.comeback_dice_used())
    }

    /// Spend a comeback die against today's allowance from the table.
    pub fn spend_comeback_die(&mut self) -> Result<(), DomainError> {
        let available = self.stats().comeback_dice.unwrap_or(0);
        self.quirks.spend_comeback_die(available)
    }

    /// Clear every daily and per-battle flag. Assignments are kept.
    pub fn reset_daily_powers(&mut self) {
        self.attunements.reset_daily_powers();
        self.quirks.reset_daily_powers();
        self.knacks.reset_daily_powers();
        tracing::debug!(character = %self.id, "Reset daily powers");
    }
}

fn table() -> AdvancementTable {
    AdvancementTable::standard()
}

fn log_outcome(class: CharacterClass, outcome: ReconcileOutcome) {
    if outcome.is_noop() {
        tracing::trace!(class = %class, "Slots already reconciled");
    } else {
        tracing::debug!(
            class = %class,
            added = outcome.added,
            removed = outcome.removed,
            "Reconciled slots"
        );
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the wire format
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    name: CharacterName,
    #[serde(default)]
    player_name: Option<String>,
    class: CharacterClass,
    level: Level,
    #[serde(default)]
    experience: u32,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    max_hp: u32,
    #[serde(default)]
    current_hp: u32,
    #[serde(default)]
    equipment: Equipment,
    #[serde(default)]
    coins: Coins,
    #[serde(default)]
    attunements: AttunementSlots,
    #[serde(default)]
    combat_options: CombatOptionSlots,
    #[serde(default)]
    miracles: WiseMiracles,
    #[serde(default)]
    quirks: BraveQuirks,
    #[serde(default)]
    knacks: CleverKnacks,
    #[serde(default)]
    retainers: RetainerRoster,
    #[serde(default)]
    attack_value: u8,
    #[serde(default)]
    save_value: u8,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            player_name: self.player_name.clone(),
            class: self.class,
            level: self.level,
            experience: self.experience,
            attributes: self.attributes.clone(),
            max_hp: self.base_max_hp,
            current_hp: self.current_hp,
            equipment: self.equipment.clone(),
            coins: self.coins,
            attunements: self.attunements.clone(),
            combat_options: self.combat_options.clone(),
            miracles: self.miracles.clone(),
            quirks: self.quirks.clone(),
            knacks: self.knacks.clone(),
            retainers: self.retainers.clone(),
            attack_value: self.legacy_attack_value,
            save_value: self.legacy_save_value,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    /// Slot collections are taken as stored so structural flags survive
    /// exactly; call [`Character::reconcile_slots`] to resize foreign records.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;

        let mut character = Character {
            id: wire.id,
            name: wire.name,
            player_name: wire.player_name,
            class: wire.class,
            level: wire.level,
            experience: wire.experience,
            attributes: wire.attributes,
            base_max_hp: wire.max_hp,
            current_hp: wire.current_hp,
            equipment: wire.equipment,
            coins: wire.coins,
            attunements: wire.attunements,
            combat_options: wire.combat_options,
            miracles: wire.miracles,
            quirks: wire.quirks,
            knacks: wire.knacks,
            retainers: wire.retainers,
            legacy_attack_value: wire.attack_value,
            legacy_save_value: wire.save_value,
        };
        character.sync_legacy_values();
        Ok(character)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CarriedItem, Retainer};
    use crate::slots::{AttunementKind, AttunementPosition, CombatOption, Knack, MiracleRef, Quirk};
    use crate::value_objects::{AttributeMode, AttributeScores, WeightCategory};

    fn create_test_character(class: CharacterClass) -> Character {
        let name = CharacterName::new("Test Hero").unwrap();
        Character::new(name, class)
    }

    fn wisdom(score: i32) -> Attributes {
        Attributes::standard(AttributeScores {
            wisdom: score,
            ..AttributeScores::default()
        })
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_character_starts_at_level_one_with_sized_slots() {
            let c = create_test_character(CharacterClass::Deft);

            assert_eq!(c.level(), Level::MIN);
            assert_eq!(c.experience(), 0);
            assert_eq!(c.attunements().len(), 1);
            assert_eq!(c.combat_options().len(), 1);
            assert_eq!(c.miracles().len(), 1);
            assert_eq!(c.quirks().slots().len(), 1);
            assert_eq!(c.knacks().slots().len(), 1);
            assert_eq!(c.retainers().len(), 1);
        }

        #[test]
        fn builder_methods_work() {
            let c = create_test_character(CharacterClass::Strong)
                .with_player_name("Sam")
                .with_level(Level::clamped(4))
                .with_max_hp(12);

            assert_eq!(c.player_name(), Some("Sam"));
            assert_eq!(c.level().get(), 4);
            assert_eq!(c.current_hp(), 12);
            assert_eq!(c.attack_value(), c.stats().attack_value);
        }

        #[test]
        fn active_slots_follow_class() {
            let mut c = create_test_character(CharacterClass::Wise);
            assert_eq!(c.active_slots().class(), CharacterClass::Wise);

            c.set_class(CharacterClass::Fortunate);
            let view = c.active_slots();
            assert!(matches!(view, ClassSlots::Fortunate(_)));
            assert_eq!(view.len(), 1);
        }
    }

    mod level {
        use super::*;

        #[test]
        fn raw_levels_are_clamped() {
            let mut c = create_test_character(CharacterClass::Deft);
            let config = RulesConfig::default();

            c.try_set_level(15, &config, false).unwrap();
            assert_eq!(c.level(), Level::MAX);

            c.try_set_level(-3, &config, false).unwrap();
            assert_eq!(c.level(), Level::MIN);
        }

        #[test]
        fn every_collection_follows_its_own_class_row() {
            let c = create_test_character(CharacterClass::Deft).with_level(Level::clamped(5));
            let t = AdvancementTable::standard();
            let lvl = c.level();

            assert_eq!(c.attunements().len(), t.slot_count(CharacterClass::Deft, lvl));
            assert_eq!(c.combat_options().len(), t.slot_count(CharacterClass::Strong, lvl));
            assert_eq!(c.miracles().len(), t.slot_count(CharacterClass::Wise, lvl));
            assert_eq!(c.quirks().slots().len(), t.slot_count(CharacterClass::Brave, lvl));
            assert_eq!(c.knacks().slots().len(), t.slot_count(CharacterClass::Clever, lvl));
            assert_eq!(c.retainers().len(), t.slot_count(CharacterClass::Fortunate, lvl));
        }

        #[test]
        fn attunement_prefix_survives_level_round_trip() {
            let mut c = create_test_character(CharacterClass::Deft);
            c.attunements_mut()
                .set_attunement(0, AttunementPosition::Primary, "Old Mentor", AttunementKind::Teacher)
                .unwrap();
            c.attunements_mut()
                .set_attunement(0, AttunementPosition::Secondary, "Iron Key", AttunementKind::Item)
                .unwrap();
            let before = c.attunements().get(0).unwrap().clone();

            c.set_level(Level::clamped(5));
            assert_eq!(c.attunements().len(), 3);
            c.set_level(Level::MIN);

            assert_eq!(c.attunements().len(), 1);
            assert_eq!(c.attunements().get(0).unwrap(), &before);
        }

        #[test]
        fn preview_names_what_would_be_lost() {
            let mut c = create_test_character(CharacterClass::Strong).with_level(Level::clamped(5));
            c.combat_options_mut()
                .set_option(1, Some(CombatOption::Parry))
                .unwrap();

            let report = c.preview_level_change(Level::MIN);
            assert_eq!(report.discarded(CharacterClass::Strong), 1);
            assert_eq!(report.total_discarded(), 1);
            assert_eq!(c.level().get(), 5);

            assert!(c.preview_level_change(Level::MAX).is_lossless());
        }

        #[test]
        fn confirmation_policy_rejects_unconfirmed_loss() {
            let mut c = create_test_character(CharacterClass::Brave).with_level(Level::clamped(4));
            c.quirks_mut().set_quirk(1, Some(Quirk::Lucky)).unwrap();
            let config = RulesConfig {
                shrink_policy: ShrinkPolicy::RequireConfirmation,
                ..RulesConfig::default()
            };

            assert!(matches!(
                c.try_set_level(1, &config, false),
                Err(DomainError::Constraint(_))
            ));
            assert_eq!(c.level().get(), 4);
            assert_eq!(c.quirks().quirk(1), Some(Quirk::Lucky));

            let report = c.try_set_level(1, &config, true).unwrap();
            assert_eq!(report.discarded(CharacterClass::Brave), 1);
            assert_eq!(c.quirks().slots().len(), 1);
        }

        #[test]
        fn confirmation_policy_allows_lossless_change() {
            let mut c = create_test_character(CharacterClass::Brave).with_level(Level::clamped(4));
            let config = RulesConfig {
                shrink_policy: ShrinkPolicy::RequireConfirmation,
                ..RulesConfig::default()
            };
            c.try_set_level(1, &config, false).unwrap();
            assert_eq!(c.level(), Level::MIN);
        }

        #[test]
        fn class_switch_keeps_other_collections() {
            let mut c = create_test_character(CharacterClass::Clever);
            c.knacks_mut().set_knack(0, Some(Knack::Healer)).unwrap();

            c.set_class(CharacterClass::Strong);
            c.set_class(CharacterClass::Clever);

            assert_eq!(c.knacks().knack(0), Some(Knack::Healer));
        }

        #[test]
        fn lazily_grown_knacks_are_truncated_on_reconcile() {
            let mut c = create_test_character(CharacterClass::Clever);
            c.knacks_mut().set_knack(2, Some(Knack::Scholar)).unwrap();
            assert_eq!(c.knacks().slots().len(), 3);

            c.reconcile_slots();
            assert_eq!(c.knacks().slots().len(), 1);
        }

        #[test]
        fn legacy_values_follow_table() {
            let mut c = create_test_character(CharacterClass::Deft);
            c.set_level(Level::clamped(7));
            let stats = AdvancementTable::standard().stats(CharacterClass::Deft, Level::clamped(7));
            assert_eq!(c.attack_value(), stats.attack_value);
            assert_eq!(c.save_value(), stats.save_value);
        }
    }

    mod wise {
        use super::*;

        #[test]
        fn willpower_drives_first_slot_capacity() {
            let mut c = create_test_character(CharacterClass::Wise).with_attributes(wisdom(16));
            assert_eq!(c.miracles().get(0).unwrap().base_miracles().len(), 4);

            c.set_attributes(wisdom(10));
            assert_eq!(c.miracles().get(0).unwrap().base_miracles().len(), 2);
        }

        fn smite_in_fourth_base_miracle() -> Character {
            let mut c = create_test_character(CharacterClass::Wise).with_attributes(wisdom(16));
            c.miracles_mut()
                .set_miracle_name(0, MiracleRef::Base(3), "Smite")
                .unwrap();
            c.miracles_mut().activate(0, MiracleRef::Base(3)).unwrap();
            c
        }

        #[test]
        fn lower_willpower_reports_cut_miracles() {
            let mut c = smite_in_fourth_base_miracle();

            let preview = c.preview_attribute_change(&wisdom(10));
            assert!(!preview.is_lossless());
            assert_eq!(preview.miracles, 1);
            assert!(c.preview_attribute_change(&wisdom(16)).is_lossless());

            let report = c.set_attributes(wisdom(10));
            assert_eq!(report.total_discarded(), 1);
            assert_eq!(c.miracles().get(0).unwrap().active_miracle(), None);
        }

        #[test]
        fn confirmation_policy_guards_willpower_loss() {
            let mut c = smite_in_fourth_base_miracle();
            let config = RulesConfig {
                shrink_policy: ShrinkPolicy::RequireConfirmation,
                ..RulesConfig::default()
            };

            assert!(matches!(
                c.try_set_attributes(wisdom(10), &config, false),
                Err(DomainError::Constraint(_))
            ));
            assert_eq!(c.attributes().willpower(), 16);
            let first = c.miracles().get(0).unwrap();
            assert_eq!(first.base_miracles()[3].name, "Smite");
            assert_eq!(first.active_miracle(), Some(MiracleRef::Base(3)));

            c.try_set_attributes(wisdom(18), &config, false).unwrap();
            let report = c.try_set_attributes(wisdom(10), &config, true).unwrap();
            assert_eq!(report.miracles, 1);
            assert_eq!(c.miracles().get(0).unwrap().base_miracles().len(), 2);
        }

        #[test]
        fn additional_miracle_count_follows_config() {
            let mut c = create_test_character(CharacterClass::Wise);
            let strict = RulesConfig {
                shrink_policy: ShrinkPolicy::RequireConfirmation,
                max_additional_miracles: 1,
            };

            assert!(matches!(
                c.set_additional_miracle_count(2, &strict, false),
                Err(DomainError::Validation(_))
            ));
            c.set_additional_miracle_count(1, &strict, false).unwrap();
            c.miracles_mut()
                .set_miracle_name(0, MiracleRef::Additional(0), "Hush")
                .unwrap();

            assert!(c.set_additional_miracle_count(0, &strict, false).is_err());
            assert_eq!(c.miracles().additional_miracle_count(), 1);

            let report = c.set_additional_miracle_count(0, &strict, true).unwrap();
            assert_eq!(report.miracles, 1);
            assert!(c.miracles().get(0).unwrap().additional_miracles().is_empty());
        }

        #[test]
        fn custom_mode_uses_neutral_willpower() {
            let mut attributes = wisdom(18);
            attributes.set_mode(AttributeMode::Custom);
            let c = create_test_character(CharacterClass::Wise).with_attributes(attributes);
            assert_eq!(c.miracles().get(0).unwrap().base_miracles().len(), 2);
        }

        #[test]
        fn magic_item_adds_level_to_max_hp() {
            let mut c = create_test_character(CharacterClass::Wise)
                .with_level(Level::clamped(6))
                .with_max_hp(20);
            c.miracles_mut().set_magic_item(2, true).unwrap();

            assert_eq!(c.effective_max_hp(), 26);
            c.heal(100);
            assert_eq!(c.current_hp(), 26);

            c.miracles_mut().activate(2, MiracleRef::Base(0)).unwrap();
            assert_eq!(c.miracles().get(2).unwrap().active_miracle(), None);
        }

        #[test]
        fn magic_item_bonus_only_counts_for_wise() {
            let mut c = create_test_character(CharacterClass::Wise)
                .with_level(Level::clamped(6))
                .with_max_hp(20);
            c.miracles_mut().set_magic_item(2, true).unwrap();
            c.heal(100);

            c.set_class(CharacterClass::Deft);
            assert_eq!(c.effective_max_hp(), 20);
            assert_eq!(c.current_hp(), 20);
        }
    }

    mod derived {
        use super::*;

        #[test]
        fn encumbrance_covers_every_list() {
            let mut c = create_test_character(CharacterClass::Strong);
            let eq = c.equipment_mut();
            eq.weapons
                .push(CarriedItem::new("Maul", WeightCategory::Heavy).with_quantity(2));
            eq.armor.push(CarriedItem::new("Leather", WeightCategory::Regular));
            eq.gear.push(
                CarriedItem::new("Spikes", WeightCategory::Minor)
                    .with_quantity(3)
                    .stashed(),
            );
            assert_eq!(c.encumbrance(), 50);
        }

        #[test]
        fn initiative_uses_dexterity() {
            let c = create_test_character(CharacterClass::Deft).with_attributes(
                Attributes::standard(AttributeScores {
                    dexterity: 16,
                    ..AttributeScores::default()
                }),
            );
            assert_eq!(c.initiative_bonus(), 2);
        }

        #[test]
        fn experience_progress_and_level_up() {
            let mut c = create_test_character(CharacterClass::Deft);
            let next = c.next_level_xp().unwrap();
            assert!(!c.can_level_up());
            assert_eq!(c.xp_progress(), 0.0);

            c.add_experience(next);
            assert!(c.can_level_up());
            assert_eq!(c.xp_progress(), 1.0);
        }
    }

    mod daily {
        use super::*;

        #[test]
        fn reset_clears_flags_across_models() {
            let mut c = create_test_character(CharacterClass::Brave);
            c.attunements_mut().set_daily_power_used(0, true).unwrap();
            c.quirks_mut().use_say_no().unwrap();
            c.spend_comeback_die().unwrap();
            c.knacks_mut()
                .set_knack(0, Some(Knack::CombatExploiter))
                .unwrap();
            c.knacks_mut().use_battle_power(0).unwrap();
            c.knacks_mut().use_unorthodox_bonus().unwrap();

            c.reset_daily_powers();

            assert!(!c.attunements().get(0).unwrap().daily_power_used());
            assert!(!c.quirks().say_no_used_today());
            assert_eq!(c.quirks().comeback_dice_used(), 0);
            assert!(!c.knacks().slots().get(0).unwrap().used_this_battle());
            assert!(!c.knacks().unorthodox_bonus_used_today());
            assert_eq!(c.knacks().knack(0), Some(Knack::CombatExploiter));
        }

        #[test]
        fn comeback_dice_follow_table() {
            let mut c = create_test_character(CharacterClass::Brave);
            let allowance = c.stats().comeback_dice.unwrap();
            assert_eq!(c.comeback_dice_remaining(), allowance);
            for _ in 0..allowance {
                c.spend_comeback_die().unwrap();
            }
            assert_eq!(c.comeback_dice_remaining(), 0);
            assert!(c.spend_comeback_die().is_err());
        }

        #[test]
        fn other_classes_have_no_comeback_dice() {
            let mut c = create_test_character(CharacterClass::Clever);
            assert_eq!(c.comeback_dice_remaining(), 0);
            assert!(c.spend_comeback_die().is_err());
        }
    }

    mod serde {
        use super::*;

        fn populated() -> Character {
            let mut c = create_test_character(CharacterClass::Wise)
                .with_level(Level::clamped(6))
                .with_attributes(wisdom(14))
                .with_max_hp(18);
            c.attunements_mut().set_tertiary_enabled(true).unwrap();
            c.attunements_mut().set_quaternary_enabled(true).unwrap();
            c.miracles_mut().set_additional_miracle_count(2, 2).unwrap();
            c.miracles_mut().set_magic_item(2, true).unwrap();
            c.miracles_mut()
                .activate(0, MiracleRef::Additional(1))
                .unwrap();
            c.knacks_mut()
                .set_knack(0, Some(Knack::CombatExploiter))
                .unwrap();
            c.knacks_mut().use_battle_power(0).unwrap();
            c.quirks_mut().use_say_no().unwrap();
            c.retainers_mut().hire(Retainer::new("Pell", 4)).unwrap();
            c.equipment_mut()
                .gear
                .push(CarriedItem::new("Lantern", WeightCategory::Minor));
            c
        }

        #[test]
        fn serialize_deserialize_roundtrip() {
            let c = populated();
            let json = serde_json::to_string(&c).unwrap();
            let back: Character = serde_json::from_str(&json).unwrap();

            assert_eq!(back.id(), c.id());
            assert_eq!(back.name().as_str(), "Test Hero");
            assert_eq!(back.level(), c.level());
            assert_eq!(back.attunements(), c.attunements());
            assert_eq!(back.miracles(), c.miracles());
            assert_eq!(back.knacks(), c.knacks());
            assert_eq!(back.quirks(), c.quirks());
            assert_eq!(back.retainers(), c.retainers());
            assert_eq!(back.equipment(), c.equipment());
            assert_eq!(back.effective_max_hp(), c.effective_max_hp());
        }

        #[test]
        fn serialize_produces_camel_case_flags() {
            let json = serde_json::to_string(&populated()).unwrap();

            assert!(json.contains("hasTertiaryAttunement"));
            assert!(json.contains("hasQuaternaryAttunement"));
            assert!(json.contains("isMagicItem"));
            assert!(json.contains("additionalMiracleCount"));
            assert!(json.contains("combatOptions"));
            assert!(json.contains("attackValue"));
            assert!(json.contains("usedThisBattle"));
            assert!(json.contains("sayNoUsedToday"));
        }

        #[test]
        fn duplicate_options_are_cleared_on_load() {
            let mut value = serde_json::to_value(populated()).unwrap();
            value["combatOptions"] = serde_json::json!([
                { "option": "parry" },
                { "option": "parry" }
            ]);

            let back: Character = serde_json::from_value(value).unwrap();
            assert_eq!(back.combat_options().option(0), Some(CombatOption::Parry));
            assert_eq!(back.combat_options().option(1), None);
            assert_eq!(back.combat_options().count(), 1);
        }

        #[test]
        fn deserialize_clamps_level_and_resyncs_legacy_values() {
            let mut value = serde_json::to_value(populated()).unwrap();
            value["level"] = serde_json::json!(42);
            value["attackValue"] = serde_json::json!(99);

            let back: Character = serde_json::from_value(value).unwrap();
            assert_eq!(back.level(), Level::MAX);

            let json = serde_json::to_value(&back).unwrap();
            assert_eq!(
                json["attackValue"],
                serde_json::json!(back.stats().attack_value)
            );
        }
    }
}
