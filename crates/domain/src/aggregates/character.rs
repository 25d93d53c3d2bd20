//! Character aggregate - a player character sheet with live combat state
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: everything goes through accessors and mutation methods
//! - **Newtypes**: `CharacterName` is validated by construction
//! - **Domain events**: mutations return outcome enums (`DamageOutcome`, etc.)
//! - **Refusals are outcomes**: spending hit dice you don't have or attuning a
//!   fourth item returns a refusal variant and leaves the record untouched
//!
//! Mutation methods do not stamp `updated_at`; the caller does that with
//! [`Character::touch`] once the whole operation succeeded.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::{CharacterResources, EncumbranceReport, Inventory, InventoryItem};
use crate::error::DomainError;
use crate::events::{
    AttunementOutcome, ConditionChange, DamageOutcome, EquipOutcome, HealOutcome, LevelChange,
    LongRestOutcome, ResourceOutcome, ShortRestOutcome, SlotOutcome, TempHpOutcome,
};
use crate::game_systems::{
    calculate_max_hp, initialize_resources, recalculate_resources_for_level, NewCharacter,
    MAX_LEVEL,
};
use crate::ids::{CharacterId, ItemId};
use crate::value_objects::{
    proficiency_bonus, Ability, AbilityScores, CharacterName, DeathSaveKind, DeathSaves, HitDice,
    HitPoints,
};

/// A player character.
///
/// # Invariants
///
/// - `0 <= hit_points.current <= hit_points.max`
/// - `hit_dice.current <= hit_dice.total`
/// - death-save counters stay within 0-3
/// - `level` is within 1-20 for records created through this type
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    // Identity
    id: CharacterId,
    name: CharacterName,

    // Descriptive
    race: String,
    class_name: String,
    subclass: Option<String>,
    level: u8,
    background: String,
    alignment: String,
    experience_points: u32,

    // Stats
    ability_scores: AbilityScores,
    proficiency_bonus: i32,
    armor_class: i32,
    initiative: i32,
    speed: u32,
    skill_proficiencies: Vec<String>,
    saving_throw_proficiencies: Vec<Ability>,

    // Combat state
    hit_points: HitPoints,
    hit_dice: HitDice,
    death_saves: DeathSaves,
    conditions: BTreeSet<String>,

    // Owned collections
    inventory: Inventory,
    /// `None` only on records written before resources were tracked
    resources: Option<CharacterResources>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a character from a draft. Class resources, spell slots and pact
    /// magic are derived here and start full.
    pub fn create(draft: NewCharacter, now: DateTime<Utc>) -> Self {
        let resources = initialize_resources(
            &draft.class_name,
            draft.level,
            &draft.ability_scores,
            draft.subclass.as_deref(),
        );

        Self {
            id: CharacterId::new(),
            name: draft.name,
            race: draft.race,
            class_name: draft.class_name,
            subclass: draft.subclass,
            level: draft.level,
            background: draft.background,
            alignment: draft.alignment,
            experience_points: draft.experience_points,
            ability_scores: draft.ability_scores,
            proficiency_bonus: draft.proficiency_bonus,
            armor_class: draft.armor_class,
            initiative: draft.initiative,
            speed: draft.speed,
            skill_proficiencies: draft.skill_proficiencies,
            saving_throw_proficiencies: draft.saving_throw_proficiencies,
            hit_points: draft.hit_points,
            hit_dice: draft.hit_dice,
            death_saves: DeathSaves::default(),
            conditions: BTreeSet::new(),
            inventory: draft.inventory,
            resources: Some(resources),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    /// Display-cased class name, e.g. "Fighter".
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn subclass(&self) -> Option<&str> {
        self.subclass.as_deref()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn alignment(&self) -> &str {
        &self.alignment
    }

    pub fn experience_points(&self) -> u32 {
        self.experience_points
    }

    pub fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn skill_proficiencies(&self) -> &[String] {
        &self.skill_proficiencies
    }

    pub fn saving_throw_proficiencies(&self) -> &[Ability] {
        &self.saving_throw_proficiencies
    }

    pub fn hit_points(&self) -> &HitPoints {
        &self.hit_points
    }

    pub fn hit_dice(&self) -> &HitDice {
        &self.hit_dice
    }

    pub fn death_saves(&self) -> &DeathSaves {
        &self.death_saves
    }

    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(String::as_str)
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.conditions.contains(condition)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn resources(&self) -> Option<&CharacterResources> {
        self.resources.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// At 0 HP and rolling death saves.
    pub fn is_dying(&self) -> bool {
        self.hit_points.is_zero()
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_resources(mut self, resources: Option<CharacterResources>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_hit_points(mut self, hit_points: HitPoints) -> Self {
        self.hit_points = hit_points;
        self
    }

    pub fn with_hit_dice(mut self, hit_dice: HitDice) -> Self {
        self.hit_dice = hit_dice;
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    // =========================================================================
    // Identity Mutations
    // =========================================================================

    /// Stamp the last-modified time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn rename(&mut self, name: CharacterName) {
        self.name = name;
    }

    // =========================================================================
    // Hit Points
    // =========================================================================

    /// Temp HP soaks damage first; current HP floors at 0.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if amount == 0 {
            return DamageOutcome::NoEffect;
        }

        let (absorbed_by_temp, damage_dealt) = self.hit_points.absorb(amount);
        if self.hit_points.is_zero() {
            DamageOutcome::DroppedToZero {
                absorbed_by_temp,
                damage_dealt,
            }
        } else {
            DamageOutcome::Wounded {
                absorbed_by_temp,
                damage_dealt,
                remaining_hp: self.hit_points.current(),
            }
        }
    }

    /// Heal up to max HP. Death saves are left alone; callers that want the
    /// usual "healed from 0 clears death saves" rule check
    /// [`HealOutcome::revived`] and call [`Character::reset_death_saves`].
    pub fn heal(&mut self, amount: u32) -> HealOutcome {
        if self.hit_points.current() >= self.hit_points.max() {
            return HealOutcome::AlreadyFull;
        }

        let was_dying = self.is_dying();
        let amount_healed = self.hit_points.restore(amount);
        HealOutcome::Healed {
            amount_healed,
            new_hp: self.hit_points.current(),
            revived: was_dying && amount_healed > 0,
        }
    }

    /// Temp HP does not stack: keep whichever is larger.
    pub fn add_temporary_hp(&mut self, amount: u32) -> TempHpOutcome {
        let from = self.hit_points.temp();
        self.hit_points.grant_temp(amount);
        let to = self.hit_points.temp();
        if to == from {
            TempHpOutcome::Kept { current: from }
        } else {
            TempHpOutcome::Raised { from, to }
        }
    }

    /// Set current HP directly, clamped to `[0, max]`. Returns the stored value.
    pub fn set_current_hp(&mut self, value: u32) -> u32 {
        self.hit_points.set_current(value);
        self.hit_points.current()
    }

    // =========================================================================
    // Death Saves & Conditions
    // =========================================================================

    /// Set one counter, clamped to 0-3. Three failures do not kill; that call
    /// belongs to whoever runs the table.
    pub fn update_death_save(&mut self, kind: DeathSaveKind, count: u8) {
        self.death_saves.set(kind, count);
    }

    pub fn reset_death_saves(&mut self) {
        self.death_saves.reset();
    }

    pub fn add_condition(&mut self, condition: &str) -> ConditionChange {
        let condition = condition.trim().to_string();
        if self.conditions.insert(condition.clone()) {
            ConditionChange::Added(condition)
        } else {
            ConditionChange::AlreadyPresent(condition)
        }
    }

    pub fn remove_condition(&mut self, condition: &str) -> ConditionChange {
        let condition = condition.trim().to_string();
        if self.conditions.remove(&condition) {
            ConditionChange::Removed(condition)
        } else {
            ConditionChange::NotPresent(condition)
        }
    }

    // =========================================================================
    // Rests
    // =========================================================================

    /// Spend hit dice for average-roll healing, then refill short-rest
    /// resources and pact magic.
    ///
    /// Asking for more hit dice than remain is refused with no change.
    pub fn short_rest(&mut self, hit_dice_spent: u32) -> ShortRestOutcome {
        let available = self.hit_dice.current();
        if hit_dice_spent > available {
            return ShortRestOutcome::InsufficientHitDice {
                requested: hit_dice_spent,
                available,
            };
        }

        let healing = hit_dice_spent * self.hit_dice.die_type().average_roll();
        let hp_restored = self.hit_points.restore(healing);
        self.hit_dice.spend(hit_dice_spent);

        let recovery = self
            .resources
            .as_mut()
            .map(CharacterResources::recover_short_rest)
            .unwrap_or_default();

        ShortRestOutcome::Rested {
            hit_dice_spent,
            hp_restored,
            resources_restored: recovery.resources_restored,
            pact_magic_restored: recovery.pact_magic_restored,
        }
    }

    /// Full HP, no temp HP, half the hit dice back (at least one), clean death
    /// saves, and every resource, slot level and pact slot refilled.
    pub fn long_rest(&mut self) -> LongRestOutcome {
        let before = self.hit_points.current();
        let temp_hp_cleared = self.hit_points.temp();
        self.hit_points.fill();
        self.hit_points.clear_temp();
        let hit_dice_regained = self.hit_dice.recover_half();
        self.death_saves.reset();

        let recovery = self
            .resources
            .as_mut()
            .map(CharacterResources::recover_long_rest)
            .unwrap_or_default();

        LongRestOutcome {
            hp_restored: self.hit_points.current().saturating_sub(before),
            temp_hp_cleared,
            hit_dice_regained,
            resources_restored: recovery.resources_restored,
            spell_slots_restored: recovery.spell_slots_restored,
            pact_magic_restored: recovery.pact_magic_restored,
        }
    }

    // =========================================================================
    // Leveling
    // =========================================================================

    /// Move to `new_level`, re-deriving proficiency, hit dice, max HP and
    /// resources. Spent amounts carry over rather than resetting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `new_level` is outside 1-20.
    pub fn set_level(&mut self, new_level: u8) -> Result<LevelChange, DomainError> {
        if !(1..=MAX_LEVEL).contains(&new_level) {
            return Err(DomainError::validation(format!(
                "Level must be between 1 and {}, got {}",
                MAX_LEVEL, new_level
            )));
        }
        if new_level == self.level {
            return Ok(LevelChange::Unchanged { level: new_level });
        }

        let from = self.level;
        let con = self.ability_scores.modifier(Ability::Constitution);
        let max_hp = calculate_max_hp(new_level, self.hit_dice.die_type(), con);

        self.level = new_level;
        self.proficiency_bonus = proficiency_bonus(new_level);
        self.hit_points.rebase_max(max_hp);
        self.hit_dice.rebase_total(u32::from(new_level));

        let previous = self.resources.take();
        let resources = match &previous {
            Some(existing) => recalculate_resources_for_level(
                existing,
                &self.class_name,
                new_level,
                &self.ability_scores,
                self.subclass.as_deref(),
            ),
            None => initialize_resources(
                &self.class_name,
                new_level,
                &self.ability_scores,
                self.subclass.as_deref(),
            ),
        };
        let resources_unlocked = resources
            .class_resources()
            .iter()
            .map(|r| r.resource_key())
            .filter(|key| {
                previous
                    .as_ref()
                    .and_then(|p| p.resource(key))
                    .is_none()
            })
            .map(str::to_string)
            .collect();
        self.resources = Some(resources);

        Ok(LevelChange::Changed {
            from,
            to: new_level,
            max_hp,
            proficiency_bonus: self.proficiency_bonus,
            resources_unlocked,
        })
    }

    // =========================================================================
    // Resources
    // =========================================================================

    pub fn use_resource(&mut self, resource_key: &str, amount: Option<u32>) -> ResourceOutcome {
        match self.resources.as_mut() {
            Some(r) => r.use_resource(resource_key, amount),
            None => unknown_resource(resource_key),
        }
    }

    pub fn restore_resource(&mut self, resource_key: &str, amount: Option<u32>) -> ResourceOutcome {
        match self.resources.as_mut() {
            Some(r) => r.restore_resource(resource_key, amount),
            None => unknown_resource(resource_key),
        }
    }

    pub fn set_resource_value(&mut self, resource_key: &str, value: u32) -> ResourceOutcome {
        match self.resources.as_mut() {
            Some(r) => r.set_resource_value(resource_key, value),
            None => unknown_resource(resource_key),
        }
    }

    pub fn use_spell_slot(&mut self, level: u8) -> SlotOutcome {
        match self.resources.as_mut() {
            Some(r) => r.use_spell_slot(level),
            None => SlotOutcome::NotAvailable {
                slot_level: Some(level),
            },
        }
    }

    pub fn restore_spell_slot(&mut self, level: u8, amount: u32) -> SlotOutcome {
        match self.resources.as_mut() {
            Some(r) => r.restore_spell_slot(level, amount),
            None => SlotOutcome::NotAvailable {
                slot_level: Some(level),
            },
        }
    }

    pub fn use_pact_slot(&mut self) -> SlotOutcome {
        match self.resources.as_mut() {
            Some(r) => r.use_pact_slot(),
            None => SlotOutcome::NotAvailable { slot_level: None },
        }
    }

    pub fn restore_pact_slots(&mut self) -> SlotOutcome {
        match self.resources.as_mut() {
            Some(r) => r.restore_pact_slots(),
            None => SlotOutcome::NotAvailable { slot_level: None },
        }
    }

    /// Attach a freshly derived resource block (schema migration).
    pub(crate) fn attach_resources(&mut self, resources: CharacterResources) {
        self.resources = Some(resources);
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub fn add_item(&mut self, item: InventoryItem) {
        self.inventory.add(item);
    }

    pub fn remove_item(&mut self, item_id: &ItemId) -> Option<InventoryItem> {
        self.inventory.remove(item_id)
    }

    pub fn toggle_equipped(&mut self, item_id: &ItemId) -> EquipOutcome {
        self.inventory.toggle_equipped(item_id)
    }

    pub fn toggle_attuned(&mut self, item_id: &ItemId) -> AttunementOutcome {
        self.inventory.toggle_attuned(item_id)
    }

    /// Weight against STR-based capacity, plus attunement usage.
    pub fn encumbrance(&self) -> EncumbranceReport {
        self.inventory.encumbrance(self.ability_scores.strength)
    }
}

fn unknown_resource(resource_key: &str) -> ResourceOutcome {
    ResourceOutcome::UnknownResource {
        resource_key: resource_key.to_string(),
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Persisted shape. Fields added after the first release carry defaults so
/// older records still load; `resources` stays `None` until migrated.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    name: CharacterName,
    race: String,
    #[serde(rename = "class")]
    class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subclass: Option<String>,
    level: u8,
    #[serde(default)]
    background: String,
    #[serde(default)]
    alignment: String,
    #[serde(default)]
    experience_points: u32,
    ability_scores: AbilityScores,
    proficiency_bonus: i32,
    hit_points: HitPoints,
    hit_dice: HitDice,
    armor_class: i32,
    initiative: i32,
    speed: u32,
    #[serde(default)]
    death_saves: DeathSaves,
    #[serde(default)]
    conditions: BTreeSet<String>,
    #[serde(default)]
    skill_proficiencies: Vec<String>,
    #[serde(default)]
    saving_throw_proficiencies: Vec<Ability>,
    #[serde(default)]
    inventory: Inventory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resources: Option<CharacterResources>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CharacterWireFormat> for Character {
    fn from(wire: CharacterWireFormat) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            race: wire.race,
            class_name: wire.class_name,
            subclass: wire.subclass,
            level: wire.level,
            background: wire.background,
            alignment: wire.alignment,
            experience_points: wire.experience_points,
            ability_scores: wire.ability_scores,
            proficiency_bonus: wire.proficiency_bonus,
            armor_class: wire.armor_class,
            initiative: wire.initiative,
            speed: wire.speed,
            skill_proficiencies: wire.skill_proficiencies,
            saving_throw_proficiencies: wire.saving_throw_proficiencies,
            hit_points: wire.hit_points,
            hit_dice: wire.hit_dice,
            death_saves: wire.death_saves,
            conditions: wire.conditions,
            inventory: wire.inventory,
            resources: wire.resources,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            race: self.race.clone(),
            class_name: self.class_name.clone(),
            subclass: self.subclass.clone(),
            level: self.level,
            background: self.background.clone(),
            alignment: self.alignment.clone(),
            experience_points: self.experience_points,
            ability_scores: self.ability_scores,
            proficiency_bonus: self.proficiency_bonus,
            hit_points: self.hit_points,
            hit_dice: self.hit_dice,
            armor_class: self.armor_class,
            initiative: self.initiative,
            speed: self.speed,
            death_saves: self.death_saves,
            conditions: self.conditions.clone(),
            skill_proficiencies: self.skill_proficiencies.clone(),
            saving_throw_proficiencies: self.saving_throw_proficiencies.clone(),
            inventory: self.inventory.clone(),
            resources: self.resources.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        CharacterWireFormat::deserialize(deserializer).map(Character::from)
    }
}

// ============================================================================
// Tests
// ============================================================================
