//! D&D 5e character rules: ability math, class resources, spell slots,
//! combat state, inventory limits, and record migration.
//!
//! Pure and synchronous. Storage, clocks and randomness are supplied by the
//! caller.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod migrations;
pub mod value_objects;

pub use aggregates::Character;

pub use entities::{
    carrying_capacity, CharacterResources, ClassResource, ClassResourceDefinition,
    EncumbranceReport, Inventory, InventoryItem, InventoryItemKind, LevelScaling,
    ModifierScaling, PactMagic, ResetCadence, ResourceColor, RestRecovery, ScalingValue,
    SpellSlot, SpellSlots, ATTUNEMENT_LIMIT, CARRY_WEIGHT_PER_STRENGTH, MAX_SPELL_LEVEL,
};

pub use error::DomainError;

pub use events::{
    AttunementOutcome, ConditionChange, DamageOutcome, EquipOutcome, HealOutcome, LevelChange,
    LongRestOutcome, ResourceOutcome, ShortRestOutcome, SlotOutcome, TempHpOutcome,
};

pub use game_systems::{
    calculate_max_hp, class_config, hit_die, initialize_resources, recalculate_resources_for_level,
    resolve_die_type, resolve_max, CasterType, CharacterTemplate, ClassConfig, DndClass,
    NewCharacter, MAX_LEVEL,
};

pub use ids::{CharacterId, ItemId, ResourceId};

pub use migrations::{migrate_characters, migrate_to_current_schema, needs_migration};

pub use value_objects::{
    ability_modifier, proficiency_bonus, Ability, AbilityScores, CharacterName, DeathSaveKind,
    DeathSaves, DiceFormula, DiceParseError, DiceRoll, DieType, HitDice, HitPoints, RollMode,
    MAX_DEATH_SAVES,
};
