//! Entities owned by the character aggregate.

mod character_resources;
mod class_resource;
mod inventory;
mod spell_slots;

pub use character_resources::{CharacterResources, RestRecovery};
pub use class_resource::{
    ClassResource, ClassResourceDefinition, LevelScaling, ModifierScaling, ResetCadence,
    ResourceColor, ScalingValue,
};
pub use inventory::{
    carrying_capacity, EncumbranceReport, Inventory, InventoryItem, InventoryItemKind,
    ATTUNEMENT_LIMIT, CARRY_WEIGHT_PER_STRENGTH,
};
pub use spell_slots::{PactMagic, SpellSlot, SpellSlots, MAX_SPELL_LEVEL};
