//! D&D 5e rules: class catalog, progression tables, resource derivation,
//! and character templates.
//!
//! Per-class behaviour lives in data (`catalog`), not in per-class types.
//! `resources` turns that data plus a character snapshot into a
//! [`CharacterResources`](crate::entities::CharacterResources) block.

mod catalog;
mod dnd5e;
mod resources;
mod templates;

pub use catalog::{
    class_config, full_caster_slots, half_caster_slots, warlock_pact_slots, ClassConfig,
    Spellcasting, UNLIMITED_USES,
};
pub use dnd5e::{calculate_max_hp, hit_die, CasterType, DndClass, MAX_LEVEL};
pub use resources::{
    initialize_resources, pact_magic_for_level, recalculate_resources_for_level, resolve_die_type,
    resolve_max, spell_slots_for_class,
};
pub use templates::{CharacterTemplate, NewCharacter, DEFAULT_SPEED};
