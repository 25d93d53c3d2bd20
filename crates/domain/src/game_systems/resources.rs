//! Resource scaling, initialization, and re-leveling.
//!
//! Unknown classes and levels outside 1-20 degrade to empty resources rather
//! than failing; callers validate class and level before relying on the result.

use super::catalog::{
    class_config, full_caster_slots, half_caster_slots, warlock_pact_slots, ClassConfig,
};
use super::dnd5e::{CasterType, DndClass, MAX_LEVEL};
use crate::entities::{
    CharacterResources, ClassResource, ClassResourceDefinition, LevelScaling, PactMagic,
    SpellSlots,
};
use crate::value_objects::{proficiency_bonus, AbilityScores, DieType};

/// Latest breakpoint whose level is at or below `level`. Tiers replace each
/// other; they never accumulate.
fn active_breakpoint(level_scaling: &[LevelScaling], level: u8) -> Option<&LevelScaling> {
    level_scaling
        .iter()
        .filter(|s| s.level <= level)
        .max_by_key(|s| s.level)
}

/// Max value of a resource at `level`; 0 when no breakpoint is unlocked yet.
pub fn resolve_max(
    level_scaling: &[LevelScaling],
    level: u8,
    ability_scores: Option<&AbilityScores>,
) -> u32 {
    active_breakpoint(level_scaling, level)
        .map(|s| s.max_value.resolve(ability_scores))
        .unwrap_or(0)
}

/// Die type of the active breakpoint, if it declares one.
pub fn resolve_die_type(level_scaling: &[LevelScaling], level: u8) -> Option<DieType> {
    active_breakpoint(level_scaling, level).and_then(|s| s.die_type)
}

fn is_valid_level(level: u8) -> bool {
    (1..=MAX_LEVEL).contains(&level)
}

fn instantiate(
    definition: &ClassResourceDefinition,
    level: u8,
    ability_scores: &AbilityScores,
) -> ClassResource {
    let max = resolve_max(&definition.level_scaling, level, Some(ability_scores));
    let die_type = resolve_die_type(&definition.level_scaling, level).or(definition.die_type);
    ClassResource::from_definition(definition, max, die_type)
}

fn unlocked_definitions<'a>(
    config: &'a ClassConfig,
    level: u8,
    subclass: Option<&'a str>,
) -> impl Iterator<Item = &'a ClassResourceDefinition> + 'a {
    config
        .resources
        .iter()
        .filter(move |d| d.is_available_to(subclass) && d.unlock_level() <= level)
}

/// Spell-slot ladder for a full or half caster at `level`, omitted when the
/// class does not cast from slots or has none yet.
pub fn spell_slots_for_class(
    class: DndClass,
    level: u8,
    ability_scores: &AbilityScores,
) -> Option<SpellSlots> {
    let casting = class_config(class).spellcasting?;
    let counts = match casting.caster_type {
        CasterType::Full => full_caster_slots(level)?,
        CasterType::Half => half_caster_slots(level)?,
        CasterType::Pact => return None,
    };

    let slots = SpellSlots::from_counts(
        counts,
        casting.ability,
        proficiency_bonus(level),
        ability_scores.modifier(casting.ability),
    );
    (!slots.is_empty()).then_some(slots)
}

/// Pact magic pool for a warlock level.
pub fn pact_magic_for_level(level: u8) -> Option<PactMagic> {
    warlock_pact_slots(level).map(|(count, slot_level)| PactMagic::new(slot_level, u32::from(count)))
}

fn pact_magic_for_class(class: DndClass, level: u8) -> Option<PactMagic> {
    let casting = class_config(class).spellcasting?;
    match casting.caster_type {
        CasterType::Pact => pact_magic_for_level(level),
        _ => None,
    }
}

/// Build a character's full resource set. Every resource starts full.
pub fn initialize_resources(
    class_name: &str,
    level: u8,
    ability_scores: &AbilityScores,
    subclass: Option<&str>,
) -> CharacterResources {
    let Ok(class) = class_name.parse::<DndClass>() else {
        return CharacterResources::default();
    };
    if !is_valid_level(level) {
        return CharacterResources::default();
    }

    let config = class_config(class);
    let class_resources = unlocked_definitions(&config, level, subclass)
        .map(|d| instantiate(d, level, ability_scores))
        .collect();

    CharacterResources::new(
        class_resources,
        spell_slots_for_class(class, level, ability_scores),
        pact_magic_for_class(class, level),
    )
}

/// Re-derive resources for `new_level`.
///
/// Existing class resources keep their spent amount (current shifts by the
/// change in max, clamped). Resources newly unlocked are appended full.
/// Spell slots and pact magic are recomputed from scratch. Resources the
/// catalog does not know are left as they are.
pub fn recalculate_resources_for_level(
    existing: &CharacterResources,
    class_name: &str,
    new_level: u8,
    ability_scores: &AbilityScores,
    subclass: Option<&str>,
) -> CharacterResources {
    let Ok(class) = class_name.parse::<DndClass>() else {
        return existing.clone();
    };
    if !is_valid_level(new_level) {
        return existing.clone();
    }

    let config = class_config(class);
    let mut resources = existing.clone();

    for resource in resources.class_resources_mut().iter_mut() {
        let Some(definition) = config.resource(resource.resource_key()) else {
            continue;
        };
        let new_max = resolve_max(&definition.level_scaling, new_level, Some(ability_scores));
        let new_die = resolve_die_type(&definition.level_scaling, new_level);
        resource.rescale(new_max, new_die);
    }

    let unlocked: Vec<ClassResource> = unlocked_definitions(&config, new_level, subclass)
        .filter(|d| existing.resource(d.resource_key).is_none())
        .map(|d| instantiate(d, new_level, ability_scores))
        .collect();
    resources.class_resources_mut().extend(unlocked);

    resources.replace_slots(
        spell_slots_for_class(class, new_level, ability_scores),
        pact_magic_for_class(class, new_level),
    );
    resources
}
