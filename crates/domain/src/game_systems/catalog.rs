//! Static class-resource catalog and spell-slot progression tables.
//!
//! Per-class behaviour is data: one [`ClassConfig`] per [`DndClass`].

use super::dnd5e::{CasterType, DndClass};
use crate::entities::{
    ClassResourceDefinition, LevelScaling, ModifierScaling, ResetCadence, ResourceColor,
};
use crate::value_objects::{Ability, DieType};

/// Rage uses at level 20 are unlimited; this count stands in for that.
pub const UNLIMITED_USES: u32 = 999;

/// How a class casts spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spellcasting {
    pub caster_type: CasterType,
    pub ability: Ability,
}

/// Catalog entry for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConfig {
    pub class: DndClass,
    pub resources: Vec<ClassResourceDefinition>,
    pub spellcasting: Option<Spellcasting>,
}

impl ClassConfig {
    pub fn resource(&self, resource_key: &str) -> Option<&ClassResourceDefinition> {
        self.resources
            .iter()
            .find(|r| r.resource_key == resource_key)
    }
}

/// One breakpoint per level in `levels`, valued by `value(level)`.
fn per_level(levels: std::ops::RangeInclusive<u8>, value: impl Fn(u8) -> u32) -> Vec<LevelScaling> {
    levels.map(|l| LevelScaling::new(l, value(l))).collect()
}

pub fn class_config(class: DndClass) -> ClassConfig {
    use ResetCadence::{LongRest, ShortRest};

    let (resources, spellcasting) = match class {
        DndClass::Barbarian => (
            vec![ClassResourceDefinition::new(
                "rage",
                "Rage",
                LongRest,
                ResourceColor::Red,
                "Enter a battle rage for extra damage and resistance",
                vec![
                    LevelScaling::new(1, 2),
                    LevelScaling::new(3, 3),
                    LevelScaling::new(6, 4),
                    LevelScaling::new(12, 5),
                    LevelScaling::new(17, 6),
                    LevelScaling::new(20, UNLIMITED_USES),
                ],
            )],
            None,
        ),
        DndClass::Bard => (
            vec![ClassResourceDefinition::new(
                "bardic_inspiration",
                "Bardic Inspiration",
                LongRest,
                ResourceColor::Purple,
                "Inspire allies with a bonus die they can add to checks, attacks, or saves",
                vec![
                    LevelScaling::modifier(1, ModifierScaling::CharismaMod).with_die(DieType::D6),
                    LevelScaling::modifier(5, ModifierScaling::CharismaMod).with_die(DieType::D8),
                    LevelScaling::modifier(10, ModifierScaling::CharismaMod).with_die(DieType::D10),
                    LevelScaling::modifier(15, ModifierScaling::CharismaMod).with_die(DieType::D12),
                ],
            )
            .with_die(DieType::D6)],
            Some(Spellcasting {
                caster_type: CasterType::Full,
                ability: Ability::Charisma,
            }),
        ),
        DndClass::Cleric => (
            vec![ClassResourceDefinition::new(
                "channel_divinity",
                "Channel Divinity",
                ShortRest,
                ResourceColor::Gold,
                "Channel divine energy (Turn Undead, domain features)",
                vec![
                    LevelScaling::new(2, 1),
                    LevelScaling::new(6, 2),
                    LevelScaling::new(18, 3),
                ],
            )],
            Some(Spellcasting {
                caster_type: CasterType::Full,
                ability: Ability::Wisdom,
            }),
        ),
        DndClass::Druid => (
            vec![ClassResourceDefinition::new(
                "wild_shape",
                "Wild Shape",
                ShortRest,
                ResourceColor::Green,
                "Transform into a beast",
                vec![LevelScaling::new(2, 2)],
            )],
            Some(Spellcasting {
                caster_type: CasterType::Full,
                ability: Ability::Wisdom,
            }),
        ),
        DndClass::Fighter => (
            vec![
                ClassResourceDefinition::new(
                    "second_wind",
                    "Second Wind",
                    ShortRest,
                    ResourceColor::Green,
                    "Regain hit points as a bonus action",
                    vec![LevelScaling::new(1, 1)],
                ),
                ClassResourceDefinition::new(
                    "action_surge",
                    "Action Surge",
                    ShortRest,
                    ResourceColor::Orange,
                    "Take an additional action on your turn",
                    vec![LevelScaling::new(2, 1), LevelScaling::new(17, 2)],
                ),
                ClassResourceDefinition::new(
                    "superiority_dice",
                    "Superiority Dice",
                    ShortRest,
                    ResourceColor::Gold,
                    "Fuel combat maneuvers (Battle Master)",
                    vec![
                        LevelScaling::new(3, 4).with_die(DieType::D8),
                        LevelScaling::new(7, 5).with_die(DieType::D8),
                        LevelScaling::new(10, 5).with_die(DieType::D10),
                        LevelScaling::new(15, 6).with_die(DieType::D10),
                        LevelScaling::new(18, 6).with_die(DieType::D12),
                    ],
                )
                .with_die(DieType::D8)
                .with_required_subclass("Battle Master"),
            ],
            None,
        ),
        DndClass::Monk => (
            vec![ClassResourceDefinition::new(
                "ki",
                "Ki Points",
                ShortRest,
                ResourceColor::Blue,
                "Mystical energy for martial arts techniques",
                per_level(2..=20, u32::from),
            )],
            None,
        ),
        DndClass::Paladin => (
            vec![
                ClassResourceDefinition::new(
                    "lay_on_hands",
                    "Lay on Hands",
                    LongRest,
                    ResourceColor::Gold,
                    "Healing pool equal to Paladin level x 5",
                    per_level(1..=20, |l| u32::from(l) * 5),
                ),
                ClassResourceDefinition::new(
                    "divine_sense",
                    "Divine Sense",
                    LongRest,
                    ResourceColor::Blue,
                    "Detect celestials, fiends, and undead",
                    vec![LevelScaling::modifier(1, ModifierScaling::CharismaModPlusOne)],
                ),
                ClassResourceDefinition::new(
                    "channel_divinity",
                    "Channel Divinity",
                    ShortRest,
                    ResourceColor::Purple,
                    "Sacred Oath channel divinity options",
                    vec![LevelScaling::new(3, 1)],
                ),
            ],
            Some(Spellcasting {
                caster_type: CasterType::Half,
                ability: Ability::Charisma,
            }),
        ),
        DndClass::Ranger => (
            Vec::new(),
            Some(Spellcasting {
                caster_type: CasterType::Half,
                ability: Ability::Wisdom,
            }),
        ),
        DndClass::Rogue => (Vec::new(), None),
        DndClass::Sorcerer => (
            vec![ClassResourceDefinition::new(
                "sorcery_points",
                "Sorcery Points",
                LongRest,
                ResourceColor::Purple,
                "Fuel Metamagic and create spell slots",
                per_level(2..=20, u32::from),
            )],
            Some(Spellcasting {
                caster_type: CasterType::Full,
                ability: Ability::Charisma,
            }),
        ),
        DndClass::Warlock => (
            vec![
                mystic_arcanum("mystic_arcanum_6", "Mystic Arcanum (6th)", "6th-level spell slot", 11),
                mystic_arcanum("mystic_arcanum_7", "Mystic Arcanum (7th)", "7th-level spell slot", 13),
                mystic_arcanum("mystic_arcanum_8", "Mystic Arcanum (8th)", "8th-level spell slot", 15),
                mystic_arcanum("mystic_arcanum_9", "Mystic Arcanum (9th)", "9th-level spell slot", 17),
            ],
            Some(Spellcasting {
                caster_type: CasterType::Pact,
                ability: Ability::Charisma,
            }),
        ),
        DndClass::Wizard => (
            vec![ClassResourceDefinition::new(
                "arcane_recovery",
                "Arcane Recovery",
                LongRest,
                ResourceColor::Blue,
                "Recover spell slots during short rest",
                vec![LevelScaling::new(1, 1)],
            )],
            Some(Spellcasting {
                caster_type: CasterType::Full,
                ability: Ability::Intelligence,
            }),
        ),
    };

    ClassConfig {
        class,
        resources,
        spellcasting,
    }
}

fn mystic_arcanum(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    unlock_level: u8,
) -> ClassResourceDefinition {
    ClassResourceDefinition::new(
        key,
        name,
        ResetCadence::LongRest,
        ResourceColor::Purple,
        description,
        vec![LevelScaling::new(unlock_level, 1)],
    )
}

// Spell slot progression tables

/// Full casters: bard, cleric, druid, sorcerer, wizard.
pub fn full_caster_slots(level: u8) -> Option<&'static [u8]> {
    const SLOTS: &[(u8, &[u8])] = &[
        (1, &[2]),
        (2, &[3]),
        (3, &[4, 2]),
        (4, &[4, 3]),
        (5, &[4, 3, 2]),
        (6, &[4, 3, 3]),
        (7, &[4, 3, 3, 1]),
        (8, &[4, 3, 3, 2]),
        (9, &[4, 3, 3, 3, 1]),
        (10, &[4, 3, 3, 3, 2]),
        (11, &[4, 3, 3, 3, 2, 1]),
        (12, &[4, 3, 3, 3, 2, 1]),
        (13, &[4, 3, 3, 3, 2, 1, 1]),
        (14, &[4, 3, 3, 3, 2, 1, 1]),
        (15, &[4, 3, 3, 3, 2, 1, 1, 1]),
        (16, &[4, 3, 3, 3, 2, 1, 1, 1]),
        (17, &[4, 3, 3, 3, 2, 1, 1, 1, 1]),
        (18, &[4, 3, 3, 3, 3, 1, 1, 1, 1]),
        (19, &[4, 3, 3, 3, 3, 2, 1, 1, 1]),
        (20, &[4, 3, 3, 3, 3, 2, 2, 1, 1]),
    ];

    SLOTS.iter().find(|(l, _)| *l == level).map(|(_, s)| *s)
}

/// Half casters (paladin, ranger) get no slots until level 2.
pub fn half_caster_slots(level: u8) -> Option<&'static [u8]> {
    const SLOTS: &[(u8, &[u8])] = &[
        (2, &[2]),
        (3, &[3]),
        (4, &[3]),
        (5, &[4, 2]),
        (6, &[4, 2]),
        (7, &[4, 3]),
        (8, &[4, 3]),
        (9, &[4, 3, 2]),
        (10, &[4, 3, 2]),
        (11, &[4, 3, 3]),
        (12, &[4, 3, 3]),
        (13, &[4, 3, 3, 1]),
        (14, &[4, 3, 3, 1]),
        (15, &[4, 3, 3, 2]),
        (16, &[4, 3, 3, 2]),
        (17, &[4, 3, 3, 3, 1]),
        (18, &[4, 3, 3, 3, 1]),
        (19, &[4, 3, 3, 3, 2]),
        (20, &[4, 3, 3, 3, 2]),
    ];

    SLOTS.iter().find(|(l, _)| *l == level).map(|(_, s)| *s)
}

/// Warlock pact magic as `(slot_count, slot_level)`.
pub fn warlock_pact_slots(level: u8) -> Option<(u8, u8)> {
    match level {
        1 => Some((1, 1)),
        2 => Some((2, 1)),
        3..=4 => Some((2, 2)),
        5..=6 => Some((2, 3)),
        7..=8 => Some((2, 4)),
        9..=10 => Some((2, 5)),
        11..=16 => Some((3, 5)),
        17..=20 => Some((4, 5)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_has_a_config() {
        for class in DndClass::ALL {
            assert_eq!(class_config(class).class, class);
        }
    }

    #[test]
    fn resource_keys_are_unique_within_class() {
        for class in DndClass::ALL {
            let config = class_config(class);
            let mut keys: Vec<_> = config.resources.iter().map(|r| r.resource_key).collect();
            let before = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), before, "{}", class);
        }
    }

    #[test]
    fn breakpoints_are_ordered_by_level() {
        for class in DndClass::ALL {
            for resource in class_config(class).resources {
                assert!(
                    resource
                        .level_scaling
                        .windows(2)
                        .all(|w| w[0].level < w[1].level),
                    "{} {}",
                    class,
                    resource.resource_key
                );
            }
        }
    }

    #[test]
    fn caster_tiers() {
        let tier = |c| class_config(c).spellcasting.map(|s| s.caster_type);
        assert_eq!(tier(DndClass::Wizard), Some(CasterType::Full));
        assert_eq!(tier(DndClass::Paladin), Some(CasterType::Half));
        assert_eq!(tier(DndClass::Warlock), Some(CasterType::Pact));
        assert_eq!(tier(DndClass::Fighter), None);
        assert_eq!(tier(DndClass::Rogue), None);
    }

    #[test]
    fn full_caster_spell_slots() {
        assert_eq!(full_caster_slots(1), Some(&[2][..]));
        assert_eq!(full_caster_slots(5), Some(&[4, 3, 2][..]));
        assert_eq!(full_caster_slots(20).map(|s| s.len()), Some(9));
        assert_eq!(full_caster_slots(21), None);
    }

    #[test]
    fn half_caster_spell_slots() {
        assert_eq!(half_caster_slots(1), None);
        assert_eq!(half_caster_slots(2), Some(&[2][..]));
        assert_eq!(half_caster_slots(5), Some(&[4, 2][..]));
        assert_eq!(half_caster_slots(20), Some(&[4, 3, 3, 3, 2][..]));
    }

    #[test]
    fn warlock_pact_progression() {
        assert_eq!(warlock_pact_slots(1), Some((1, 1)));
        assert_eq!(warlock_pact_slots(5), Some((2, 3)));
        assert_eq!(warlock_pact_slots(11), Some((3, 5)));
        assert_eq!(warlock_pact_slots(20), Some((4, 5)));
        assert_eq!(warlock_pact_slots(0), None);
    }
}
