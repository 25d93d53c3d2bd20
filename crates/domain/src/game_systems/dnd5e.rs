//! D&D 5th Edition class data: hit dice, hit point progression, caster tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::DieType;

/// Highest character level the progression tables cover.
pub const MAX_LEVEL: u8 = 20;

/// The twelve core classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DndClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl DndClass {
    pub const ALL: [DndClass; 12] = [
        DndClass::Barbarian,
        DndClass::Bard,
        DndClass::Cleric,
        DndClass::Druid,
        DndClass::Fighter,
        DndClass::Monk,
        DndClass::Paladin,
        DndClass::Ranger,
        DndClass::Rogue,
        DndClass::Sorcerer,
        DndClass::Warlock,
        DndClass::Wizard,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Barbarian => "Barbarian",
            Self::Bard => "Bard",
            Self::Cleric => "Cleric",
            Self::Druid => "Druid",
            Self::Fighter => "Fighter",
            Self::Monk => "Monk",
            Self::Paladin => "Paladin",
            Self::Ranger => "Ranger",
            Self::Rogue => "Rogue",
            Self::Sorcerer => "Sorcerer",
            Self::Warlock => "Warlock",
            Self::Wizard => "Wizard",
        }
    }

    pub fn hit_die(self) -> DieType {
        match self {
            Self::Barbarian => DieType::D12,
            Self::Fighter | Self::Paladin | Self::Ranger => DieType::D10,
            Self::Bard | Self::Cleric | Self::Druid | Self::Monk | Self::Rogue | Self::Warlock => {
                DieType::D8
            }
            Self::Sorcerer | Self::Wizard => DieType::D6,
        }
    }
}

impl fmt::Display for DndClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DndClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().to_lowercase() == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown class: {}", s)))
    }
}

/// Hit die for a free-text class name; unknown classes default to d8.
pub fn hit_die(class_name: &str) -> DieType {
    class_name
        .parse::<DndClass>()
        .map(DndClass::hit_die)
        .unwrap_or(DieType::D8)
}

/// Fixed-average max HP: first level takes the full die plus CON, every
/// later level adds floor(die / 2) + 1 plus CON. Never below 1.
pub fn calculate_max_hp(level: u8, hit_die: DieType, constitution_modifier: i32) -> u32 {
    let die = hit_die.sides() as i32;
    let first_level_hp = die + constitution_modifier;
    let avg_roll = hit_die.average_roll() as i32;
    let subsequent_hp = (i32::from(level.max(1)) - 1) * (avg_roll + constitution_modifier);

    (first_level_hp + subsequent_hp).max(1) as u32
}

/// How a class progresses through spell slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasterType {
    /// Full progression (bard, cleric, druid, sorcerer, wizard)
    Full,
    /// Half progression starting at level 2 (paladin, ranger)
    Half,
    /// Warlock pact magic: one pool of same-level slots
    Pact,
}
