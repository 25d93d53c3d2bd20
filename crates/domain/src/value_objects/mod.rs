//! Value objects: immutable-by-default building blocks of the character record.

mod ability;
mod dice;
mod names;
mod vitals;

pub use ability::{ability_modifier, proficiency_bonus, Ability, AbilityScores};
pub use dice::{DiceFormula, DiceParseError, DiceRoll, DieType, RollMode};
pub use names::CharacterName;
pub use vitals::{DeathSaveKind, DeathSaves, HitDice, HitPoints, MAX_DEATH_SAVES};
