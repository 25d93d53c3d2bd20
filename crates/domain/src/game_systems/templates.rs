//! Prebuilt level-1 characters and the draft type used to create any character.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::dnd5e::{calculate_max_hp, hit_die, DndClass, MAX_LEVEL};
use crate::entities::Inventory;
use crate::error::DomainError;
use crate::value_objects::{
    proficiency_bonus, Ability, AbilityScores, CharacterName, HitDice, HitPoints,
};

/// Walking speed used when nothing else is known.
pub const DEFAULT_SPEED: u32 = 30;

/// Everything needed to create a character, minus identity and timestamps.
///
/// Resources are not part of the draft; they are derived at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCharacter {
    pub name: CharacterName,
    pub race: String,
    pub class_name: String,
    pub subclass: Option<String>,
    pub level: u8,
    pub background: String,
    pub alignment: String,
    pub experience_points: u32,
    pub ability_scores: AbilityScores,
    pub proficiency_bonus: i32,
    pub hit_points: HitPoints,
    pub hit_dice: HitDice,
    pub armor_class: i32,
    pub initiative: i32,
    pub speed: u32,
    pub skill_proficiencies: Vec<String>,
    pub saving_throw_proficiencies: Vec<Ability>,
    pub inventory: Inventory,
}

impl NewCharacter {
    /// Draft for a hand-built character. Derived stats follow the class hit die
    /// and DEX/CON modifiers: AC 10 + DEX, initiative DEX, speed 30.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the level is outside 1-20 or the
    /// race is blank.
    pub fn custom(
        name: CharacterName,
        race: impl Into<String>,
        class_name: &str,
        subclass: Option<String>,
        level: u8,
        ability_scores: AbilityScores,
    ) -> Result<Self, DomainError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(DomainError::validation(format!(
                "Level must be between 1 and {}, got {}",
                MAX_LEVEL, level
            )));
        }
        let race = race.into().trim().to_string();
        if race.is_empty() {
            return Err(DomainError::validation("Race cannot be empty"));
        }

        let class_name = display_class_name(class_name);
        let die = hit_die(&class_name);
        let dex = ability_scores.modifier(Ability::Dexterity);
        let con = ability_scores.modifier(Ability::Constitution);
        let max_hp = calculate_max_hp(level, die, con);

        Ok(Self {
            name,
            race,
            class_name,
            subclass: subclass
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            level,
            background: String::new(),
            alignment: String::new(),
            experience_points: 0,
            ability_scores,
            proficiency_bonus: proficiency_bonus(level),
            hit_points: HitPoints::full(max_hp),
            hit_dice: HitDice::full(u32::from(level), die),
            armor_class: 10 + dex,
            initiative: dex,
            speed: DEFAULT_SPEED,
            skill_proficiencies: Vec::new(),
            saving_throw_proficiencies: Vec::new(),
            inventory: Inventory::default(),
        })
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = alignment.into();
        self
    }

    pub fn with_skill_proficiencies(mut self, skills: Vec<String>) -> Self {
        self.skill_proficiencies = skills;
        self
    }

    pub fn with_saving_throw_proficiencies(mut self, abilities: Vec<Ability>) -> Self {
        self.saving_throw_proficiencies = abilities;
        self
    }
}

/// Known classes are stored display-cased ("Fighter"); anything else is kept as typed.
fn display_class_name(class_name: &str) -> String {
    class_name
        .parse::<DndClass>()
        .map(|c| c.display_name().to_string())
        .unwrap_or_else(|_| class_name.trim().to_string())
}

/// Ready-made level-1 characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterTemplate {
    Fighter,
    Wizard,
    Rogue,
    Cleric,
}

struct TemplateStats {
    race: &'static str,
    class: DndClass,
    subclass: &'static str,
    background: &'static str,
    alignment: &'static str,
    scores: [i32; 6],
    hp: u32,
    armor_class: i32,
    initiative: i32,
    speed: u32,
    skills: &'static [&'static str],
    saves: [Ability; 2],
}

impl CharacterTemplate {
    pub const ALL: [CharacterTemplate; 4] = [
        CharacterTemplate::Fighter,
        CharacterTemplate::Wizard,
        CharacterTemplate::Rogue,
        CharacterTemplate::Cleric,
    ];

    pub fn class(self) -> DndClass {
        self.stats().class
    }

    fn stats(self) -> TemplateStats {
        match self {
            Self::Fighter => TemplateStats {
                race: "Human",
                class: DndClass::Fighter,
                subclass: "Champion",
                background: "Soldier",
                alignment: "Lawful Neutral",
                scores: [16, 14, 15, 10, 12, 8],
                hp: 12,
                // chain mail 16 + DEX
                armor_class: 18,
                initiative: 2,
                speed: 30,
                skills: &["Athletics", "Intimidation"],
                saves: [Ability::Strength, Ability::Constitution],
            },
            Self::Wizard => TemplateStats {
                race: "High Elf",
                class: DndClass::Wizard,
                subclass: "School of Evocation",
                background: "Sage",
                alignment: "Neutral Good",
                scores: [8, 14, 13, 16, 12, 10],
                hp: 7,
                armor_class: 12,
                initiative: 2,
                speed: 30,
                skills: &["Arcana", "History", "Investigation"],
                saves: [Ability::Intelligence, Ability::Wisdom],
            },
            Self::Rogue => TemplateStats {
                race: "Halfling",
                class: DndClass::Rogue,
                subclass: "Thief",
                background: "Criminal",
                alignment: "Chaotic Neutral",
                scores: [10, 17, 14, 13, 12, 10],
                hp: 10,
                armor_class: 15,
                initiative: 3,
                speed: 25,
                skills: &["Stealth", "Sleight of Hand", "Deception", "Acrobatics"],
                saves: [Ability::Dexterity, Ability::Intelligence],
            },
            Self::Cleric => TemplateStats {
                race: "Dwarf",
                class: DndClass::Cleric,
                subclass: "Life Domain",
                background: "Acolyte",
                alignment: "Lawful Good",
                scores: [14, 10, 15, 10, 16, 12],
                hp: 10,
                // chain mail 16 + shield 2
                armor_class: 18,
                initiative: 0,
                speed: 25,
                skills: &["Medicine", "Religion"],
                saves: [Ability::Wisdom, Ability::Charisma],
            },
        }
    }

    /// Draft for this template. Without a name override the character is
    /// called "<Class> Template".
    pub fn build(self, name: Option<CharacterName>) -> Result<NewCharacter, DomainError> {
        let stats = self.stats();
        let name = match name {
            Some(name) => name,
            None => CharacterName::new(format!("{} Template", stats.class.display_name()))?,
        };
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = stats.scores;

        Ok(NewCharacter {
            name,
            race: stats.race.to_string(),
            class_name: stats.class.display_name().to_string(),
            subclass: Some(stats.subclass.to_string()),
            level: 1,
            background: stats.background.to_string(),
            alignment: stats.alignment.to_string(),
            experience_points: 0,
            ability_scores: AbilityScores::new(
                strength,
                dexterity,
                constitution,
                intelligence,
                wisdom,
                charisma,
            ),
            proficiency_bonus: proficiency_bonus(1),
            hit_points: HitPoints::full(stats.hp),
            hit_dice: HitDice::full(1, stats.class.hit_die()),
            armor_class: stats.armor_class,
            initiative: stats.initiative,
            speed: stats.speed,
            skill_proficiencies: stats.skills.iter().map(|s| s.to_string()).collect(),
            saving_throw_proficiencies: stats.saves.to_vec(),
            inventory: Inventory::default(),
        })
    }
}

impl fmt::Display for CharacterTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class().display_name())
    }
}

impl FromStr for CharacterTemplate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fighter" => Ok(Self::Fighter),
            "wizard" => Ok(Self::Wizard),
            "rogue" => Ok(Self::Rogue),
            "cleric" => Ok(Self::Cleric),
            _ => Err(DomainError::parse(format!("Unknown template: {}", s))),
        }
    }
}
