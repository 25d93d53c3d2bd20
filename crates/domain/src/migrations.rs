//! Upgrades for character records written by older versions.
//!
//! Every step must be idempotent: records are migrated on every load.

use crate::aggregates::Character;
use crate::game_systems::initialize_resources;

/// Bring one record up to the current shape.
///
/// Records that already carry a resource block are returned untouched;
/// records without one get resources derived from their class, level,
/// ability scores and subclass. An unknown class yields an empty block,
/// which still marks the record as migrated.
pub fn migrate_to_current_schema(mut character: Character) -> Character {
    if character.resources().is_some() {
        return character;
    }

    let resources = initialize_resources(
        character.class_name(),
        character.level(),
        character.ability_scores(),
        character.subclass(),
    );
    character.attach_resources(resources);
    character
}

/// Whether [`migrate_to_current_schema`] would change this record.
pub fn needs_migration(character: &Character) -> bool {
    character.resources().is_none()
}

pub fn migrate_characters(characters: Vec<Character>) -> Vec<Character> {
    characters
        .into_iter()
        .map(migrate_to_current_schema)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::{CharacterTemplate, NewCharacter};
    use crate::value_objects::{AbilityScores, CharacterName};
    use chrono::{TimeZone, Utc};

    fn legacy(template: CharacterTemplate) -> Character {
        let draft = template.build(None).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Character::create(draft, now).with_resources(None)
    }

    #[test]
    fn attaches_resources_to_legacy_record() {
        let character = legacy(CharacterTemplate::Cleric);
        assert!(needs_migration(&character));

        let migrated = migrate_to_current_schema(character);

        assert!(!needs_migration(&migrated));
        let resources = migrated.resources().unwrap();
        assert_eq!(resources.spell_slots().and_then(|s| s.slot(1)).map(|s| s.max()), Some(2));
    }

    #[test]
    fn migration_is_idempotent() {
        let once = migrate_to_current_schema(legacy(CharacterTemplate::Fighter));
        let twice = migrate_to_current_schema(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn existing_resources_are_not_rebuilt() {
        let mut character = migrate_to_current_schema(legacy(CharacterTemplate::Fighter));
        character.use_resource("second_wind", None);
        let spent = character.clone();

        assert_eq!(migrate_to_current_schema(character), spent);
    }

    #[test]
    fn unknown_class_migrates_to_empty_block() {
        let name = CharacterName::new("Tinker").unwrap();
        let draft =
            NewCharacter::custom(name, "Gnome", "Artificer", None, 3, AbilityScores::default())
                .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let character = Character::create(draft, now).with_resources(None);

        let migrated = migrate_to_current_schema(character);

        assert!(migrated.resources().map(|r| r.is_empty()).unwrap_or(false));
    }

    #[test]
    fn migrates_every_record() {
        let migrated = migrate_characters(vec![
            legacy(CharacterTemplate::Wizard),
            legacy(CharacterTemplate::Rogue),
        ]);
        assert!(migrated.iter().all(|c| !needs_migration(c)));
    }
}
