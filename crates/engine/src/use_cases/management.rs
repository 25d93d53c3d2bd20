//! Character management: listing, creation, renaming, leveling and deletion.

use std::sync::Arc;

use dndhelper_domain::{
    self as domain, Ability, AbilityScores, CharacterId, CharacterName, CharacterTemplate,
    needs_migration, LevelChange, NewCharacter,
};

use super::{Applied, CharacterMutator, CharacterOpError, Persist};
use crate::entities;

/// Input for a hand-built character.
#[derive(Debug, Clone)]
pub struct CustomCharacterInput {
    pub name: String,
    pub race: String,
    pub class_name: String,
    pub subclass: Option<String>,
    pub level: u8,
    pub ability_scores: AbilityScores,
    pub background: Option<String>,
    pub alignment: Option<String>,
    pub skill_proficiencies: Vec<String>,
    pub saving_throw_proficiencies: Vec<Ability>,
}

pub struct CharacterManagement {
    characters: Arc<entities::Character>,
    mutator: Arc<CharacterMutator>,
}

impl CharacterManagement {
    pub fn new(characters: Arc<entities::Character>, mutator: Arc<CharacterMutator>) -> Self {
        Self {
            characters,
            mutator,
        }
    }

    /// All characters, most recently updated first. Older records come back
    /// upgraded in memory; nothing is written.
    pub async fn list(&self) -> Result<Vec<domain::Character>, CharacterOpError> {
        let mut characters = self.characters.list().await?;
        characters.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(characters)
    }

    /// Fetch one character, saving the schema upgrade if it needed one.
    pub async fn get(&self, id: CharacterId) -> Result<domain::Character, CharacterOpError> {
        Ok(self.mutator.upgrade(id).await?.character)
    }

    /// Persist the schema upgrade of every stored record that needs one.
    /// Returns how many records were rewritten.
    pub async fn migrate_all(&self) -> Result<usize, CharacterOpError> {
        let pending: Vec<CharacterId> = self
            .characters
            .list_stored()
            .await?
            .iter()
            .filter(|c| needs_migration(c))
            .map(|c| c.id())
            .collect();

        let mut migrated = 0;
        for id in pending {
            match self.mutator.upgrade(id).await {
                Ok(applied) if applied.outcome => migrated += 1,
                Ok(_) => {}
                // Deleted since the listing
                Err(CharacterOpError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        if migrated > 0 {
            tracing::info!(count = migrated, "Migrated stored characters");
        }
        Ok(migrated)
    }

    pub async fn create_from_template(
        &self,
        template: CharacterTemplate,
        name: Option<String>,
    ) -> Result<domain::Character, CharacterOpError> {
        let name = name.map(CharacterName::new).transpose()?;
        let draft = template.build(name)?;
        self.create(draft).await
    }

    pub async fn create_custom(
        &self,
        input: CustomCharacterInput,
    ) -> Result<domain::Character, CharacterOpError> {
        let name = CharacterName::new(input.name)?;
        let mut draft = NewCharacter::custom(
            name,
            input.race,
            &input.class_name,
            input.subclass,
            input.level,
            input.ability_scores,
        )?
        .with_skill_proficiencies(input.skill_proficiencies)
        .with_saving_throw_proficiencies(input.saving_throw_proficiencies);
        if let Some(background) = input.background {
            draft = draft.with_background(background);
        }
        if let Some(alignment) = input.alignment {
            draft = draft.with_alignment(alignment);
        }
        self.create(draft).await
    }

    async fn create(&self, draft: NewCharacter) -> Result<domain::Character, CharacterOpError> {
        let character = domain::Character::create(draft, self.mutator.now());
        self.mutator.insert(&character).await?;

        tracing::info!(
            character_id = %character.id(),
            class = %character.class_name(),
            level = character.level(),
            "Created character {}",
            character.name()
        );
        Ok(character)
    }

    pub async fn rename(
        &self,
        id: CharacterId,
        name: &str,
    ) -> Result<domain::Character, CharacterOpError> {
        let name = CharacterName::new(name)?;
        let applied = self
            .mutator
            .mutate(id, |character| {
                let changed = character.name() != &name;
                character.rename(name);
                Ok(((), Persist::when(changed)))
            })
            .await?;
        Ok(applied.character)
    }

    pub async fn set_level(
        &self,
        id: CharacterId,
        level: u8,
    ) -> Result<Applied<LevelChange>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let change = character.set_level(level)?;
                let changed = matches!(change, LevelChange::Changed { .. });
                Ok((change, Persist::when(changed)))
            })
            .await?;

        if let LevelChange::Changed {
            from,
            to,
            ref resources_unlocked,
            ..
        } = applied.outcome
        {
            tracing::info!(
                character_id = %id,
                from,
                to,
                unlocked = ?resources_unlocked,
                "Level changed"
            );
        }
        Ok(applied)
    }

    pub async fn delete(&self, id: CharacterId) -> Result<(), CharacterOpError> {
        let removed = self.mutator.remove(id).await?;
        tracing::info!(character_id = %id, "Deleted character {}", removed.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_repo::InMemoryCharacterRepo;
    use crate::infrastructure::ports::{CharacterRepo, MockCharacterRepo, MockClockPort};
    use crate::test_fixtures::{characters, fixed_clock, fixed_time, later_time, load_fixture};
    use chrono::Duration;
    use dndhelper_domain::DomainError;
    use mockall::predicate::*;

    fn management_over(repo: Arc<dyn CharacterRepo>, now: chrono::DateTime<chrono::Utc>) -> CharacterManagement {
        let characters = Arc::new(entities::Character::new(repo));
        let mutator = Arc::new(CharacterMutator::new(characters.clone(), fixed_clock(now)));
        CharacterManagement::new(characters, mutator)
    }

    #[tokio::test]
    async fn create_from_template_saves_with_resources() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_save()
            .withf(|c| {
                c.name().as_str() == "Rook"
                    && c.class_name() == "Fighter"
                    && c.resources().is_some_and(|r| r.resource("second_wind").is_some())
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(fixed_time);
        let characters = Arc::new(entities::Character::new(Arc::new(repo)));
        let mutator = Arc::new(CharacterMutator::new(characters.clone(), Arc::new(clock)));
        let management = CharacterManagement::new(characters, mutator);

        let created = management
            .create_from_template(CharacterTemplate::Fighter, Some("Rook".to_string()))
            .await
            .unwrap();

        assert_eq!(created.created_at(), fixed_time());
        assert_eq!(created.updated_at(), fixed_time());
    }

    #[tokio::test]
    async fn create_from_template_rejects_blank_name() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_save().never();
        let management = management_over(Arc::new(repo), fixed_time());

        let err = management
            .create_from_template(CharacterTemplate::Wizard, Some("   ".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, CharacterOpError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn create_custom_applies_optional_details() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let management = management_over(repo.clone(), fixed_time());

        let created = management
            .create_custom(CustomCharacterInput {
                name: "Lyra".to_string(),
                race: "Half-Elf".to_string(),
                class_name: "bard".to_string(),
                subclass: Some("College of Lore".to_string()),
                level: 5,
                ability_scores: AbilityScores::new(8, 14, 12, 10, 10, 16),
                background: Some("Entertainer".to_string()),
                alignment: None,
                skill_proficiencies: vec!["Performance".to_string()],
                saving_throw_proficiencies: vec![Ability::Dexterity, Ability::Charisma],
            })
            .await
            .unwrap();

        assert_eq!(created.class_name(), "Bard");
        assert_eq!(created.background(), "Entertainer");
        assert_eq!(created.alignment(), "");
        assert_eq!(created.proficiency_bonus(), 3);
        let resources = created.resources().unwrap();
        assert_eq!(resources.resource("bardic_inspiration").unwrap().max(), 3);
        assert!(repo.get(created.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_custom_rejects_level_zero() {
        let management = management_over(Arc::new(InMemoryCharacterRepo::new()), fixed_time());

        let result = management
            .create_custom(CustomCharacterInput {
                name: "Nobody".to_string(),
                race: "Human".to_string(),
                class_name: "Fighter".to_string(),
                subclass: None,
                level: 0,
                ability_scores: AbilityScores::default(),
                background: None,
                alignment: None,
                skill_proficiencies: Vec::new(),
                saving_throw_proficiencies: Vec::new(),
            })
            .await;

        assert!(matches!(result, Err(CharacterOpError::Domain(_))));
    }

    #[tokio::test]
    async fn list_returns_most_recently_updated_first() {
        let older = characters::fighter();
        let mut newer = characters::wizard();
        newer.touch(fixed_time() + Duration::hours(1));
        let (older_id, newer_id) = (older.id(), newer.id());
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([older, newer]));
        let management = management_over(repo, later_time());

        let listed = management.list().await.unwrap();

        let ids: Vec<_> = listed.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![newer_id, older_id]);
    }

    #[tokio::test]
    async fn list_migrates_legacy_fixture_records_in_memory() {
        let legacy: Vec<domain::Character> = load_fixture("characters/legacy_roster.json");
        assert!(legacy.iter().all(|c| c.resources().is_none()));
        let repo = Arc::new(InMemoryCharacterRepo::with_characters(legacy));
        let management = management_over(repo.clone(), later_time());

        let listed = management.list().await.unwrap();

        assert_eq!(listed.len(), 2);
        // Vex was updated later, so comes first
        assert_eq!(listed[0].name().as_str(), "Vex");
        let pact = listed[0].resources().unwrap().pact_magic().unwrap();
        assert_eq!((pact.slot_level(), pact.max()), (3, 2));
        let cleric = &listed[1];
        assert!(cleric.has_condition("Poisoned"));
        assert!(cleric.resources().unwrap().resource("channel_divinity").is_some());

        for stored in repo.list().await.unwrap() {
            assert!(stored.resources().is_none(), "listing must not write");
        }
    }

    #[tokio::test]
    async fn migrate_all_saves_legacy_records_once() {
        let legacy: Vec<domain::Character> = load_fixture("characters/legacy_roster.json");
        let stamps: Vec<_> = legacy.iter().map(|c| (c.id(), c.updated_at())).collect();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters(legacy));
        let management = management_over(repo.clone(), later_time());

        assert_eq!(management.migrate_all().await.unwrap(), 2);
        assert_eq!(management.migrate_all().await.unwrap(), 0);

        for (id, updated_at) in stamps {
            let stored = repo.get(id).await.unwrap().unwrap();
            assert!(stored.resources().is_some());
            assert_eq!(stored.updated_at(), updated_at);
        }
    }

    #[tokio::test]
    async fn get_saves_the_upgrade_of_a_legacy_record() {
        let legacy = characters::cleric().with_resources(None);
        let id = legacy.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([legacy]));
        let management = management_over(repo.clone(), later_time());

        let fetched = management.get(id).await.unwrap();

        assert!(fetched.resources().is_some());
        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.resources(), fetched.resources());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let id = CharacterId::new();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get().with(eq(id)).returning(|_| Ok(None));
        let management = management_over(Arc::new(repo), fixed_time());

        assert!(matches!(
            management.get(id).await,
            Err(CharacterOpError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn rename_to_same_name_does_not_save() {
        let fighter = characters::fighter();
        let id = fighter.id();
        let current = fighter.name().as_str().to_string();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(fighter.clone())));
        repo.expect_save().never();
        let management = management_over(Arc::new(repo), later_time());

        let renamed = management.rename(id, &format!("  {}  ", current)).await.unwrap();

        assert_eq!(renamed.updated_at(), fixed_time());
    }

    #[tokio::test]
    async fn rename_stamps_and_saves() {
        let fighter = characters::fighter();
        let id = fighter.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([fighter]));
        let management = management_over(repo.clone(), later_time());

        management.rename(id, "Sir Rook").await.unwrap();

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.name().as_str(), "Sir Rook");
        assert_eq!(stored.updated_at(), later_time());
    }

    #[tokio::test]
    async fn set_level_reports_unlocked_resources() {
        let cleric = characters::cleric();
        let id = cleric.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([cleric]));
        let management = management_over(repo.clone(), later_time());

        let applied = management.set_level(id, 6).await.unwrap();

        match applied.outcome {
            LevelChange::Changed {
                from,
                to,
                proficiency_bonus,
                resources_unlocked,
                ..
            } => {
                assert_eq!((from, to, proficiency_bonus), (1, 6, 3));
                assert!(resources_unlocked.contains(&"channel_divinity".to_string()));
            }
            other => panic!("expected a level change, got {:?}", other),
        }
        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.level(), 6);
        assert_eq!(stored.hit_dice().total(), 6);
    }

    #[tokio::test]
    async fn set_level_out_of_range_is_domain_error() {
        let fighter = characters::fighter();
        let id = fighter.id();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(fighter.clone())));
        repo.expect_save().never();
        let management = management_over(Arc::new(repo), later_time());

        let err = management.set_level(id, 21).await.unwrap_err();

        assert!(matches!(err, CharacterOpError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_is_not_found() {
        let fighter = characters::fighter();
        let id = fighter.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([fighter]));
        let management = management_over(repo.clone(), later_time());

        management.delete(id).await.unwrap();

        assert!(repo.get(id).await.unwrap().is_none());
        assert!(matches!(
            management.delete(id).await,
            Err(CharacterOpError::NotFound { .. })
        ));
    }
}
