//! Character entity operations.

use std::sync::Arc;

use dndhelper_domain::{self as domain, migrate_characters, migrate_to_current_schema, CharacterId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

/// Character entity operations.
///
/// `get` and `list` hand out records in the current schema but never write.
/// Persisting an upgrade is left to callers holding the character's lock
/// (see `CharacterMutator::upgrade`), which read through `get_stored`.
pub struct Character {
    repo: Arc<dyn CharacterRepo>,
}

impl Character {
    pub fn new(repo: Arc<dyn CharacterRepo>) -> Self {
        Self { repo }
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    pub async fn get(&self, id: CharacterId) -> Result<Option<domain::Character>, RepoError> {
        Ok(self.repo.get(id).await?.map(migrate_to_current_schema))
    }

    pub async fn list(&self) -> Result<Vec<domain::Character>, RepoError> {
        Ok(migrate_characters(self.repo.list().await?))
    }

    /// The record exactly as stored, possibly in an older schema.
    pub async fn get_stored(&self, id: CharacterId) -> Result<Option<domain::Character>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn list_stored(&self) -> Result<Vec<domain::Character>, RepoError> {
        self.repo.list().await
    }

    pub async fn save(&self, character: &domain::Character) -> Result<(), RepoError> {
        self.repo.save(character).await
    }

    pub async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCharacterRepo;
    use chrono::{TimeZone, Utc};
    use dndhelper_domain::CharacterTemplate;
    use mockall::predicate::*;

    fn legacy_fighter() -> domain::Character {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        domain::Character::create(CharacterTemplate::Fighter.build(None).unwrap(), now)
            .with_resources(None)
    }

    #[tokio::test]
    async fn get_migrates_without_writing() {
        let legacy = legacy_fighter();
        let id = legacy.id();
        let updated_at = legacy.updated_at();

        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(legacy.clone())));
        repo.expect_save().never();

        let entity = Character::new(Arc::new(repo));
        let character = entity.get(id).await.unwrap().unwrap();

        assert!(character.resources().is_some());
        assert_eq!(character.updated_at(), updated_at);
    }

    #[tokio::test]
    async fn get_stored_returns_the_raw_record() {
        let legacy = legacy_fighter();
        let id = legacy.id();

        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(legacy.clone())));

        let entity = Character::new(Arc::new(repo));
        let stored = entity.get_stored(id).await.unwrap().unwrap();

        assert!(stored.resources().is_none());
    }

    #[tokio::test]
    async fn list_migrates_each_legacy_record_without_writing() {
        let legacy = legacy_fighter();
        let current = migrate_to_current_schema(legacy_fighter());

        let mut repo = MockCharacterRepo::new();
        repo.expect_list()
            .returning(move || Ok(vec![legacy.clone(), current.clone()]));
        repo.expect_save().never();

        let entity = Character::new(Arc::new(repo));
        let characters = entity.list().await.unwrap();

        assert_eq!(characters.len(), 2);
        assert!(characters.iter().all(|c| c.resources().is_some()));
    }
}
