//! In-memory character repository for development and testing.
//!
//! Nothing is persisted; the store lives as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use dndhelper_domain::{Character, CharacterId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CharacterRepo, RepoError};

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store.
    pub fn with_characters(characters: impl IntoIterator<Item = Character>) -> Self {
        Self {
            characters: RwLock::new(characters.into_iter().map(|c| (c.id(), c)).collect()),
        }
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        Ok(self.characters.read().await.values().cloned().collect())
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters
            .write()
            .await
            .insert(character.id(), character.clone());
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.characters.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dndhelper_domain::CharacterTemplate;

    fn character(template: CharacterTemplate) -> Character {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Character::create(template.build(None).unwrap(), now)
    }

    #[tokio::test]
    async fn save_get_delete() {
        let repo = InMemoryCharacterRepo::new();
        let fighter = character(CharacterTemplate::Fighter);

        repo.save(&fighter).await.unwrap();
        assert_eq!(repo.get(fighter.id()).await.unwrap(), Some(fighter.clone()));

        repo.delete(fighter.id()).await.unwrap();
        assert_eq!(repo.get(fighter.id()).await.unwrap(), None);
        // Missing ids delete quietly
        repo.delete(fighter.id()).await.unwrap();
    }

    #[tokio::test]
    async fn save_replaces_by_id() {
        let mut wizard = character(CharacterTemplate::Wizard);
        let repo = InMemoryCharacterRepo::with_characters([wizard.clone()]);

        wizard.take_damage(3);
        repo.save(&wizard).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].hit_points().current(), 4);
    }
}
