//! Storage port for character records.

use async_trait::async_trait;
use dndhelper_domain::{Character, CharacterId};

use super::RepoError;

/// Keyed character store. Implementations persist whole records; partial
/// updates are not part of the contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Every stored character, in no particular order.
    async fn list(&self) -> Result<Vec<Character>, RepoError>;
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    /// Insert or replace by id.
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    /// Deleting a missing id is not an error.
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
}
