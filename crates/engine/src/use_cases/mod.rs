//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area of the character sheet.
//! Every state change goes through [`CharacterMutator`], which loads the
//! record under a per-character lock, applies one domain operation, stamps
//! `updated_at` and saves. Refused operations are returned to the caller
//! without touching storage.

use std::sync::Arc;

use dashmap::DashMap;
use dndhelper_domain::{
    self as domain, migrate_to_current_schema, needs_migration, CharacterId, DomainError,
};
use tokio::sync::Mutex;

use crate::entities;
use crate::infrastructure::ports::{ClockPort, RepoError};

pub mod combat;
pub mod dice;
pub mod inventory;
pub mod management;
pub mod resources;

pub use combat::CombatUseCases;
pub use dice::DiceUseCases;
pub use inventory::InventoryUseCases;
pub use management::{CharacterManagement, CustomCharacterInput};
pub use resources::ResourceUseCases;

/// Shared error type for character use cases.
#[derive(Debug, thiserror::Error)]
pub enum CharacterOpError {
    #[error("Character not found: {id}")]
    NotFound { id: CharacterId },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// A character after an operation, plus what the operation reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub character: domain::Character,
    pub outcome: T,
}

/// Whether an operation changed the record and needs saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    Save,
    Skip,
}

impl Persist {
    pub fn when(changed: bool) -> Self {
        if changed {
            Self::Save
        } else {
            Self::Skip
        }
    }
}

/// Load-mutate-save under a per-character async lock.
///
/// Operations on different characters never contend; operations on the same
/// character run one at a time.
pub struct CharacterMutator {
    characters: Arc<entities::Character>,
    clock: Arc<dyn ClockPort>,
    locks: DashMap<CharacterId, Arc<Mutex<()>>>,
}

impl CharacterMutator {
    pub fn new(characters: Arc<entities::Character>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            characters,
            clock,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, id: CharacterId) -> Arc<Mutex<()>> {
        self.locks.entry(id).or_default().clone()
    }

    /// Read a character, failing with `NotFound` if it does not exist.
    pub async fn load(&self, id: CharacterId) -> Result<domain::Character, CharacterOpError> {
        self.characters
            .get(id)
            .await?
            .ok_or(CharacterOpError::NotFound { id })
    }

    /// Bring the stored record up to the current schema and save it, holding
    /// the character's lock so the write cannot clobber a concurrent mutation.
    /// `outcome` is true when this call wrote the upgrade.
    ///
    /// `updated_at` is left alone: a schema upgrade is not a user edit.
    pub async fn upgrade(&self, id: CharacterId) -> Result<Applied<bool>, CharacterOpError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let stored = self
            .characters
            .get_stored(id)
            .await?
            .ok_or(CharacterOpError::NotFound { id })?;
        if !needs_migration(&stored) {
            return Ok(Applied {
                character: stored,
                outcome: false,
            });
        }

        tracing::info!(character_id = %id, "Migrating character {}", stored.name());
        let migrated = migrate_to_current_schema(stored);
        self.characters.save(&migrated).await?;
        Ok(Applied {
            character: migrated,
            outcome: true,
        })
    }

    /// Apply `op` to one character. The record is saved (with a fresh
    /// `updated_at`) only when `op` asks for it.
    pub async fn mutate<T, F>(&self, id: CharacterId, op: F) -> Result<Applied<T>, CharacterOpError>
    where
        F: FnOnce(&mut domain::Character) -> Result<(T, Persist), CharacterOpError> + Send,
        T: Send,
    {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut character = self.load(id).await?;
        let (outcome, persist) = op(&mut character)?;
        if persist == Persist::Save {
            character.touch(self.clock.now());
            self.characters.save(&character).await?;
        }

        Ok(Applied { character, outcome })
    }

    /// Store a brand-new character.
    pub async fn insert(&self, character: &domain::Character) -> Result<(), CharacterOpError> {
        let lock = self.lock_for(character.id());
        let _guard = lock.lock().await;
        self.characters.save(character).await?;
        Ok(())
    }

    /// Delete a character, failing with `NotFound` if it does not exist.
    pub async fn remove(&self, id: CharacterId) -> Result<domain::Character, CharacterOpError> {
        let lock = self.lock_for(id);
        let guard = lock.lock().await;

        let character = self.load(id).await?;
        self.characters.delete(id).await?;

        drop(guard);
        self.locks.remove(&id);
        Ok(character)
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}

/// Container for all character use cases.
pub struct UseCases {
    pub management: CharacterManagement,
    pub combat: CombatUseCases,
    pub resources: ResourceUseCases,
    pub inventory: InventoryUseCases,
    pub dice: DiceUseCases,
}
