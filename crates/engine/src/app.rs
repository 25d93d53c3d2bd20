//! Application state and composition.

use std::sync::Arc;

use crate::entities;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::{AppConfig, StoreKind},
    json_store::JsonFileCharacterRepo,
    memory_repo::InMemoryCharacterRepo,
    ports::{CharacterRepo, ClockPort, RandomPort},
};
use crate::use_cases::{
    self, CharacterManagement, CharacterMutator, CombatUseCases, DiceUseCases, InventoryUseCases,
    ResourceUseCases,
};

/// Main application state.
///
/// Holds the storage port, the entity layer over it, and all use cases.
pub struct App {
    pub repositories: Repositories,
    pub entities: Entities,
    pub use_cases: use_cases::UseCases,
}

/// Container for storage ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for entity modules.
pub struct Entities {
    pub character: Arc<entities::Character>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let character = Arc::new(entities::Character::new(character_repo.clone()));
        let mutator = Arc::new(CharacterMutator::new(character.clone(), clock));

        let use_cases = use_cases::UseCases {
            management: CharacterManagement::new(character.clone(), mutator.clone()),
            combat: CombatUseCases::new(mutator.clone()),
            resources: ResourceUseCases::new(mutator.clone()),
            inventory: InventoryUseCases::new(mutator),
            dice: DiceUseCases::new(random),
        };

        Self {
            repositories: Repositories {
                character: character_repo,
            },
            entities: Entities { character },
            use_cases,
        }
    }

    /// Wire the app against the store named in `config`, with the system
    /// clock and random source.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            open_character_repo(config),
            Arc::new(SystemClock),
            Arc::new(SystemRandom),
        )
    }
}

/// Open the character store selected by configuration. The JSON store is
/// created lazily on first save.
pub fn open_character_repo(config: &AppConfig) -> Arc<dyn CharacterRepo> {
    match config.store {
        StoreKind::Memory => Arc::new(InMemoryCharacterRepo::new()),
        StoreKind::Json => Arc::new(JsonFileCharacterRepo::new(config.data_path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ScriptedRandom;
    use crate::test_fixtures::{fixed_clock, fixed_time};
    use dndhelper_domain::{CharacterTemplate, RollMode};

    fn app_with_memory_store() -> App {
        App::new(
            Arc::new(InMemoryCharacterRepo::new()),
            fixed_clock(fixed_time()),
            Arc::new(ScriptedRandom::new(vec![4])),
        )
    }

    #[tokio::test]
    async fn use_cases_share_one_store() {
        let app = app_with_memory_store();

        let created = app
            .use_cases
            .management
            .create_from_template(CharacterTemplate::Cleric, None)
            .await
            .unwrap();
        app.use_cases.combat.take_damage(created.id(), 3).await.unwrap();

        let stored = app
            .repositories
            .character
            .get(created.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hit_points().current(), 7);
        assert_eq!(app.entities.character.list().await.unwrap().len(), 1);
    }

    #[test]
    fn dice_use_the_injected_random_source() {
        let app = app_with_memory_store();
        let roll = app.use_cases.dice.roll("d6+1", RollMode::Normal, None).unwrap();
        assert_eq!(roll.total, 5);
    }

    #[tokio::test]
    async fn json_store_is_selected_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store: StoreKind::Json,
            data_path: dir.path().join("characters.json"),
        };
        let app = App::from_config(&config);

        app.use_cases
            .management
            .create_from_template(CharacterTemplate::Rogue, None)
            .await
            .unwrap();

        assert!(config.data_path.exists());
    }
}
