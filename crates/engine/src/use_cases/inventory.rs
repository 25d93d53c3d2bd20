//! Inventory operations addressed by character id.

use std::sync::Arc;

use dndhelper_domain::{
    AttunementOutcome, CharacterId, DomainError, EncumbranceReport, EquipOutcome, InventoryItem,
    ItemId,
};

use super::{Applied, CharacterMutator, CharacterOpError, Persist};

pub struct InventoryUseCases {
    mutator: Arc<CharacterMutator>,
}

impl InventoryUseCases {
    pub fn new(mutator: Arc<CharacterMutator>) -> Self {
        Self { mutator }
    }

    /// Items are always accepted; going over capacity is only reported.
    pub async fn add_item(
        &self,
        id: CharacterId,
        item: InventoryItem,
    ) -> Result<Applied<EncumbranceReport>, CharacterOpError> {
        let item_name = item.name().to_string();
        let applied = self
            .mutator
            .mutate(id, |character| {
                character.add_item(item);
                Ok((character.encumbrance(), Persist::Save))
            })
            .await?;

        if applied.outcome.over_capacity {
            tracing::warn!(
                character_id = %id,
                total_weight = applied.outcome.total_weight,
                carrying_capacity = applied.outcome.carrying_capacity,
                "Added {} and is now over carrying capacity",
                item_name
            );
        } else {
            tracing::debug!(character_id = %id, "Added {}", item_name);
        }
        Ok(applied)
    }

    /// # Errors
    ///
    /// `DomainError::NotFound` if the character has no such item.
    pub async fn remove_item(
        &self,
        id: CharacterId,
        item_id: &ItemId,
    ) -> Result<Applied<InventoryItem>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let removed = character
                    .remove_item(item_id)
                    .ok_or_else(|| DomainError::not_found("InventoryItem", item_id.to_string()))?;
                Ok((removed, Persist::Save))
            })
            .await?;

        tracing::debug!(character_id = %id, item_id = %item_id, "Removed {}", applied.outcome.name());
        Ok(applied)
    }

    pub async fn toggle_equipped(
        &self,
        id: CharacterId,
        item_id: &ItemId,
    ) -> Result<Applied<EquipOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.toggle_equipped(item_id);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;

        tracing::debug!(character_id = %id, outcome = ?applied.outcome, "Equip toggled");
        Ok(applied)
    }

    /// Attuning a fourth item is refused and nothing is saved.
    pub async fn toggle_attuned(
        &self,
        id: CharacterId,
        item_id: &ItemId,
    ) -> Result<Applied<AttunementOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.toggle_attuned(item_id);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;

        match applied.outcome {
            AttunementOutcome::LimitReached { limit, .. } => tracing::warn!(
                character_id = %id,
                item_id = %item_id,
                limit,
                "Attunement limit reached"
            ),
            ref outcome => {
                tracing::debug!(character_id = %id, outcome = ?outcome, "Attunement toggled")
            }
        }
        Ok(applied)
    }

    pub async fn encumbrance(&self, id: CharacterId) -> Result<EncumbranceReport, CharacterOpError> {
        Ok(self.mutator.load(id).await?.encumbrance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities;
    use crate::infrastructure::memory_repo::InMemoryCharacterRepo;
    use crate::infrastructure::ports::{CharacterRepo, MockCharacterRepo};
    use crate::test_fixtures::{characters, fixed_clock, fixed_time, later_time, load_fixture};
    use dndhelper_domain::{Character, InventoryItemKind, ATTUNEMENT_LIMIT};
    use mockall::predicate::*;

    fn inventory_over(repo: Arc<dyn CharacterRepo>) -> InventoryUseCases {
        let characters = Arc::new(entities::Character::new(repo));
        InventoryUseCases::new(Arc::new(CharacterMutator::new(
            characters,
            fixed_clock(later_time()),
        )))
    }

    fn ring(name: &str) -> InventoryItem {
        InventoryItem::new(name, InventoryItemKind::Magic).with_requires_attunement(true)
    }

    #[tokio::test]
    async fn add_item_reports_encumbrance() {
        let fighter = characters::fighter();
        let id = fighter.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([fighter]));
        let inventory = inventory_over(repo.clone());
        let rope = InventoryItem::new("Hempen Rope", InventoryItemKind::Gear)
            .with_weight(10.0)
            .with_quantity(2);

        let applied = inventory.add_item(id, rope).await.unwrap();

        assert_eq!(applied.outcome.total_weight, 20.0);
        // STR 16
        assert_eq!(applied.outcome.carrying_capacity, 240.0);
        assert!(!applied.outcome.over_capacity);
        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.inventory().len(), 1);
        assert_eq!(stored.updated_at(), later_time());
    }

    #[tokio::test]
    async fn overloading_is_allowed_but_flagged() {
        let wizard = characters::wizard();
        let id = wizard.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([wizard]));
        let inventory = inventory_over(repo.clone());
        let anvil = InventoryItem::new("Anvil", InventoryItemKind::Gear).with_weight(300.0);

        let applied = inventory.add_item(id, anvil).await.unwrap();

        assert!(applied.outcome.over_capacity);
        assert_eq!(repo.get(id).await.unwrap().unwrap().inventory().len(), 1);
    }

    #[tokio::test]
    async fn remove_missing_item_is_not_found_and_not_saved() {
        let fighter = characters::fighter();
        let id = fighter.id();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(fighter.clone())));
        repo.expect_save().never();
        let inventory = inventory_over(Arc::new(repo));

        let err = inventory.remove_item(id, &ItemId::new()).await.unwrap_err();

        assert!(matches!(
            err,
            CharacterOpError::Domain(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn remove_item_returns_it() {
        let potion = InventoryItem::new("Potion of Healing", InventoryItemKind::Potion);
        let item_id = potion.id().clone();
        let mut fighter = characters::fighter();
        fighter.add_item(potion);
        let id = fighter.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([fighter]));
        let inventory = inventory_over(repo.clone());

        let applied = inventory.remove_item(id, &item_id).await.unwrap();

        assert_eq!(applied.outcome.name(), "Potion of Healing");
        assert!(repo.get(id).await.unwrap().unwrap().inventory().is_empty());
    }

    #[tokio::test]
    async fn toggle_equipped_flips_and_saves() {
        let shield = InventoryItem::new("Shield", InventoryItemKind::Armor).with_armor_class(2);
        let item_id = shield.id().clone();
        let mut cleric = characters::cleric();
        cleric.add_item(shield);
        let id = cleric.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([cleric]));
        let inventory = inventory_over(repo.clone());

        let applied = inventory.toggle_equipped(id, &item_id).await.unwrap();

        assert_eq!(applied.outcome, EquipOutcome::Equipped { item_id: item_id.clone() });
        let stored = repo.get(id).await.unwrap().unwrap();
        assert!(stored.inventory().get(&item_id).unwrap().is_equipped());
    }

    #[tokio::test]
    async fn fourth_attunement_is_refused_without_saving() {
        let mut wizard = characters::wizard();
        for name in ["Ring of Protection", "Cloak of Elvenkind", "Wand of Magic Missiles"] {
            wizard.add_item(ring(name).attuned());
        }
        let extra = ring("Ring of Feather Falling");
        let extra_id = extra.id().clone();
        wizard.add_item(extra);
        let id = wizard.id();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(wizard.clone())));
        repo.expect_save().never();
        let inventory = inventory_over(Arc::new(repo));

        let applied = inventory.toggle_attuned(id, &extra_id).await.unwrap();

        assert_eq!(
            applied.outcome,
            AttunementOutcome::LimitReached {
                item_id: extra_id.clone(),
                limit: ATTUNEMENT_LIMIT,
            }
        );
        assert_eq!(applied.character.updated_at(), fixed_time());
        assert!(!applied.character.inventory().get(&extra_id).unwrap().is_attuned());
    }

    #[tokio::test]
    async fn unattuning_frees_a_slot() {
        let attuned = ring("Ring of Protection").attuned();
        let attuned_id = attuned.id().clone();
        let mut cleric: Character = characters::cleric();
        cleric.add_item(attuned);
        let id = cleric.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters([cleric]));
        let inventory = inventory_over(repo.clone());

        let applied = inventory.toggle_attuned(id, &attuned_id).await.unwrap();

        assert_eq!(
            applied.outcome,
            AttunementOutcome::Unattuned {
                item_id: attuned_id,
                attuned_count: 0,
            }
        );
        assert_eq!(inventory.encumbrance(id).await.unwrap().attuned_count, 0);
    }

    #[tokio::test]
    async fn stored_timestamped_item_id_is_addressable() {
        let roster: Vec<Character> = load_fixture("characters/legacy_roster.json");
        let vex = roster.iter().find(|c| c.name().as_str() == "Vex").unwrap();
        let id = vex.id();
        let repo = Arc::new(InMemoryCharacterRepo::with_characters(roster));
        let inventory = inventory_over(repo.clone());
        let dagger: ItemId = "dagger-1712345678901".into();

        let applied = inventory.toggle_equipped(id, &dagger).await.unwrap();

        assert_eq!(applied.outcome, EquipOutcome::Equipped { item_id: dagger.clone() });
        let stored = repo.get(id).await.unwrap().unwrap();
        assert!(stored.inventory().get(&dagger).unwrap().is_equipped());
        assert_eq!(stored.inventory().items()[0].id().as_str(), "dagger-1712345678901");
    }
}
