//! Class resources, spell slots and pact magic, addressed by character id.

use std::sync::Arc;

use dndhelper_domain::{CharacterId, ResourceOutcome, SlotOutcome, MAX_SPELL_LEVEL};

use super::{Applied, CharacterMutator, CharacterOpError, Persist};

pub struct ResourceUseCases {
    mutator: Arc<CharacterMutator>,
}

impl ResourceUseCases {
    pub fn new(mutator: Arc<CharacterMutator>) -> Self {
        Self { mutator }
    }

    // =========================================================================
    // Class Resources
    // =========================================================================

    /// Spend `amount` uses, or the resource's use cost when `None`.
    pub async fn use_resource(
        &self,
        id: CharacterId,
        resource_key: &str,
        amount: Option<u32>,
    ) -> Result<Applied<ResourceOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.use_resource(resource_key, amount);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_resource(id, "use", &applied.outcome);
        Ok(applied)
    }

    /// Restore `amount` uses, or refill completely when `None`.
    pub async fn restore_resource(
        &self,
        id: CharacterId,
        resource_key: &str,
        amount: Option<u32>,
    ) -> Result<Applied<ResourceOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.restore_resource(resource_key, amount);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_resource(id, "restore", &applied.outcome);
        Ok(applied)
    }

    pub async fn set_resource_value(
        &self,
        id: CharacterId,
        resource_key: &str,
        value: u32,
    ) -> Result<Applied<ResourceOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.set_resource_value(resource_key, value);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_resource(id, "set", &applied.outcome);
        Ok(applied)
    }

    // =========================================================================
    // Spell Slots
    // =========================================================================

    pub async fn use_spell_slot(
        &self,
        id: CharacterId,
        level: u8,
    ) -> Result<Applied<SlotOutcome>, CharacterOpError> {
        validate_slot_level(level)?;
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.use_spell_slot(level);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_slot(id, "use", &applied.outcome);
        Ok(applied)
    }

    /// Restore `amount` slots of one level (one when `None`), capped at max.
    pub async fn restore_spell_slot(
        &self,
        id: CharacterId,
        level: u8,
        amount: Option<u32>,
    ) -> Result<Applied<SlotOutcome>, CharacterOpError> {
        validate_slot_level(level)?;
        let amount = amount.unwrap_or(1);
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.restore_spell_slot(level, amount);
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_slot(id, "restore", &applied.outcome);
        Ok(applied)
    }

    // =========================================================================
    // Pact Magic
    // =========================================================================

    pub async fn use_pact_slot(
        &self,
        id: CharacterId,
    ) -> Result<Applied<SlotOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.use_pact_slot();
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_slot(id, "use pact", &applied.outcome);
        Ok(applied)
    }

    pub async fn restore_pact_slots(
        &self,
        id: CharacterId,
    ) -> Result<Applied<SlotOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.restore_pact_slots();
                let persist = Persist::when(outcome.is_changed());
                Ok((outcome, persist))
            })
            .await?;
        log_slot(id, "restore pact", &applied.outcome);
        Ok(applied)
    }
}

fn validate_slot_level(level: u8) -> Result<(), CharacterOpError> {
    if (1..=MAX_SPELL_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(CharacterOpError::InvalidInput(format!(
            "Spell slot level must be between 1 and {}, got {}",
            MAX_SPELL_LEVEL, level
        )))
    }
}

fn log_resource(id: CharacterId, action: &str, outcome: &ResourceOutcome) {
    match outcome {
        ResourceOutcome::UnknownResource { resource_key } => {
            tracing::warn!(character_id = %id, action, resource_key = %resource_key, "Unknown resource")
        }
        _ => tracing::debug!(character_id = %id, action, outcome = ?outcome, "Resource updated"),
    }
}

fn log_slot(id: CharacterId, action: &str, outcome: &SlotOutcome) {
    match outcome {
        SlotOutcome::Empty { slot_level } => {
            tracing::warn!(character_id = %id, action, slot_level, "No slot left at this level")
        }
        _ => tracing::debug!(character_id = %id, action, outcome = ?outcome, "Slot updated"),
    }
}
