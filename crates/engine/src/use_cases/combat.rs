//! Hit points, death saves, conditions and rests, addressed by character id.

use std::sync::Arc;

use dndhelper_domain::{
    CharacterId, ConditionChange, DamageOutcome, DeathSaveKind, DeathSaves, HealOutcome,
    LongRestOutcome, ShortRestOutcome, TempHpOutcome,
};

use super::{Applied, CharacterMutator, CharacterOpError, Persist};

pub struct CombatUseCases {
    mutator: Arc<CharacterMutator>,
}

impl CombatUseCases {
    pub fn new(mutator: Arc<CharacterMutator>) -> Self {
        Self { mutator }
    }

    // =========================================================================
    // Hit Points
    // =========================================================================

    pub async fn take_damage(
        &self,
        id: CharacterId,
        amount: u32,
    ) -> Result<Applied<DamageOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.take_damage(amount);
                let changed = outcome != DamageOutcome::NoEffect;
                Ok((outcome, Persist::when(changed)))
            })
            .await?;

        tracing::debug!(character_id = %id, amount, outcome = ?applied.outcome, "Damage applied");
        Ok(applied)
    }

    /// Healing a character at 0 HP also clears their death saves.
    pub async fn heal(
        &self,
        id: CharacterId,
        amount: u32,
    ) -> Result<Applied<HealOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.heal(amount);
                if outcome.revived() {
                    character.reset_death_saves();
                }
                let changed = matches!(outcome, HealOutcome::Healed { amount_healed, .. } if amount_healed > 0);
                Ok((outcome, Persist::when(changed)))
            })
            .await?;

        tracing::debug!(character_id = %id, amount, outcome = ?applied.outcome, "Healing applied");
        Ok(applied)
    }

    pub async fn add_temporary_hp(
        &self,
        id: CharacterId,
        amount: u32,
    ) -> Result<Applied<TempHpOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.add_temporary_hp(amount);
                let changed = matches!(outcome, TempHpOutcome::Raised { .. });
                Ok((outcome, Persist::when(changed)))
            })
            .await?;

        tracing::debug!(character_id = %id, amount, outcome = ?applied.outcome, "Temporary HP granted");
        Ok(applied)
    }

    /// Returns the stored value after clamping to `[0, max]`.
    pub async fn set_hp(
        &self,
        id: CharacterId,
        value: u32,
    ) -> Result<Applied<u32>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let before = character.hit_points().current();
                let stored = character.set_current_hp(value);
                Ok((stored, Persist::when(stored != before)))
            })
            .await?;

        tracing::debug!(character_id = %id, requested = value, stored = applied.outcome, "HP set");
        Ok(applied)
    }

    // =========================================================================
    // Death Saves & Conditions
    // =========================================================================

    pub async fn update_death_save(
        &self,
        id: CharacterId,
        kind: DeathSaveKind,
        count: u8,
    ) -> Result<Applied<DeathSaves>, CharacterOpError> {
        self.mutator
            .mutate(id, |character| {
                let before = *character.death_saves();
                character.update_death_save(kind, count);
                let after = *character.death_saves();
                Ok((after, Persist::when(after != before)))
            })
            .await
    }

    pub async fn reset_death_saves(
        &self,
        id: CharacterId,
    ) -> Result<Applied<DeathSaves>, CharacterOpError> {
        self.mutator
            .mutate(id, |character| {
                let changed = !character.death_saves().is_clear();
                character.reset_death_saves();
                Ok((*character.death_saves(), Persist::when(changed)))
            })
            .await
    }

    pub async fn add_condition(
        &self,
        id: CharacterId,
        condition: &str,
    ) -> Result<Applied<ConditionChange>, CharacterOpError> {
        let condition = non_blank_condition(condition)?;
        self.mutator
            .mutate(id, |character| {
                let change = character.add_condition(condition);
                let persist = Persist::when(change.is_changed());
                Ok((change, persist))
            })
            .await
    }

    pub async fn remove_condition(
        &self,
        id: CharacterId,
        condition: &str,
    ) -> Result<Applied<ConditionChange>, CharacterOpError> {
        let condition = non_blank_condition(condition)?;
        self.mutator
            .mutate(id, |character| {
                let change = character.remove_condition(condition);
                let persist = Persist::when(change.is_changed());
                Ok((change, persist))
            })
            .await
    }

    // =========================================================================
    // Rests
    // =========================================================================

    pub async fn short_rest(
        &self,
        id: CharacterId,
        hit_dice_spent: u32,
    ) -> Result<Applied<ShortRestOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| {
                let outcome = character.short_rest(hit_dice_spent);
                let persist = Persist::when(outcome.is_rested());
                Ok((outcome, persist))
            })
            .await?;

        match &applied.outcome {
            ShortRestOutcome::Rested {
                hp_restored,
                resources_restored,
                ..
            } => tracing::info!(
                character_id = %id,
                hit_dice_spent,
                hp_restored,
                restored = ?resources_restored,
                "Short rest taken"
            ),
            ShortRestOutcome::InsufficientHitDice {
                requested,
                available,
            } => tracing::warn!(
                character_id = %id,
                requested,
                available,
                "Short rest refused: not enough hit dice"
            ),
        }
        Ok(applied)
    }

    pub async fn long_rest(
        &self,
        id: CharacterId,
    ) -> Result<Applied<LongRestOutcome>, CharacterOpError> {
        let applied = self
            .mutator
            .mutate(id, |character| Ok((character.long_rest(), Persist::Save)))
            .await?;

        tracing::info!(
            character_id = %id,
            hp_restored = applied.outcome.hp_restored,
            hit_dice_regained = applied.outcome.hit_dice_regained,
            "Long rest taken"
        );
        Ok(applied)
    }
}

fn non_blank_condition(condition: &str) -> Result<&str, CharacterOpError> {
    let trimmed = condition.trim();
    if trimmed.is_empty() {
        return Err(CharacterOpError::InvalidInput(
            "Condition name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
