//! Spell slots (the per-level ladder) and warlock pact magic (a single pool).

use serde::{Deserialize, Serialize};

use crate::events::SlotOutcome;
use crate::value_objects::Ability;

/// Highest spell level with slots.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Slots for one spell level. `0 <= current <= max`, `max > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SpellSlotWire")]
pub struct SpellSlot {
    level: u8,
    current: u32,
    max: u32,
}

impl SpellSlot {
    pub fn new(level: u8, max: u32) -> Self {
        Self {
            level,
            current: max,
            max,
        }
    }

    pub fn with_current(mut self, current: u32) -> Self {
        self.current = current.min(self.max);
        self
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

#[derive(Deserialize)]
struct SpellSlotWire {
    level: u8,
    current: u32,
    max: u32,
}

impl From<SpellSlotWire> for SpellSlot {
    fn from(wire: SpellSlotWire) -> Self {
        Self::new(wire.level, wire.max).with_current(wire.current)
    }
}

/// The spell-slot ladder of a full or half caster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlots {
    slots: Vec<SpellSlot>,
    casting_ability: Ability,
    #[serde(default, rename = "spellSaveDC", skip_serializing_if = "Option::is_none")]
    spell_save_dc: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spell_attack_bonus: Option<i32>,
}

impl SpellSlots {
    /// Build full slots from a progression row, where `counts[i]` is the
    /// number of slots of spell level `i + 1`. Zero entries are omitted.
    pub fn from_counts(
        counts: &[u8],
        casting_ability: Ability,
        proficiency_bonus: i32,
        ability_modifier: i32,
    ) -> Self {
        let slots = counts
            .iter()
            .take(MAX_SPELL_LEVEL as usize)
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, &count)| SpellSlot::new((i + 1) as u8, u32::from(count)))
            .collect();

        Self {
            slots,
            casting_ability,
            spell_save_dc: Some(8 + proficiency_bonus + ability_modifier),
            spell_attack_bonus: Some(proficiency_bonus + ability_modifier),
        }
    }

    pub fn slots(&self) -> &[SpellSlot] {
        &self.slots
    }

    pub fn slot(&self, level: u8) -> Option<&SpellSlot> {
        self.slots.iter().find(|s| s.level == level)
    }

    pub fn casting_ability(&self) -> Ability {
        self.casting_ability
    }

    /// 8 + proficiency bonus + casting ability modifier
    pub fn spell_save_dc(&self) -> Option<i32> {
        self.spell_save_dc
    }

    /// proficiency bonus + casting ability modifier
    pub fn spell_attack_bonus(&self) -> Option<i32> {
        self.spell_attack_bonus
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn spend(&mut self, level: u8) -> SlotOutcome {
        let Some(slot) = self.slots.iter_mut().find(|s| s.level == level) else {
            return SlotOutcome::NotAvailable {
                slot_level: Some(level),
            };
        };
        if slot.current == 0 {
            return SlotOutcome::Empty { slot_level: level };
        }
        let previous = slot.current;
        slot.current -= 1;
        SlotOutcome::Changed {
            slot_level: level,
            previous,
            current: slot.current,
            max: slot.max,
        }
    }

    pub(crate) fn restore(&mut self, level: u8, amount: u32) -> SlotOutcome {
        let Some(slot) = self.slots.iter_mut().find(|s| s.level == level) else {
            return SlotOutcome::NotAvailable {
                slot_level: Some(level),
            };
        };
        let previous = slot.current;
        slot.current = slot.current.saturating_add(amount).min(slot.max);
        if slot.current == previous {
            return SlotOutcome::Unchanged {
                slot_level: level,
                current: previous,
            };
        }
        SlotOutcome::Changed {
            slot_level: level,
            previous,
            current: slot.current,
            max: slot.max,
        }
    }

    pub(crate) fn refill(&mut self) {
        for slot in &mut self.slots {
            slot.current = slot.max;
        }
    }
}

/// Warlock pact magic: one pool of same-level slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PactMagicWire")]
pub struct PactMagic {
    slot_level: u8,
    current: u32,
    max: u32,
}

impl PactMagic {
    pub fn new(slot_level: u8, max: u32) -> Self {
        Self {
            slot_level,
            current: max,
            max,
        }
    }

    pub fn with_current(mut self, current: u32) -> Self {
        self.current = current.min(self.max);
        self
    }

    pub fn slot_level(&self) -> u8 {
        self.slot_level
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Floors at 0; spending an empty pool reports `Empty`.
    pub(crate) fn spend(&mut self) -> SlotOutcome {
        if self.current == 0 {
            return SlotOutcome::Empty {
                slot_level: self.slot_level,
            };
        }
        let previous = self.current;
        self.current -= 1;
        SlotOutcome::Changed {
            slot_level: self.slot_level,
            previous,
            current: self.current,
            max: self.max,
        }
    }

    pub(crate) fn refill(&mut self) -> SlotOutcome {
        let previous = self.current;
        self.current = self.max;
        if previous == self.max {
            return SlotOutcome::Unchanged {
                slot_level: self.slot_level,
                current: previous,
            };
        }
        SlotOutcome::Changed {
            slot_level: self.slot_level,
            previous,
            current: self.current,
            max: self.max,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PactMagicWire {
    slot_level: u8,
    current: u32,
    max: u32,
}

impl From<PactMagicWire> for PactMagic {
    fn from(wire: PactMagicWire) -> Self {
        Self::new(wire.slot_level, wire.max).with_current(wire.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_levels_are_omitted() {
        let slots = SpellSlots::from_counts(&[4, 3, 2, 0, 0, 0, 0, 0, 0], Ability::Wisdom, 3, 1);
        assert_eq!(slots.slots().len(), 3);
        assert_eq!(slots.slot(3).map(|s| s.max()), Some(2));
        assert!(slots.slot(4).is_none());
        assert_eq!(slots.spell_save_dc(), Some(12));
        assert_eq!(slots.spell_attack_bonus(), Some(4));
    }

    #[test]
    fn spending_an_empty_slot_is_refused() {
        let mut slots = SpellSlots::from_counts(&[1], Ability::Intelligence, 2, 3);
        assert!(slots.spend(1).is_changed());
        assert_eq!(slots.spend(1), SlotOutcome::Empty { slot_level: 1 });
        assert_eq!(slots.slot(1).map(|s| s.current()), Some(0));
        assert_eq!(
            slots.spend(2),
            SlotOutcome::NotAvailable {
                slot_level: Some(2)
            }
        );
    }

    #[test]
    fn restore_caps_at_max() {
        let mut slots = SpellSlots::from_counts(&[4], Ability::Charisma, 2, 2);
        slots.spend(1);
        slots.spend(1);
        assert!(slots.restore(1, 5).is_changed());
        assert_eq!(slots.slot(1).map(|s| s.current()), Some(4));
        assert!(matches!(slots.restore(1, 1), SlotOutcome::Unchanged { .. }));
    }

    #[test]
    fn pact_magic_spend_and_refill() {
        let mut pact = PactMagic::new(3, 2);
        pact.spend();
        pact.spend();
        assert_eq!(pact.spend(), SlotOutcome::Empty { slot_level: 3 });
        assert!(pact.refill().is_changed());
        assert_eq!(pact.current(), 2);
    }

    #[test]
    fn serialized_shape_uses_camel_case() {
        let slots = SpellSlots::from_counts(&[2], Ability::Intelligence, 2, 3);
        let json = serde_json::to_value(&slots).unwrap();
        assert_eq!(json["castingAbility"], "intelligence");
        assert_eq!(json["spellSaveDC"], 13);
        assert_eq!(json["spellAttackBonus"], 5);
        assert_eq!(json["slots"][0]["level"], 1);
    }

    #[test]
    fn overfull_slots_are_clamped_on_load() {
        let slots: SpellSlots = serde_json::from_str(
            r#"{"slots":[{"level":1,"current":7,"max":4}],"castingAbility":"wisdom"}"#,
        )
        .unwrap();
        assert_eq!(slots.slot(1).map(|s| s.current()), Some(4));

        let pact: PactMagic =
            serde_json::from_str(r#"{"slotLevel":3,"current":6,"max":2}"#).unwrap();
        assert_eq!(pact.current(), 2);
    }
}
