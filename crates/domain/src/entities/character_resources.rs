//! The resource block of a character: class resources, spell slots, pact magic.

use serde::{Deserialize, Serialize};

use super::{ClassResource, PactMagic, ResetCadence, SpellSlots};
use crate::events::{ResourceOutcome, SlotOutcome};

/// Everything a character can spend and regain through rests.
///
/// At most one of `spell_slots` / `pact_magic` carries data; both are absent
/// for non-casters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterResources {
    #[serde(default)]
    class_resources: Vec<ClassResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spell_slots: Option<SpellSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pact_magic: Option<PactMagic>,
}

/// What a rest put back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestRecovery {
    /// Keys of class resources that were below max and are now full
    pub resources_restored: Vec<String>,
    pub spell_slots_restored: bool,
    pub pact_magic_restored: bool,
}

impl CharacterResources {
    pub fn new(
        class_resources: Vec<ClassResource>,
        spell_slots: Option<SpellSlots>,
        pact_magic: Option<PactMagic>,
    ) -> Self {
        Self {
            class_resources,
            spell_slots,
            pact_magic,
        }
    }

    pub fn class_resources(&self) -> &[ClassResource] {
        &self.class_resources
    }

    pub fn resource(&self, resource_key: &str) -> Option<&ClassResource> {
        self.class_resources
            .iter()
            .find(|r| r.resource_key() == resource_key)
    }

    pub fn spell_slots(&self) -> Option<&SpellSlots> {
        self.spell_slots.as_ref()
    }

    pub fn pact_magic(&self) -> Option<&PactMagic> {
        self.pact_magic.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.class_resources.is_empty() && self.spell_slots.is_none() && self.pact_magic.is_none()
    }

    // =========================================================================
    // Class resources
    // =========================================================================

    /// Spend `amount` (default: the resource's use cost), floored at 0.
    pub fn use_resource(&mut self, resource_key: &str, amount: Option<u32>) -> ResourceOutcome {
        self.update_resource(resource_key, |r| {
            let amount = amount.unwrap_or_else(|| r.use_cost());
            r.spend(amount);
        })
    }

    /// Restore `amount` capped at max, or refill completely when `None`.
    pub fn restore_resource(&mut self, resource_key: &str, amount: Option<u32>) -> ResourceOutcome {
        self.update_resource(resource_key, |r| r.restore(amount))
    }

    /// Set the current value, clamped to `[0, max]`.
    pub fn set_resource_value(&mut self, resource_key: &str, value: u32) -> ResourceOutcome {
        self.update_resource(resource_key, |r| r.set_current(value))
    }

    fn update_resource(
        &mut self,
        resource_key: &str,
        apply: impl FnOnce(&mut ClassResource),
    ) -> ResourceOutcome {
        let Some(resource) = self
            .class_resources
            .iter_mut()
            .find(|r| r.resource_key() == resource_key)
        else {
            return ResourceOutcome::UnknownResource {
                resource_key: resource_key.to_string(),
            };
        };

        let previous = resource.current();
        apply(&mut *resource);
        if resource.current() == previous {
            return ResourceOutcome::Unchanged {
                resource_key: resource_key.to_string(),
                current: previous,
            };
        }
        ResourceOutcome::Changed {
            resource_key: resource_key.to_string(),
            previous,
            current: resource.current(),
            max: resource.max(),
        }
    }

    // =========================================================================
    // Spell slots and pact magic
    // =========================================================================

    pub fn use_spell_slot(&mut self, level: u8) -> SlotOutcome {
        match self.spell_slots.as_mut() {
            Some(slots) => slots.spend(level),
            None => SlotOutcome::NotAvailable {
                slot_level: Some(level),
            },
        }
    }

    pub fn restore_spell_slot(&mut self, level: u8, amount: u32) -> SlotOutcome {
        match self.spell_slots.as_mut() {
            Some(slots) => slots.restore(level, amount),
            None => SlotOutcome::NotAvailable {
                slot_level: Some(level),
            },
        }
    }

    pub fn use_pact_slot(&mut self) -> SlotOutcome {
        match self.pact_magic.as_mut() {
            Some(pact) => pact.spend(),
            None => SlotOutcome::NotAvailable { slot_level: None },
        }
    }

    pub fn restore_pact_slots(&mut self) -> SlotOutcome {
        match self.pact_magic.as_mut() {
            Some(pact) => pact.refill(),
            None => SlotOutcome::NotAvailable { slot_level: None },
        }
    }

    // =========================================================================
    // Rests
    // =========================================================================

    /// Short-rest resources and pact magic refill; spell slots and
    /// long-rest resources are untouched.
    pub(crate) fn recover_short_rest(&mut self) -> RestRecovery {
        let resources_restored = self.refill_where(|r| r.reset_on() == ResetCadence::ShortRest);
        let pact_magic_restored = self
            .pact_magic
            .as_mut()
            .map(|p| p.refill().is_changed())
            .unwrap_or(false);

        RestRecovery {
            resources_restored,
            spell_slots_restored: false,
            pact_magic_restored,
        }
    }

    /// Every class resource regardless of cadence, every slot level, and pact magic.
    pub(crate) fn recover_long_rest(&mut self) -> RestRecovery {
        let resources_restored = self.refill_where(|_| true);
        let spell_slots_restored = match self.spell_slots.as_mut() {
            Some(slots) => {
                let was_full = slots.slots().iter().all(|s| s.current() == s.max());
                slots.refill();
                !was_full
            }
            None => false,
        };
        let pact_magic_restored = self
            .pact_magic
            .as_mut()
            .map(|p| p.refill().is_changed())
            .unwrap_or(false);

        RestRecovery {
            resources_restored,
            spell_slots_restored,
            pact_magic_restored,
        }
    }

    fn refill_where(&mut self, predicate: impl Fn(&ClassResource) -> bool) -> Vec<String> {
        let mut restored = Vec::new();
        for resource in self.class_resources.iter_mut().filter(|r| predicate(r)) {
            if !resource.is_full() {
                restored.push(resource.resource_key().to_string());
            }
            resource.refill();
        }
        restored
    }

    // =========================================================================
    // Re-leveling support
    // =========================================================================

    pub(crate) fn class_resources_mut(&mut self) -> &mut Vec<ClassResource> {
        &mut self.class_resources
    }

    pub(crate) fn replace_slots(
        &mut self,
        spell_slots: Option<SpellSlots>,
        pact_magic: Option<PactMagic>,
    ) {
        self.spell_slots = spell_slots;
        self.pact_magic = pact_magic;
    }
}
