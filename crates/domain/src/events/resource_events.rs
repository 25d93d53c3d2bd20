//! Outcomes of spending and restoring class resources and spell slots.

/// Outcome of a class-resource operation addressed by resource key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// The current value moved
    Changed {
        resource_key: String,
        previous: u32,
        current: u32,
        max: u32,
    },
    /// Operation applied but nothing moved (already empty or already full)
    Unchanged { resource_key: String, current: u32 },
    /// The character has no resource with this key
    UnknownResource { resource_key: String },
}

impl ResourceOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Outcome of a spell-slot or pact-slot operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Changed {
        slot_level: u8,
        previous: u32,
        current: u32,
        max: u32,
    },
    /// Spending was refused because no slot of this level is left
    Empty { slot_level: u8 },
    /// Restoring a slot that was already full
    Unchanged { slot_level: u8, current: u32 },
    /// The character has no slots of this kind (or this level)
    NotAvailable { slot_level: Option<u8> },
}

impl SlotOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}
