//! Inventory operation outcomes.

use crate::ids::ItemId;

/// Outcome of toggling an item's attunement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttunementOutcome {
    Attuned { item_id: ItemId, attuned_count: usize },
    Unattuned { item_id: ItemId, attuned_count: usize },
    /// Refused: the character is already attuned to the maximum number of items
    LimitReached { item_id: ItemId, limit: usize },
    ItemNotFound { item_id: ItemId },
}

impl AttunementOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Attuned { .. } | Self::Unattuned { .. })
    }
}

/// Outcome of toggling an item's equipped flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipOutcome {
    Equipped { item_id: ItemId },
    Unequipped { item_id: ItemId },
    ItemNotFound { item_id: ItemId },
}

impl EquipOutcome {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::ItemNotFound { .. })
    }
}
