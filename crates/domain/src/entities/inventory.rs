//! Inventory items plus the carrying-capacity and attunement rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::events::{AttunementOutcome, EquipOutcome};
use crate::ids::ItemId;

/// Maximum number of items a character can be attuned to at once.
pub const ATTUNEMENT_LIMIT: usize = 3;

/// Pounds a character can carry per point of Strength.
pub const CARRY_WEIGHT_PER_STRENGTH: f64 = 15.0;

/// Broad item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryItemKind {
    Weapon,
    Armor,
    Gear,
    Magic,
    Potion,
    Scroll,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InventoryItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Gear => "gear",
            Self::Magic => "magic",
            Self::Potion => "potion",
            Self::Scroll => "scroll",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for InventoryItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(Self::Weapon),
            "armor" => Ok(Self::Armor),
            "gear" => Ok(Self::Gear),
            "magic" => Ok(Self::Magic),
            "potion" => Ok(Self::Potion),
            "scroll" => Ok(Self::Scroll),
            _ => Err(DomainError::parse(format!("Unknown item type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    quantity: u32,
    /// Per unit, in pounds
    weight: f64,
    #[serde(default)]
    equipped: bool,
    #[serde(default)]
    attuned: bool,
    #[serde(default)]
    requires_attunement: bool,
    #[serde(rename = "type")]
    kind: InventoryItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    armor_class: Option<i32>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, kind: InventoryItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            quantity: 1,
            weight: 0.0,
            equipped: false,
            attuned: false,
            requires_attunement: false,
            kind,
            description: None,
            properties: Vec::new(),
            damage: None,
            armor_class: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Negative or non-finite weights are stored as 0.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_requires_attunement(mut self, requires: bool) -> Self {
        self.requires_attunement = requires;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_damage(mut self, damage: impl Into<String>) -> Self {
        self.damage = Some(damage.into());
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = Some(armor_class);
        self
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    pub fn attuned(mut self) -> Self {
        self.attuned = true;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn total_weight(&self) -> f64 {
        self.weight * f64::from(self.quantity)
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    pub fn is_attuned(&self) -> bool {
        self.attuned
    }

    pub fn requires_attunement(&self) -> bool {
        self.requires_attunement
    }

    pub fn kind(&self) -> InventoryItemKind {
        self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn damage(&self) -> Option<&str> {
        self.damage.as_deref()
    }

    pub fn armor_class(&self) -> Option<i32> {
        self.armor_class
    }
}

/// strength score x 15
pub fn carrying_capacity(strength: i32) -> f64 {
    f64::from(strength) * CARRY_WEIGHT_PER_STRENGTH
}

/// Snapshot of the weight and attunement rules for one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncumbranceReport {
    pub total_weight: f64,
    pub carrying_capacity: f64,
    /// Advisory only; carrying too much never blocks adding items
    pub over_capacity: bool,
    pub attuned_count: usize,
    pub attunement_limit: usize,
}

/// A character's items. Order is insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(Vec<InventoryItem>);

impl Inventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.0
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&InventoryItem> {
        self.0.iter().find(|i| &i.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of weight x quantity.
    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(InventoryItem::total_weight).sum()
    }

    pub fn attuned_count(&self) -> usize {
        self.0.iter().filter(|i| i.attuned).count()
    }

    pub fn is_over_capacity(&self, strength: i32) -> bool {
        self.total_weight() > carrying_capacity(strength)
    }

    pub fn encumbrance(&self, strength: i32) -> EncumbranceReport {
        let total_weight = self.total_weight();
        let capacity = carrying_capacity(strength);
        EncumbranceReport {
            total_weight,
            carrying_capacity: capacity,
            over_capacity: total_weight > capacity,
            attuned_count: self.attuned_count(),
            attunement_limit: ATTUNEMENT_LIMIT,
        }
    }

    pub(crate) fn add(&mut self, item: InventoryItem) {
        self.0.push(item);
    }

    pub(crate) fn remove(&mut self, item_id: &ItemId) -> Option<InventoryItem> {
        let index = self.0.iter().position(|i| &i.id == item_id)?;
        Some(self.0.remove(index))
    }

    /// Unconditional flip; no slot limits are modeled.
    pub(crate) fn toggle_equipped(&mut self, item_id: &ItemId) -> EquipOutcome {
        let item_id = item_id.clone();
        match self.0.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                item.equipped = !item.equipped;
                if item.equipped {
                    EquipOutcome::Equipped { item_id }
                } else {
                    EquipOutcome::Unequipped { item_id }
                }
            }
            None => EquipOutcome::ItemNotFound { item_id },
        }
    }

    /// Attuning a new item while already at the limit is refused with no change.
    pub(crate) fn toggle_attuned(&mut self, item_id: &ItemId) -> AttunementOutcome {
        let item_id = item_id.clone();
        let attuned_count = self.attuned_count();
        let Some(item) = self.0.iter_mut().find(|i| i.id == item_id) else {
            return AttunementOutcome::ItemNotFound { item_id };
        };

        if item.attuned {
            item.attuned = false;
            return AttunementOutcome::Unattuned {
                item_id,
                attuned_count: attuned_count - 1,
            };
        }
        if attuned_count >= ATTUNEMENT_LIMIT {
            return AttunementOutcome::LimitReached {
                item_id,
                limit: ATTUNEMENT_LIMIT,
            };
        }
        item.attuned = true;
        AttunementOutcome::Attuned {
            item_id,
            attuned_count: attuned_count + 1,
        }
    }
}
