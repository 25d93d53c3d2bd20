//! Class resources: limited-use features such as Rage, Ki, or Superiority Dice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::ResourceId;
use crate::value_objects::{Ability, AbilityScores, DieType};

/// When a resource refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetCadence {
    ShortRest,
    LongRest,
    Dawn,
    Never,
}

impl fmt::Display for ResetCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ShortRest => "short-rest",
            Self::LongRest => "long-rest",
            Self::Dawn => "dawn",
            Self::Never => "never",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ResetCadence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "short-rest" => Ok(Self::ShortRest),
            "long-rest" => Ok(Self::LongRest),
            "dawn" => Ok(Self::Dawn),
            "never" => Ok(Self::Never),
            _ => Err(DomainError::parse(format!("Unknown reset cadence: {}", s))),
        }
    }
}

/// Presentation hint carried on each resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceColor {
    Red,
    Blue,
    Green,
    Purple,
    Gold,
    Orange,
    #[serde(other)]
    Unknown,
}

/// A resource maximum that depends on an ability modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierScaling {
    CharismaMod,
    WisdomMod,
    IntelligenceMod,
    CharismaModPlusOne,
}

impl ModifierScaling {
    pub fn ability(self) -> Ability {
        match self {
            Self::CharismaMod | Self::CharismaModPlusOne => Ability::Charisma,
            Self::WisdomMod => Ability::Wisdom,
            Self::IntelligenceMod => Ability::Intelligence,
        }
    }

    /// Plain modifiers are floored at 1. The plus-one form is not floored,
    /// only clamped at 0 since a resource count cannot be negative.
    pub fn resolve(self, scores: &AbilityScores) -> u32 {
        let modifier = scores.modifier(self.ability());
        let value = match self {
            Self::CharismaModPlusOne => modifier + 1,
            _ => modifier.max(1),
        };
        value.max(0) as u32
    }
}

/// Breakpoint value: a literal count or an ability-modifier lookup.
///
/// Serialized as a bare number or as the modifier tag, e.g. `3` or `"charisma_mod"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalingValue {
    Fixed(u32),
    Modifier(ModifierScaling),
}

impl ScalingValue {
    /// Missing ability scores resolve modifier forms to 0.
    pub fn resolve(self, scores: Option<&AbilityScores>) -> u32 {
        match self {
            Self::Fixed(value) => value,
            Self::Modifier(scaling) => scores.map(|s| scaling.resolve(s)).unwrap_or(0),
        }
    }
}

impl From<u32> for ScalingValue {
    fn from(value: u32) -> Self {
        Self::Fixed(value)
    }
}

impl From<ModifierScaling> for ScalingValue {
    fn from(value: ModifierScaling) -> Self {
        Self::Modifier(value)
    }
}

/// A step in a resource's progression: from `level` onward, until superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelScaling {
    pub level: u8,
    pub max_value: ScalingValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub die_type: Option<DieType>,
}

impl LevelScaling {
    pub fn new(level: u8, max_value: u32) -> Self {
        Self {
            level,
            max_value: ScalingValue::Fixed(max_value),
            die_type: None,
        }
    }

    pub fn modifier(level: u8, scaling: ModifierScaling) -> Self {
        Self {
            level,
            max_value: ScalingValue::Modifier(scaling),
            die_type: None,
        }
    }

    pub fn with_die(mut self, die_type: DieType) -> Self {
        self.die_type = Some(die_type);
        self
    }
}

/// Static catalog entry describing one class resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassResourceDefinition {
    pub resource_key: &'static str,
    pub name: &'static str,
    pub reset_on: ResetCadence,
    pub die_type: Option<DieType>,
    pub use_cost: Option<u32>,
    pub color: ResourceColor,
    pub description: &'static str,
    pub requires_subclass: Option<&'static str>,
    pub level_scaling: Vec<LevelScaling>,
}

impl ClassResourceDefinition {
    pub fn new(
        resource_key: &'static str,
        name: &'static str,
        reset_on: ResetCadence,
        color: ResourceColor,
        description: &'static str,
        level_scaling: Vec<LevelScaling>,
    ) -> Self {
        Self {
            resource_key,
            name,
            reset_on,
            die_type: None,
            use_cost: None,
            color,
            description,
            requires_subclass: None,
            level_scaling,
        }
    }

    pub fn with_die(mut self, die_type: DieType) -> Self {
        self.die_type = Some(die_type);
        self
    }

    pub fn with_required_subclass(mut self, subclass: &'static str) -> Self {
        self.requires_subclass = Some(subclass);
        self
    }

    /// Level of the first breakpoint; resources without breakpoints count as level 1.
    pub fn unlock_level(&self) -> u8 {
        self.level_scaling.first().map(|s| s.level).unwrap_or(1)
    }

    /// Whether a character with this subclass may have the resource at all.
    pub fn is_available_to(&self, subclass: Option<&str>) -> bool {
        match self.requires_subclass {
            Some(required) => subclass == Some(required),
            None => true,
        }
    }
}

/// A resource as held by a specific character. `0 <= current <= max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ClassResourceWire")]
pub struct ClassResource {
    id: ResourceId,
    name: String,
    resource_key: String,
    current: u32,
    max: u32,
    reset_on: ResetCadence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    use_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    die_type: Option<DieType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<ResourceColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    level_scaling: Vec<LevelScaling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requires_subclass: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassResourceWire {
    id: ResourceId,
    name: String,
    resource_key: String,
    current: u32,
    max: u32,
    reset_on: ResetCadence,
    #[serde(default)]
    use_cost: Option<u32>,
    #[serde(default)]
    die_type: Option<DieType>,
    #[serde(default)]
    color: Option<ResourceColor>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    level_scaling: Vec<LevelScaling>,
    #[serde(default)]
    requires_subclass: Option<String>,
}

impl From<ClassResourceWire> for ClassResource {
    fn from(wire: ClassResourceWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            resource_key: wire.resource_key,
            current: wire.current.min(wire.max),
            max: wire.max,
            reset_on: wire.reset_on,
            use_cost: wire.use_cost,
            die_type: wire.die_type,
            color: wire.color,
            description: wire.description,
            level_scaling: wire.level_scaling,
            requires_subclass: wire.requires_subclass,
        }
    }
}

impl ClassResource {
    /// Build a full (current = max) instance from a catalog entry.
    pub fn from_definition(
        definition: &ClassResourceDefinition,
        max: u32,
        die_type: Option<DieType>,
    ) -> Self {
        Self {
            id: ResourceId::new(),
            name: definition.name.to_string(),
            resource_key: definition.resource_key.to_string(),
            current: max,
            max,
            reset_on: definition.reset_on,
            use_cost: definition.use_cost,
            die_type,
            color: Some(definition.color),
            description: Some(definition.description.to_string()),
            level_scaling: definition.level_scaling.clone(),
            requires_subclass: definition.requires_subclass.map(str::to_string),
        }
    }

    /// Free-standing resource, mainly for homebrew records and tests.
    pub fn new(
        name: impl Into<String>,
        resource_key: impl Into<String>,
        max: u32,
        reset_on: ResetCadence,
    ) -> Self {
        Self {
            id: ResourceId::new(),
            name: name.into(),
            resource_key: resource_key.into(),
            current: max,
            max,
            reset_on,
            use_cost: None,
            die_type: None,
            color: None,
            description: None,
            level_scaling: Vec::new(),
            requires_subclass: None,
        }
    }

    pub fn with_current(mut self, current: u32) -> Self {
        self.current = current.min(self.max);
        self
    }

    pub fn with_level_scaling(mut self, level_scaling: Vec<LevelScaling>) -> Self {
        self.level_scaling = level_scaling;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_key(&self) -> &str {
        &self.resource_key
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn reset_on(&self) -> ResetCadence {
        self.reset_on
    }

    /// Cost per use, 1 unless the definition says otherwise.
    pub fn use_cost(&self) -> u32 {
        self.use_cost.unwrap_or(1)
    }

    pub fn die_type(&self) -> Option<DieType> {
        self.die_type
    }

    pub fn color(&self) -> Option<ResourceColor> {
        self.color
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn level_scaling(&self) -> &[LevelScaling] {
        &self.level_scaling
    }

    pub fn requires_subclass(&self) -> Option<&str> {
        self.requires_subclass.as_deref()
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub(crate) fn spend(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub(crate) fn restore(&mut self, amount: Option<u32>) {
        self.current = match amount {
            Some(amount) => self.current.saturating_add(amount).min(self.max),
            None => self.max,
        };
    }

    pub(crate) fn set_current(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    pub(crate) fn refill(&mut self) {
        self.current = self.max;
    }

    /// Apply a new maximum, carrying the spent amount forward:
    /// current = clamp(current + (new_max - old_max), 0, new_max).
    pub(crate) fn rescale(&mut self, new_max: u32, new_die: Option<DieType>) {
        let shifted = i64::from(self.current) + i64::from(new_max) - i64::from(self.max);
        self.max = new_max;
        self.current = shifted.clamp(0, i64::from(new_max)) as u32;
        if new_die.is_some() {
            self.die_type = new_die;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charisma_mod_floors_at_one() {
        let scores = AbilityScores::new(10, 10, 10, 10, 10, 6);
        assert_eq!(ModifierScaling::CharismaMod.resolve(&scores), 1);
        let scores = AbilityScores::new(10, 10, 10, 10, 10, 18);
        assert_eq!(ModifierScaling::CharismaMod.resolve(&scores), 4);
    }

    #[test]
    fn charisma_mod_plus_one_is_not_floored_at_one() {
        // CHA 8 => -1 + 1 = 0
        let scores = AbilityScores::new(10, 10, 10, 10, 10, 8);
        assert_eq!(ModifierScaling::CharismaModPlusOne.resolve(&scores), 0);
        // CHA 16 => 3 + 1 = 4
        let scores = AbilityScores::new(10, 10, 10, 10, 10, 16);
        assert_eq!(ModifierScaling::CharismaModPlusOne.resolve(&scores), 4);
    }

    #[test]
    fn modifier_without_scores_resolves_to_zero() {
        let value = ScalingValue::Modifier(ModifierScaling::WisdomMod);
        assert_eq!(value.resolve(None), 0);
        assert_eq!(ScalingValue::Fixed(3).resolve(None), 3);
    }

    #[test]
    fn scaling_value_serializes_as_number_or_tag() {
        assert_eq!(serde_json::to_string(&ScalingValue::Fixed(4)).unwrap(), "4");
        assert_eq!(
            serde_json::to_string(&ScalingValue::Modifier(ModifierScaling::CharismaModPlusOne))
                .unwrap(),
            "\"charisma_mod_plus_one\""
        );
        let parsed: ScalingValue = serde_json::from_str("\"wisdom_mod\"").unwrap();
        assert_eq!(parsed, ScalingValue::Modifier(ModifierScaling::WisdomMod));
    }

    #[test]
    fn reset_cadence_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ResetCadence::ShortRest).unwrap(),
            "\"short-rest\""
        );
        assert_eq!("long_rest".parse::<ResetCadence>().unwrap(), ResetCadence::LongRest);
    }

    #[test]
    fn rescale_carries_spent_amount() {
        let mut resource = ClassResource::new("Rage", "rage", 2, ResetCadence::LongRest).with_current(1);
        resource.rescale(4, None);
        assert_eq!((resource.current(), resource.max()), (3, 4));

        resource.rescale(1, None);
        assert_eq!((resource.current(), resource.max()), (0, 1));
    }

    #[test]
    fn restore_with_and_without_amount() {
        let mut resource = ClassResource::new("Ki Points", "ki", 6, ResetCadence::ShortRest).with_current(1);
        resource.restore(Some(2));
        assert_eq!(resource.current(), 3);
        resource.restore(Some(100));
        assert_eq!(resource.current(), 6);
        resource.spend(6);
        resource.restore(None);
        assert!(resource.is_full());
    }

    #[test]
    fn unknown_color_tolerated() {
        let color: ResourceColor = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(color, ResourceColor::Unknown);
    }

    #[test]
    fn stored_resource_loads_clamped_with_its_opaque_id() {
        let json = r#"{
            "id": "fighter_second_wind_1712345678901",
            "name": "Second Wind",
            "resourceKey": "second_wind",
            "current": 4,
            "max": 1,
            "resetOn": "short-rest"
        }"#;
        let resource: ClassResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.id().as_str(), "fighter_second_wind_1712345678901");
        assert_eq!((resource.current(), resource.max()), (1, 1));

        let round_trip = serde_json::to_value(&resource).unwrap();
        assert_eq!(round_trip["id"], "fighter_second_wind_1712345678901");
    }
}
