//! Character-level outcomes: conditions, progression, and descriptive updates.

/// Outcome of adding or removing a condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionChange {
    Added(String),
    AlreadyPresent(String),
    Removed(String),
    NotPresent(String),
}

impl ConditionChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Added(_) | Self::Removed(_))
    }
}

/// What changed when a character's level was set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelChange {
    Unchanged { level: u8 },
    Changed {
        from: u8,
        to: u8,
        max_hp: u32,
        proficiency_bonus: i32,
        /// Resource keys unlocked by the new level
        resources_unlocked: Vec<String>,
    },
}
