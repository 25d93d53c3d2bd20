//! Combat and rest outcomes
//!
//! These enums communicate what happened when hit points, death saves, or
//! rests changed character state, so callers can decide whether to persist
//! and what to tell the user.

/// Outcome of applying damage to a character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Zero damage, or a character already at 0 HP with no temp HP
    NoEffect,
    /// Character took damage and is still standing
    Wounded {
        absorbed_by_temp: u32,
        damage_dealt: u32,
        remaining_hp: u32,
    },
    /// Current HP reached 0; death-save tracking begins
    DroppedToZero { absorbed_by_temp: u32, damage_dealt: u32 },
}

/// Outcome of healing a character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealOutcome {
    /// Healing applied. `revived` is true when the character was at 0 HP.
    Healed {
        amount_healed: u32,
        new_hp: u32,
        revived: bool,
    },
    /// Already at max HP (or zero healing)
    AlreadyFull,
}

impl HealOutcome {
    pub fn revived(&self) -> bool {
        matches!(self, Self::Healed { revived: true, .. })
    }
}

/// Outcome of granting temporary hit points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TempHpOutcome {
    Raised { from: u32, to: u32 },
    /// Existing temp HP was at least as high; temp HP never stacks
    Kept { current: u32 },
}

/// Outcome of a short rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortRestOutcome {
    Rested {
        hit_dice_spent: u32,
        hp_restored: u32,
        resources_restored: Vec<String>,
        pact_magic_restored: bool,
    },
    /// Refused with no state change
    InsufficientHitDice { requested: u32, available: u32 },
}

impl ShortRestOutcome {
    pub fn is_rested(&self) -> bool {
        matches!(self, Self::Rested { .. })
    }
}

/// Summary of a long rest (always succeeds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRestOutcome {
    pub hp_restored: u32,
    pub temp_hp_cleared: u32,
    pub hit_dice_regained: u32,
    pub resources_restored: Vec<String>,
    pub spell_slots_restored: bool,
    pub pact_magic_restored: bool,
}
