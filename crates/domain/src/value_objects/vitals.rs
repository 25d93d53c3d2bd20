//! Hit points, hit dice, and death saves.

use serde::{Deserialize, Serialize};

use super::DieType;

/// Highest value either death-save counter can reach.
pub const MAX_DEATH_SAVES: u8 = 3;

/// Current/max/temporary hit points. `current` never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HitPointsWire")]
pub struct HitPoints {
    current: u32,
    max: u32,
    temp: u32,
}

impl HitPoints {
    pub fn new(current: u32, max: u32, temp: u32) -> Self {
        Self {
            current: current.min(max),
            max,
            temp,
        }
    }

    /// Full hit points with no temporary buffer.
    pub fn full(max: u32) -> Self {
        Self::new(max, max, 0)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn temp(&self) -> u32 {
        self.temp
    }

    pub fn is_zero(&self) -> bool {
        self.current == 0
    }

    /// Temp absorbs first, the rest comes off current (floored at 0).
    /// Returns `(absorbed_by_temp, lost_from_current)`.
    pub(crate) fn absorb(&mut self, amount: u32) -> (u32, u32) {
        let absorbed = amount.min(self.temp);
        self.temp -= absorbed;
        let lost = (amount - absorbed).min(self.current);
        self.current -= lost;
        (absorbed, lost)
    }

    /// Returns the amount actually restored.
    pub(crate) fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current.saturating_sub(before)
    }

    /// Temp HP never stacks; the larger grant wins.
    pub(crate) fn grant_temp(&mut self, amount: u32) {
        self.temp = self.temp.max(amount);
    }

    pub(crate) fn set_current(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    pub(crate) fn clear_temp(&mut self) {
        self.temp = 0;
    }

    pub(crate) fn fill(&mut self) {
        self.current = self.max;
    }

    /// Move the maximum, shifting current by the same delta and clamping.
    pub(crate) fn rebase_max(&mut self, new_max: u32) {
        let shifted = i64::from(self.current) + i64::from(new_max) - i64::from(self.max);
        self.max = new_max;
        self.current = shifted.clamp(0, i64::from(new_max)) as u32;
    }
}

/// Stored records can carry `current > max`; loading clamps them.
#[derive(Deserialize)]
struct HitPointsWire {
    current: u32,
    max: u32,
    #[serde(default)]
    temp: u32,
}

impl From<HitPointsWire> for HitPoints {
    fn from(wire: HitPointsWire) -> Self {
        Self::new(wire.current, wire.max, wire.temp)
    }
}

/// Hit dice pool. `current` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HitDiceWire")]
pub struct HitDice {
    total: u32,
    current: u32,
    #[serde(rename = "type")]
    die_type: DieType,
}

impl HitDice {
    pub fn new(total: u32, current: u32, die_type: DieType) -> Self {
        Self {
            total,
            current: current.min(total),
            die_type,
        }
    }

    pub fn full(total: u32, die_type: DieType) -> Self {
        Self::new(total, total, die_type)
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn die_type(&self) -> DieType {
        self.die_type
    }

    pub(crate) fn spend(&mut self, count: u32) {
        self.current = self.current.saturating_sub(count);
    }

    /// Regain max(1, floor(total / 2)), capped at total. Returns the amount regained.
    pub(crate) fn recover_half(&mut self) -> u32 {
        let before = self.current;
        let regained = (self.total / 2).max(1);
        self.current = self.current.saturating_add(regained).min(self.total);
        self.current.saturating_sub(before)
    }

    pub(crate) fn rebase_total(&mut self, new_total: u32) {
        let shifted = i64::from(self.current) + i64::from(new_total) - i64::from(self.total);
        self.total = new_total;
        self.current = shifted.clamp(0, i64::from(new_total)) as u32;
    }
}

#[derive(Deserialize)]
struct HitDiceWire {
    total: u32,
    current: u32,
    #[serde(rename = "type")]
    die_type: DieType,
}

impl From<HitDiceWire> for HitDice {
    fn from(wire: HitDiceWire) -> Self {
        Self::new(wire.total, wire.current, wire.die_type)
    }
}

/// Which death-save counter to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathSaveKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "DeathSavesWire")]
pub struct DeathSaves {
    successes: u8,
    failures: u8,
}

impl DeathSaves {
    pub fn new(successes: u8, failures: u8) -> Self {
        Self {
            successes: successes.min(MAX_DEATH_SAVES),
            failures: failures.min(MAX_DEATH_SAVES),
        }
    }

    pub fn successes(&self) -> u8 {
        self.successes
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn is_clear(&self) -> bool {
        self.successes == 0 && self.failures == 0
    }

    pub(crate) fn set(&mut self, kind: DeathSaveKind, count: u8) {
        let count = count.min(MAX_DEATH_SAVES);
        match kind {
            DeathSaveKind::Success => self.successes = count,
            DeathSaveKind::Failure => self.failures = count,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Deserialize)]
struct DeathSavesWire {
    #[serde(default)]
    successes: u8,
    #[serde(default)]
    failures: u8,
}

impl From<DeathSavesWire> for DeathSaves {
    fn from(wire: DeathSavesWire) -> Self {
        Self::new(wire.successes, wire.failures)
    }
}
