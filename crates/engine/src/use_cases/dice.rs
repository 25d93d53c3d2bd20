//! Dice rolling backed by the injected random source.

use std::sync::Arc;

use dndhelper_domain::{DiceFormula, DiceParseError, DiceRoll, RollMode};

use crate::infrastructure::ports::RandomPort;

pub struct DiceUseCases {
    random: Arc<dyn RandomPort>,
}

impl DiceUseCases {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Parse and roll a formula such as "2d6+3" or "d20".
    pub fn roll(
        &self,
        formula: &str,
        mode: RollMode,
        label: Option<String>,
    ) -> Result<DiceRoll, DiceParseError> {
        let formula = DiceFormula::parse(formula)?;
        Ok(self.roll_formula(&formula, mode, label))
    }

    pub fn roll_formula(
        &self,
        formula: &DiceFormula,
        mode: RollMode,
        label: Option<String>,
    ) -> DiceRoll {
        let mut roll = formula.roll(mode, |min, max| self.random.gen_range(min, max));
        roll.label = label;

        tracing::debug!(
            formula = %formula,
            mode = ?mode,
            results = ?roll.results,
            total = roll.total,
            "Rolled dice"
        );
        roll
    }
}
