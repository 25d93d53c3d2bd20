//! Dice value objects and parsing
//!
//! Supports formulas like "1d20+5", "2d6-1", "d100". Rolling takes an injected
//! generator so the domain stays free of an RNG dependency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY or XdY+Z
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Only the standard polyhedral set is supported
    #[error("Unsupported die size: d{0}")]
    UnsupportedDie(u32),
}

/// One of the standard polyhedral dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DieType {
    #[serde(rename = "d4")]
    D4,
    #[serde(rename = "d6")]
    D6,
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d10")]
    D10,
    #[serde(rename = "d12")]
    D12,
    #[serde(rename = "d20")]
    D20,
    #[serde(rename = "d100")]
    D100,
}

impl DieType {
    pub const ALL: [DieType; 7] = [
        DieType::D4,
        DieType::D6,
        DieType::D8,
        DieType::D10,
        DieType::D12,
        DieType::D20,
        DieType::D100,
    ];

    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
        }
    }

    /// Fixed-average roll used for resting and level-up hit points:
    /// floor(sides / 2) + 1.
    pub fn average_roll(self) -> u32 {
        self.sides() / 2 + 1
    }

    pub fn from_sides(sides: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.sides() == sides)
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let digits = s
            .strip_prefix('d')
            .ok_or_else(|| DiceParseError::InvalidFormat(format!("Invalid die: '{}'", s)))?;
        let sides: u32 = digits
            .parse()
            .map_err(|_| DiceParseError::InvalidFormat(format!("Invalid die: '{}'", s)))?;
        Self::from_sides(sides).ok_or(DiceParseError::UnsupportedDie(sides))
    }
}

/// How a roll treats its dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    #[default]
    Normal,
    /// Roll one die twice, keep the higher
    Advantage,
    /// Roll one die twice, keep the lower
    Disadvantage,
}

/// A parsed dice formula like "2d6+3"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Die to roll (Y in XdY)
    pub die: DieType,
    /// Modifier to add/subtract after rolling (+Z or -Z)
    pub modifier: i32,
}

impl DiceFormula {
    pub fn new(dice_count: u8, die: DieType, modifier: i32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        Ok(Self {
            dice_count,
            die,
            modifier,
        })
    }

    /// Parse a dice formula string like "1d20+5", "2d6-1", "d100"
    ///
    /// Supported formats:
    /// - "XdY" - Roll X dice of size Y
    /// - "XdY+Z" / "XdY-Z" - with a flat modifier
    /// - "dY" - Roll 1 die of size Y (shorthand)
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let dice_count_str = &input[..d_pos];
        let dice_count: u8 = if dice_count_str.is_empty() {
            1
        } else {
            dice_count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", dice_count_str))
            })?
        };

        let after_d = &input[d_pos + 1..];
        let (die_str, modifier) = if let Some(pos) = after_d.find(['+', '-']) {
            let (die_str, mod_str) = after_d.split_at(pos);
            let modifier: i32 = mod_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid modifier: '{}'", mod_str))
            })?;
            (die_str, modifier)
        } else {
            (after_d, 0)
        };

        let sides: u32 = die_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", die_str))
        })?;
        let die = DieType::from_sides(sides).ok_or(DiceParseError::UnsupportedDie(sides))?;

        Self::new(dice_count, die, modifier)
    }

    /// Roll the formula.
    ///
    /// `rng(min, max)` must return a uniform integer in `[min, max]`.
    /// Advantage and disadvantage always roll a single die twice and ignore
    /// the dice count.
    pub fn roll(&self, mode: RollMode, mut rng: impl FnMut(i32, i32) -> i32) -> DiceRoll {
        let sides = self.die.sides() as i32;
        let (results, kept) = match mode {
            RollMode::Normal => {
                let results: Vec<i32> = (0..self.dice_count).map(|_| rng(1, sides)).collect();
                let sum = results.iter().sum();
                (results, sum)
            }
            RollMode::Advantage | RollMode::Disadvantage => {
                let first = rng(1, sides);
                let second = rng(1, sides);
                let kept = if mode == RollMode::Advantage {
                    first.max(second)
                } else {
                    first.min(second)
                };
                (vec![first, second], kept)
            }
        };

        DiceRoll {
            formula: self.clone(),
            mode,
            results,
            total: kept + self.modifier,
            label: None,
        }
    }

    /// Compact notation: the count is omitted for a single die ("d20+5", "2d6-1").
    pub fn notation(&self) -> String {
        let count = if self.dice_count > 1 {
            self.dice_count.to_string()
        } else {
            String::new()
        };
        let modifier = match self.modifier {
            0 => String::new(),
            m if m > 0 => format!("+{}", m),
            m => m.to_string(),
        };
        format!("{}{}{}", count, self.die, modifier)
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

impl FromStr for DiceFormula {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Result of rolling dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    pub formula: DiceFormula,
    pub mode: RollMode,
    /// Every die that was thrown, in order
    pub results: Vec<i32>,
    /// Kept dice plus the modifier
    pub total: i32,
    /// Free-text caption such as "STR Check"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DiceRoll {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn kept_die(&self) -> Option<i32> {
        match self.mode {
            RollMode::Normal if self.results.len() == 1 => self.results.first().copied(),
            RollMode::Normal => None,
            RollMode::Advantage => self.results.iter().copied().max(),
            RollMode::Disadvantage => self.results.iter().copied().min(),
        }
    }

    /// Check if this is a natural 20 on a single kept d20
    pub fn is_natural_20(&self) -> bool {
        self.formula.die == DieType::D20 && self.kept_die() == Some(20)
    }

    /// Check if this is a natural 1 on a single kept d20
    pub fn is_natural_1(&self) -> bool {
        self.formula.die == DieType::D20 && self.kept_die() == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(values: Vec<i32>) -> impl FnMut(i32, i32) -> i32 {
        let mut iter = values.into_iter();
        move |_, _| iter.next().unwrap()
    }

    #[test]
    fn test_parse_shorthand_d20() {
        let formula = DiceFormula::parse("d20").unwrap();
        assert_eq!(formula.dice_count, 1);
        assert_eq!(formula.die, DieType::D20);
        assert_eq!(formula.modifier, 0);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let formula = DiceFormula::parse("2d6+3").unwrap();
        assert_eq!(formula.dice_count, 2);
        assert_eq!(formula.die, DieType::D6);
        assert_eq!(formula.modifier, 3);

        let formula = DiceFormula::parse("  1D20-3 ").unwrap();
        assert_eq!(formula.die, DieType::D20);
        assert_eq!(formula.modifier, -3);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(DiceFormula::parse(""), Err(DiceParseError::Empty)));
        assert!(matches!(
            DiceFormula::parse("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DiceFormula::parse("0d20"),
            Err(DiceParseError::InvalidDiceCount)
        ));
        assert!(matches!(
            DiceFormula::parse("1d7"),
            Err(DiceParseError::UnsupportedDie(7))
        ));
    }

    #[test]
    fn die_type_parses_and_averages() {
        assert_eq!("D10".parse::<DieType>().unwrap(), DieType::D10);
        assert_eq!(DieType::D10.average_roll(), 6);
        assert_eq!(DieType::D8.average_roll(), 5);
        assert_eq!(DieType::D6.average_roll(), 4);
        assert_eq!(DieType::D12.average_roll(), 7);
        assert!("x10".parse::<DieType>().is_err());
    }

    #[test]
    fn die_type_serializes_as_lowercase_notation() {
        assert_eq!(serde_json::to_string(&DieType::D100).unwrap(), "\"d100\"");
        let die: DieType = serde_json::from_str("\"d8\"").unwrap();
        assert_eq!(die, DieType::D8);
    }

    #[test]
    fn notation_hides_single_count() {
        assert_eq!(DiceFormula::new(1, DieType::D20, 0).unwrap().notation(), "d20");
        assert_eq!(DiceFormula::new(2, DieType::D20, 5).unwrap().notation(), "2d20+5");
        assert_eq!(DiceFormula::new(1, DieType::D8, -1).unwrap().notation(), "d8-1");
    }

    #[test]
    fn normal_roll_sums_every_die() {
        let formula = DiceFormula::new(3, DieType::D6, 2).unwrap();
        let roll = formula.roll(RollMode::Normal, scripted(vec![1, 4, 6]));
        assert_eq!(roll.results, vec![1, 4, 6]);
        assert_eq!(roll.total, 13);
    }

    #[test]
    fn advantage_keeps_higher_and_ignores_count() {
        let formula = DiceFormula::new(3, DieType::D20, 1).unwrap();
        let roll = formula.roll(RollMode::Advantage, scripted(vec![7, 20]));
        assert_eq!(roll.results, vec![7, 20]);
        assert_eq!(roll.total, 21);
        assert!(roll.is_natural_20());
    }

    #[test]
    fn disadvantage_keeps_lower() {
        let formula = DiceFormula::new(1, DieType::D20, 0).unwrap();
        let roll = formula
            .roll(RollMode::Disadvantage, scripted(vec![1, 15]))
            .with_label("Attack Roll");
        assert_eq!(roll.total, 1);
        assert!(roll.is_natural_1());
        assert_eq!(roll.label.as_deref(), Some("Attack Roll"));
    }

    #[test]
    fn rng_receives_die_bounds() {
        let formula = DiceFormula::new(1, DieType::D100, 0).unwrap();
        let roll = formula.roll(RollMode::Normal, |min, max| {
            assert_eq!((min, max), (1, 100));
            42
        });
        assert_eq!(roll.total, 42);
    }
}
