//! Test fixtures loader for JSON fixture files and common test helpers.
//!
//! Fixtures live under `test_data/` in this crate. Builders in [`characters`]
//! produce fresh characters stamped at [`fixed_time`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{characters, load_fixture};
//!
//! #[test]
//! fn fighter_has_second_wind() {
//!     let fighter = characters::fighter();
//!     // ... test logic
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::ClockPort;

// =============================================================================
// Fixture Loading
// =============================================================================

/// Load a JSON fixture from the test_data/ directory.
///
/// # Panics
///
/// Panics if the fixture file cannot be read or parsed.
pub fn load_fixture<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let fixture_path = fixture_path(path);
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture '{}': {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!(
            "Failed to parse fixture '{}': {}",
            fixture_path.display(),
            e
        )
    })
}

pub fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(path)
}

// =============================================================================
// Time
// =============================================================================

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

pub fn later_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap()
}

pub fn fixed_clock(now: DateTime<Utc>) -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(now))
}

// =============================================================================
// Characters
// =============================================================================

pub mod characters {
    use super::fixed_time;
    use dndhelper_domain::{
        AbilityScores, Character, CharacterName, CharacterTemplate, NewCharacter,
    };

    fn from_template(template: CharacterTemplate) -> Character {
        Character::create(template.build(None).unwrap(), fixed_time())
    }

    fn custom(name: &str, race: &str, class: &str, level: u8, scores: AbilityScores) -> Character {
        let draft = NewCharacter::custom(
            CharacterName::new(name).unwrap(),
            race,
            class,
            None,
            level,
            scores,
        )
        .unwrap();
        Character::create(draft, fixed_time())
    }

    /// Level 1 Champion with 12 HP, Second Wind and Action Surge.
    pub fn fighter() -> Character {
        from_template(CharacterTemplate::Fighter)
    }

    /// Level 1 Evocation wizard with two 1st-level slots.
    pub fn wizard() -> Character {
        from_template(CharacterTemplate::Wizard)
    }

    /// Level 1 Life Domain cleric.
    pub fn cleric() -> Character {
        from_template(CharacterTemplate::Cleric)
    }

    /// Level 5 warlock with two 3rd-level pact slots.
    pub fn warlock_5() -> Character {
        custom(
            "Vex",
            "Tiefling",
            "Warlock",
            5,
            AbilityScores::new(8, 14, 14, 12, 10, 18),
        )
    }

    /// Level 5 barbarian with three rages.
    pub fn barbarian_5() -> Character {
        custom(
            "Grog",
            "Goliath",
            "Barbarian",
            5,
            AbilityScores::new(18, 12, 16, 8, 10, 10),
        )
    }
}
