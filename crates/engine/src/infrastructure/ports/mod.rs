//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character storage (in-memory, JSON file, or anything keyed by id)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::CharacterRepo;
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use repos::MockCharacterRepo;
#[cfg(test)]
pub use testing::MockClockPort;
