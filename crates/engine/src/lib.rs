//! D&D Helper engine library.
//!
//! Storage, composition and character-id-addressed use cases over the
//! `dndhelper-domain` rules engine.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping storage with schema migration
//! - `use_cases/` - User story orchestration across entities
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures and builders shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
