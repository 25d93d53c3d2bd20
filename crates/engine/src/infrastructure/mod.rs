//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod json_store;
pub mod memory_repo;
pub mod ports;
