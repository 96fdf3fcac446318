//! Synthetic competition generation
//!
//! Schedules are produced by a generator, then played out by drawing each
//! player's performance as rating plus noise from a performance model.

pub mod engine;
pub mod generator;

// Re-export commonly used types
pub use engine::{simulate, simulate_season, SimulationConfig};
pub use generator::{generate, Generator, Pairing};
