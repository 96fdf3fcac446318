//! Pairwise Ratings - rating rules for head-to-head competitions
//!
//! This crate provides recursive (Elo family) and batch (least squares,
//! Keener) rating rules over a shared ratings data model, composite rules
//! that replay a table in batches, predictive scoring of rules and a
//! simulator for synthetic competition tables.

pub mod config;
pub mod distribution;
pub mod error;
pub mod ratings;
pub mod rules;
pub mod scoring;
pub mod simulation;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingsError, Result};
pub use types::*;

// Re-export key components
pub use distribution::{Distribution, PerformanceModel};
pub use ratings::{RatingsList, RatingsTable};
pub use rules::{Rule, RuleInfo, UpdateRule};
pub use scoring::{score_ratings, ScoringRule};
pub use simulation::{generate, simulate, simulate_season, Generator, SimulationConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
