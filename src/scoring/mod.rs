//! Predictive scoring of rating rules
//!
//! A scoring rule turns one prediction and the observed outcome into a
//! number; the engine averages it over an outcome table.

pub mod engine;
pub mod scoring_rule;

// Re-export commonly used types
pub use engine::score_ratings;
pub use scoring_rule::{score_direction, scoring_function, ScoringRule};
