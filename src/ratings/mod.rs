//! Ratings data model
//!
//! This module provides the snapshot type every rule reads and produces,
//! the pre-sized table used to record trajectories, and the dense player
//! index used by the matrix solvers.

pub mod index;
pub mod list;
pub mod table;

// Re-export commonly used types
pub use index::PlayerIndex;
pub use list::RatingsList;
pub use table::{OverflowReason, RatingsTable, RecordingOverflow};
