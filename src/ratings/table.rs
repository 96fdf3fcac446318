//! Ratings trajectory table
//!
//! A `RatingsTable` is a pre-sized sequence of snapshots. Sequential rules
//! write the ratings after each batch into consecutive slots. Each slot is
//! written at most once. Running out of slots, or writing a slot that is
//! already filled, is not fatal: the write is rejected and reported as a
//! `RecordingOverflow` so the caller can decide what to do with it.

use crate::ratings::RatingsList;
use serde::{Deserialize, Serialize};

/// Why a snapshot was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowReason {
    BeyondCapacity,
    AlreadyRecorded,
}

/// Diagnostic emitted when a snapshot is not recorded in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingOverflow {
    /// Zero-based batch whose snapshot was dropped
    pub batch: usize,
    pub capacity: usize,
    pub reason: OverflowReason,
}

impl std::fmt::Display for RecordingOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            OverflowReason::BeyondCapacity => write!(
                f,
                "ratings table capacity {} exceeded, snapshot for batch {} not recorded",
                self.capacity, self.batch
            ),
            OverflowReason::AlreadyRecorded => write!(
                f,
                "ratings table slot {} already filled, snapshot for batch {} not recorded",
                self.batch, self.batch
            ),
        }
    }
}

/// Ordered, fixed-capacity sequence of ratings snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingsTable {
    slots: Vec<Option<RatingsList>>,
}

impl RatingsTable {
    /// Create a table with `capacity` empty slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store a snapshot in an empty `slot`
    ///
    /// Slots beyond capacity and slots that already hold a snapshot are
    /// rejected; the table is left unchanged.
    pub fn record(&mut self, slot: usize, ratings: RatingsList) -> Result<(), RecordingOverflow> {
        let capacity = self.capacity();
        let rejected = |reason| RecordingOverflow {
            batch: slot,
            capacity,
            reason,
        };
        match self.slots.get_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(ratings);
                Ok(())
            }
            Some(_) => Err(rejected(OverflowReason::AlreadyRecorded)),
            None => Err(rejected(OverflowReason::BeyondCapacity)),
        }
    }

    pub fn get(&self, slot: usize) -> Option<&RatingsList> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Number of populated slots
    pub fn recorded(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Populated snapshots in slot order
    pub fn snapshots(&self) -> impl Iterator<Item = &RatingsList> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Rating trajectory of one player across the populated slots
    pub fn trajectory(&self, player_id: &str) -> Vec<Option<f64>> {
        self.snapshots().map(|s| s.get(player_id)).collect()
    }

    /// Most recent populated snapshot
    pub fn last(&self) -> Option<&RatingsList> {
        self.slots.iter().rev().find_map(Option::as_ref)
    }
}
