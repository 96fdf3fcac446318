//! Ratings snapshot
//!
//! A `RatingsList` maps every tracked player to a single numeric rating.
//! Rules treat it as immutable: updates always produce a new list.

use crate::types::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Snapshot of the current rating of every known player
///
/// Players are kept sorted by identifier so that iteration, and therefore
/// any index built from the list, is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingsList {
    ratings: BTreeMap<PlayerId, f64>,
}

impl RatingsList {
    /// Create an empty ratings list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list giving every player the same rating
    pub fn uniform<I, P>(players: I, rating: f64) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        players.into_iter().map(|p| (p.into(), rating)).collect()
    }

    /// Builder-style insert, replacing any existing rating
    pub fn with_rating(mut self, player_id: impl Into<PlayerId>, rating: f64) -> Self {
        self.ratings.insert(player_id.into(), rating);
        self
    }

    pub fn get(&self, player_id: &str) -> Option<f64> {
        self.ratings.get(player_id).copied()
    }

    /// Rating of a player, or `default` for a player the list has never seen
    pub fn get_or(&self, player_id: &str, default: f64) -> f64 {
        self.get(player_id).unwrap_or(default)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.ratings.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Players in stable (sorted) order
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.ratings.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, f64)> {
        self.ratings.iter().map(|(id, r)| (id, *r))
    }

    /// Sum of all ratings
    pub fn total(&self) -> f64 {
        self.ratings.values().sum()
    }

    /// Mean rating, or `None` for an empty list
    pub fn mean(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            None
        } else {
            Some(self.total() / self.ratings.len() as f64)
        }
    }

    /// Produce a new list with per-player deltas added
    ///
    /// Players that only appear in `deltas` are seeded at `default` first.
    pub fn apply_deltas(&self, deltas: &HashMap<PlayerId, f64>, default: f64) -> RatingsList {
        let mut ratings = self.ratings.clone();
        for (player_id, delta) in deltas {
            *ratings.entry(player_id.clone()).or_insert(default) += delta;
        }
        RatingsList { ratings }
    }

    /// Produce a new list by mapping every rating
    pub fn map(&self, f: impl Fn(f64) -> f64) -> RatingsList {
        RatingsList {
            ratings: self
                .ratings
                .iter()
                .map(|(id, r)| (id.clone(), f(*r)))
                .collect(),
        }
    }
}

impl FromIterator<(PlayerId, f64)> for RatingsList {
    fn from_iter<T: IntoIterator<Item = (PlayerId, f64)>>(iter: T) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RatingsList {
    type Item = (&'a PlayerId, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, PlayerId, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.ratings.iter()
    }
}
