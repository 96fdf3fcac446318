//! Dense player index for the matrix-based rules

use crate::error::{RatingsError, Result};
use crate::ratings::RatingsList;
use crate::types::{Competition, PlayerId};
use std::collections::HashMap;

/// Bijection between player identifiers and positions `0..m`
///
/// Built once per rule invocation from a ratings list and never mutated.
#[derive(Debug, Clone)]
pub struct PlayerIndex {
    players: Vec<PlayerId>,
    positions: HashMap<PlayerId, usize>,
}

impl PlayerIndex {
    /// Index the players of a ratings list in its stable order
    pub fn from_ratings(ratings: &RatingsList) -> Self {
        let players: Vec<PlayerId> = ratings.players().cloned().collect();
        let positions = players
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        Self { players, positions }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn position(&self, player_id: &str) -> Option<usize> {
        self.positions.get(player_id).copied()
    }

    pub fn player(&self, position: usize) -> Option<&PlayerId> {
        self.players.get(position)
    }

    /// Positions of both players of a competition row
    pub fn resolve(
        &self,
        rule: &str,
        row: usize,
        competition: &Competition,
    ) -> Result<(usize, usize)> {
        let lookup = |player_id: &PlayerId| {
            self.position(player_id).ok_or_else(|| RatingsError::PlayerNotFound {
                rule: rule.to_string(),
                row,
                player_id: player_id.clone(),
            })
        };

        Ok((lookup(&competition.player_a)?, lookup(&competition.player_b)?))
    }

    /// Map a solved vector back to player identifiers
    pub fn to_ratings<'a>(&self, values: impl IntoIterator<Item = &'a f64>) -> RatingsList {
        self.players.iter().cloned().zip(values.into_iter().copied()).collect()
    }
}
