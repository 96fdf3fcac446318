//! Schedule generators

use crate::error::{RatingsError, Result};
use crate::ratings::RatingsList;
use crate::types::PlayerId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One scheduled pairing, not yet played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub player_a: PlayerId,
    pub player_b: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Generator {
    /// Every unordered pair meets `rounds` times
    RoundRobin { rounds: usize },
    /// `games` pairings of two distinct players chosen uniformly
    RandomPairs { games: usize },
}

impl Default for Generator {
    fn default() -> Self {
        Generator::RoundRobin { rounds: 1 }
    }
}

/// Build a schedule over the players of `ratings`
pub fn generate<R: Rng + ?Sized>(
    generator: Generator,
    ratings: &RatingsList,
    rng: &mut R,
) -> Result<Vec<Pairing>> {
    let players: Vec<&PlayerId> = ratings.players().collect();
    let m = players.len();
    if m < 2 {
        return Err(RatingsError::invalid_parameter(
            "generate",
            format!("need at least two players, got {}", m),
        )
        .into());
    }

    let pair = |a: usize, b: usize| Pairing {
        player_a: players[a].clone(),
        player_b: players[b].clone(),
    };

    let schedule = match generator {
        Generator::RoundRobin { rounds } => {
            let mut schedule = Vec::with_capacity(rounds * m * (m - 1) / 2);
            for _ in 0..rounds {
                for a in 0..m {
                    for b in (a + 1)..m {
                        schedule.push(pair(a, b));
                    }
                }
            }
            schedule
        }
        Generator::RandomPairs { games } => (0..games)
            .map(|_| {
                let a = rng.gen_range(0..m);
                let mut b = rng.gen_range(0..m - 1);
                if b >= a {
                    b += 1;
                }
                pair(a, b)
            })
            .collect(),
    };

    Ok(schedule)
}
