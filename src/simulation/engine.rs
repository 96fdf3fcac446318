//! Playing out a schedule

use crate::distribution::{Distribution, PerformanceModel};
use crate::error::{RatingsError, Result};
use crate::ratings::RatingsList;
use crate::simulation::generator::{generate, Generator, Pairing};
use crate::types::{Competition, Outcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything needed to simulate a season from a ratings list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub generator: Generator,
    pub model: Distribution,
    /// Performance gap at or below which a game is a tie
    pub tie_margin: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            generator: Generator::default(),
            model: Distribution::default(),
            tie_margin: 0.0,
            seed: 0,
        }
    }
}

/// Play every pairing once
///
/// Each player performs at `rating + noise`; the performances become the
/// row's scores and their difference decides the outcome.
pub fn simulate<M, R>(
    model: &M,
    ratings: &RatingsList,
    pairings: &[Pairing],
    tie_margin: f64,
    rng: &mut R,
) -> Result<Vec<Competition>>
where
    M: PerformanceModel,
    R: Rng + ?Sized,
{
    if !(tie_margin.is_finite() && tie_margin >= 0.0) {
        return Err(RatingsError::invalid_parameter(
            "simulate",
            format!("tie margin must be non-negative, got {}", tie_margin),
        )
        .into());
    }

    let lookup = |row: usize, player_id: &str| {
        ratings.get(player_id).ok_or_else(|| RatingsError::PlayerNotFound {
            rule: "simulate".to_string(),
            row,
            player_id: player_id.to_string(),
        })
    };

    let mut competitions = Vec::with_capacity(pairings.len());
    for (row, pairing) in pairings.iter().enumerate() {
        let perf_a = lookup(row, &pairing.player_a)? + model.sample(rng);
        let perf_b = lookup(row, &pairing.player_b)? + model.sample(rng);

        competitions.push(Competition {
            score_a: Some(perf_a),
            score_b: Some(perf_b),
            ..Competition::new(
                pairing.player_a.clone(),
                pairing.player_b.clone(),
                Outcome::from_difference(perf_a - perf_b, tie_margin),
            )
        });
    }

    debug!(games = competitions.len(), "simulated competitions");
    Ok(competitions)
}

/// Generate a schedule and play it out with a generator seeded from the config
pub fn simulate_season(
    config: &SimulationConfig,
    ratings: &RatingsList,
) -> Result<Vec<Competition>> {
    config.model.validate("simulate")?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let pairings = generate(config.generator, ratings, &mut rng)?;
    simulate(&config.model, ratings, &pairings, config.tie_margin, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stronger_player_wins_more() {
        let ratings = RatingsList::new().with_rating("strong", 1800.0).with_rating("weak", 1400.0);
        let config = SimulationConfig {
            generator: Generator::RoundRobin { rounds: 500 },
            seed: 11,
            ..SimulationConfig::default()
        };

        let games = simulate_season(&config, &ratings).unwrap();
        let strong_wins = games
            .iter()
            .filter(|g| g.player_a == "strong" && g.outcome == Outcome::WinA)
            .count();

        assert_eq!(games.len(), 500);
        assert!(strong_wins > 350, "strong won only {} of 500", strong_wins);
    }

    #[test]
    fn test_same_seed_same_season() {
        let ratings = RatingsList::uniform(["a", "b", "c"], 1500.0);
        let config = SimulationConfig {
            generator: Generator::RandomPairs { games: 20 },
            seed: 3,
            ..SimulationConfig::default()
        };

        assert_eq!(
            simulate_season(&config, &ratings).unwrap(),
            simulate_season(&config, &ratings).unwrap()
        );
    }

    #[test]
    fn test_rows_carry_consistent_scores() {
        let ratings = RatingsList::uniform(["a", "b"], 1500.0);
        let config = SimulationConfig {
            generator: Generator::RoundRobin { rounds: 50 },
            tie_margin: 10.0,
            ..SimulationConfig::default()
        };

        for game in simulate_season(&config, &ratings).unwrap() {
            let (a, b) = game.scores().unwrap();
            assert_eq!(game.outcome, Outcome::from_difference(a - b, 10.0));
        }
    }

    #[test]
    fn test_unknown_player_in_pairing() {
        let ratings = RatingsList::uniform(["a"], 1500.0);
        let pairings = vec![Pairing {
            player_a: "a".to_string(),
            player_b: "b".to_string(),
        }];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(simulate(&Distribution::default(), &ratings, &pairings, 0.0, &mut rng).is_err());
    }

    #[test]
    fn test_negative_tie_margin_rejected() {
        let ratings = RatingsList::uniform(["a", "b"], 1500.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(simulate(&Distribution::default(), &ratings, &[], -1.0, &mut rng).is_err());
    }
}
