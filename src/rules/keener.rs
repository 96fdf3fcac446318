//! Keener's method
//!
//! Ratings are the Perron vector of a non-negative matrix of smoothed,
//! skewed score shares, found by power iteration. The vector is only unique
//! when the competition graph is connected, so a disconnected graph, including
//! a listed player with no games, is a `SolverFailure`.

use crate::error::{RatingsError, Result};
use crate::ratings::{PlayerIndex, RatingsList};
use crate::rules::info::{Computation, InputKind, OutputKind, Parameter, RuleInfo, StateModel};
use crate::rules::components::Components;
use crate::rules::Rule;
use crate::types::Competition;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_TOLERANCE: f64 = 1e-10;

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeenerScores {
    tolerance: f64,
    max_iterations: usize,
}

impl Default for KeenerScores {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KeenerScores {
    pub const NAME: &'static str = "KeenerScores";

    pub fn new(tolerance: f64, max_iterations: usize) -> Result<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(RatingsError::invalid_parameter(
                Self::NAME,
                format!("tolerance must be positive, got {}", tolerance),
            )
            .into());
        }
        if max_iterations == 0 {
            return Err(RatingsError::invalid_parameter(
                Self::NAME,
                "max_iterations must be at least 1",
            )
            .into());
        }

        Ok(Self {
            tolerance,
            max_iterations,
        })
    }

    fn build_matrix(
        &self,
        index: &PlayerIndex,
        competitions: &[Competition],
    ) -> Result<DMatrix<f64>> {
        let m = index.len();
        let mut scored = DMatrix::<f64>::zeros(m, m);
        let mut met = DMatrix::<f64>::zeros(m, m);
        let mut components = Components::new(m);

        for (row, competition) in competitions.iter().enumerate() {
            let (a, b) = index.resolve(Self::NAME, row, competition)?;
            let (score_a, score_b) = competition.scores().ok_or_else(|| {
                RatingsError::MissingScore {
                    rule: Self::NAME.to_string(),
                    row,
                }
            })?;
            if score_a < 0.0 || score_b < 0.0 {
                return Err(RatingsError::invalid_parameter(
                    Self::NAME,
                    format!("row {} has a negative score", row),
                )
                .into());
            }

            scored[(a, b)] += score_a;
            scored[(b, a)] += score_b;
            met[(a, b)] += 1.0;
            met[(b, a)] += 1.0;
            components.union(a, b);
        }
        components.require_connected(Self::NAME)?;

        let mut matrix = DMatrix::<f64>::zeros(m, m);
        for i in 0..m {
            let games: f64 = met.row(i).sum();
            if games == 0.0 {
                continue;
            }
            for j in 0..m {
                if i != j && met[(i, j)] > 0.0 {
                    let share = (scored[(i, j)] + 1.0) / (scored[(i, j)] + scored[(j, i)] + 2.0);
                    matrix[(i, j)] = skew(share) / games;
                }
            }
        }

        Ok(matrix)
    }
}

/// Keener's skewing function, spreading shares away from one half
fn skew(x: f64) -> f64 {
    let centred = x - 0.5;
    0.5 + centred.signum() * (2.0 * centred).abs().sqrt() / 2.0
}

impl Rule for KeenerScores {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            computation: Computation::Simultaneous,
            state_model: StateModel::None,
            input: InputKind::Score,
            output: OutputKind::Deterministic,
            model: "Keener Perron vector".to_string(),
            ties: true,
            factors: false,
            record: false,
            parameters: vec![
                Parameter::new("tolerance", "power iteration convergence threshold"),
                Parameter::new("max_iterations", "power iteration limit"),
            ],
        }
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        let index = PlayerIndex::from_ratings(ratings);
        let m = index.len();
        if m == 0 {
            return Ok(RatingsList::new());
        }

        // Shifting by the identity keeps the eigenvectors and makes the
        // iteration converge on two-player (periodic) graphs too.
        let shifted = self.build_matrix(&index, competitions)? + DMatrix::<f64>::identity(m, m);
        let mut vector = DVector::<f64>::from_element(m, 1.0 / m as f64);

        for iteration in 0..self.max_iterations {
            let next = &shifted * &vector;
            let total = next.sum();
            if !(total.is_finite() && total > 0.0) {
                return Err(RatingsError::SolverFailure {
                    rule: Self::NAME.to_string(),
                    reason: "power iteration collapsed to a zero vector".to_string(),
                }
                .into());
            }
            let next = next / total;
            let change = (&next - &vector).amax();
            vector = next;

            if change < self.tolerance {
                debug!(rule = Self::NAME, iterations = iteration + 1, "power iteration converged");
                return Ok(index.to_ratings(vector.iter()));
            }
        }

        Err(RatingsError::SolverFailure {
            rule: Self::NAME.to_string(),
            reason: format!(
                "power iteration did not converge in {} iterations",
                self.max_iterations
            ),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind_of;

    #[test]
    fn test_skew_fixed_points() {
        assert_eq!(skew(0.5), 0.5);
        assert!((skew(1.0) - 1.0).abs() < 1e-12);
        assert!(skew(0.0).abs() < 1e-12);
        assert!(skew(0.6) > 0.6);
    }

    #[test]
    fn test_dominant_player_rated_highest() {
        let ratings = RatingsList::uniform(["a", "b", "c"], 0.0);
        let games = vec![
            Competition::with_scores("a", "b", 10.0, 2.0),
            Competition::with_scores("a", "c", 8.0, 1.0),
            Competition::with_scores("b", "c", 6.0, 4.0),
        ];

        let result = KeenerScores::default().update_ratings(&ratings, &games).unwrap();

        let (a, b, c) = (
            result.get("a").unwrap(),
            result.get("b").unwrap(),
            result.get("c").unwrap(),
        );
        assert!(a > b && b > c);
        assert!((result.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_player_graph_converges() {
        let ratings = RatingsList::uniform(["a", "b"], 0.0);
        let games = vec![Competition::with_scores("a", "b", 10.0, 0.0)];
        let result = KeenerScores::default().update_ratings(&ratings, &games).unwrap();
        assert!(result.get("a").unwrap() > result.get("b").unwrap());
    }

    #[test]
    fn test_iteration_limit_is_reported() {
        let ratings = RatingsList::uniform(["a", "b", "c"], 0.0);
        let games = vec![
            Competition::with_scores("a", "b", 10.0, 2.0),
            Competition::with_scores("b", "c", 6.0, 4.0),
        ];
        let rule = KeenerScores::new(1e-300, 1).unwrap();
        let err = rule.update_ratings(&ratings, &games).unwrap_err();
        assert!(matches!(kind_of(&err), Some(RatingsError::SolverFailure { .. })));
    }

    #[test]
    fn test_disconnected_graph_is_reported() {
        let ratings = RatingsList::uniform(["a", "b", "c", "d"], 0.0);
        let games = vec![
            Competition::with_scores("a", "b", 10.0, 0.0),
            Competition::with_scores("c", "d", 1.0, 0.0),
        ];
        let err = KeenerScores::default().update_ratings(&ratings, &games).unwrap_err();
        assert!(matches!(kind_of(&err), Some(RatingsError::SolverFailure { .. })));
        assert!(err.to_string().contains("2 components"));
    }

    #[test]
    fn test_player_without_games_is_reported() {
        let ratings = RatingsList::uniform(["a", "b", "idle"], 0.0);
        let games = vec![Competition::with_scores("a", "b", 3.0, 1.0)];
        let err = KeenerScores::default().update_ratings(&ratings, &games).unwrap_err();
        assert!(matches!(kind_of(&err), Some(RatingsError::SolverFailure { .. })));
    }

    #[test]
    fn test_single_player_is_trivially_rated() {
        let ratings = RatingsList::uniform(["a"], 0.0);
        let result = KeenerScores::default().update_ratings(&ratings, &[]).unwrap();
        assert_eq!(result.get("a"), Some(1.0));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(KeenerScores::new(0.0, 10).is_err());
        assert!(KeenerScores::new(1e-6, 0).is_err());
    }

    #[test]
    fn test_negative_scores_rejected() {
        let ratings = RatingsList::uniform(["a", "b"], 0.0);
        let games = vec![Competition::with_scores("a", "b", -1.0, 0.0)];
        assert!(KeenerScores::default().update_ratings(&ratings, &games).is_err());
    }
}
