//! Simultaneous least-squares rules: Massey, Colley and MasseyColley
//!
//! These rules ignore the ratings they are given (apart from the set of
//! players) and solve a dense linear system over the whole competition
//! table. Every call recomputes the answer from scratch.

use crate::error::{RatingsError, Result};
use crate::ratings::{PlayerIndex, RatingsList};
use crate::rules::info::{Computation, InputKind, OutputKind, RuleInfo, StateModel};
use crate::rules::components::Components;
use crate::rules::Rule;
use crate::types::Competition;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Colley's method: win/loss differentials against a Laplace-smoothed matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Colley;

/// Massey's method: least squares fit of score differentials
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Massey;

/// Colley matrix with Massey score differentials on the right-hand side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MasseyColley;

impl Colley {
    pub const NAME: &'static str = "Colley";
}

impl Massey {
    pub const NAME: &'static str = "Massey";
}

impl MasseyColley {
    pub const NAME: &'static str = "MasseyColley";
}

impl Rule for Colley {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        least_squares_info(InputKind::Outcome, "Colley matrix")
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        let (index, matrix, rhs) =
            colley_system(Self::NAME, ratings, competitions, |_, c| Ok(c.outcome.sign()))?;
        solve(Self::NAME, &index, matrix, rhs)
    }
}

impl Rule for MasseyColley {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        least_squares_info(InputKind::Score, "Colley matrix with score differentials")
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        let (index, matrix, rhs) = colley_system(Self::NAME, ratings, competitions, |row, c| {
            score_differential(Self::NAME, row, c)
        })?;
        solve(Self::NAME, &index, matrix, rhs)
    }
}

impl Rule for Massey {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        least_squares_info(InputKind::Score, "Massey least squares")
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

        let mut matrix = DMatrix::<f64>::zeros(m, m);
        let mut rhs = DVector::<f64>::zeros(m);
        let mut components = Components::new(m);

        for (row, competition) in competitions.iter().enumerate() {
            let (a, b) = index.resolve(Self::NAME, row, competition)?;
            let differential = score_differential(Self::NAME, row, competition)?;

            matrix[(a, a)] += 1.0;
            matrix[(b, b)] += 1.0;
            matrix[(a, b)] -= 1.0;
            matrix[(b, a)] -= 1.0;
            rhs[a] += differential;
            rhs[b] -= differential;
            components.union(a, b);
        }

        // The Laplacian is singular on a connected graph too; pin the
        // ratings to sum to zero instead of the last equation.
        components.require_connected(Self::NAME)?;
        matrix.row_mut(m - 1).fill(1.0);
        rhs[m - 1] = 0.0;

        solve(Self::NAME, &index, matrix, rhs)
    }
}

fn least_squares_info(input: InputKind, model: &str) -> RuleInfo {
    RuleInfo {
        computation: Computation::Simultaneous,
        state_model: StateModel::None,
        input,
        output: OutputKind::Deterministic,
        model: model.to_string(),
        ties: true,
        factors: false,
        record: false,
        parameters: Vec::new(),
    }
}

/// Build `C r = p` with `C = 2I + games` and `p = 2 + differentials`
///
/// Every column of `C` sums to 2, so the solution always sums to `m`.
fn colley_system<F>(
    rule: &str,
    ratings: &RatingsList,
    competitions: &[Competition],
    differential: F,
) -> Result<(PlayerIndex, DMatrix<f64>, DVector<f64>)>
where
    F: Fn(usize, &Competition) -> Result<f64>,
{
    let index = PlayerIndex::from_ratings(ratings);
    let m = index.len();

    let mut matrix = DMatrix::<f64>::from_diagonal_element(m, m, 2.0);
    let mut rhs = DVector::<f64>::from_element(m, 2.0);

    for (row, competition) in competitions.iter().enumerate() {
        let (a, b) = index.resolve(rule, row, competition)?;
        let d = differential(row, competition)?;

        matrix[(a, b)] -= 1.0;
        matrix[(b, a)] -= 1.0;
        matrix[(a, a)] += 1.0;
        matrix[(b, b)] += 1.0;
        rhs[a] += d;
        rhs[b] -= d;
    }

    Ok((index, matrix, rhs))
}

fn score_differential(rule: &str, row: usize, competition: &Competition) -> Result<f64> {
    competition
        .scores()
        .map(|(a, b)| a - b)
        .ok_or_else(|| {
            RatingsError::MissingScore {
                rule: rule.to_string(),
                row,
            }
            .into()
        })
}

fn solve(
    rule: &str,
    index: &PlayerIndex,
    matrix: DMatrix<f64>,
    rhs: DVector<f64>,
) -> Result<RatingsList> {
    if index.is_empty() {
        return Ok(RatingsList::new());
    }

    let solution = matrix.lu().solve(&rhs).ok_or_else(|| RatingsError::SolverFailure {
        rule: rule.to_string(),
        reason: "system matrix is singular".to_string(),
    })?;

    if solution.iter().any(|r| !r.is_finite()) {
        return Err(RatingsError::SolverFailure {
            rule: rule.to_string(),
            reason: "solution contains non-finite ratings".to_string(),
        }
        .into());
    }

    debug!(rule, players = index.len(), "solved ratings system");
    Ok(index.to_ratings(solution.iter()))
}
