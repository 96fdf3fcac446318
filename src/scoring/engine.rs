//! Averaging a scoring rule over an outcome table

use crate::error::{RatingsError, Result};
use crate::ratings::RatingsList;
use crate::rules::UpdateRule;
use crate::scoring::scoring_rule::{scoring_function, ScoringRule};
use crate::types::Competition;
use tracing::debug;

/// Mean score of `rule`'s predictions over `outcomes`
///
/// Each row is predicted from the two players' ratings and factors, and its
/// outcome mapped to a class (`+1 -> 1`, `-1 -> 2`, `0 -> 3`).
pub fn score_ratings(
    scoring: ScoringRule,
    outcomes: &[Competition],
    rule: &UpdateRule,
    ratings: &RatingsList,
) -> Result<f64> {
    if outcomes.is_empty() {
        return Err(RatingsError::invalid_parameter(scoring.name(), "no outcomes to score").into());
    }

    let lookup = |row: usize, player_id: &str| {
        ratings.get(player_id).ok_or_else(|| RatingsError::PlayerNotFound {
            rule: rule.name().to_string(),
            row,
            player_id: player_id.to_string(),
        })
    };

    let mut total = 0.0;
    for (row, outcome) in outcomes.iter().enumerate() {
        let rating_a = lookup(row, &outcome.player_a)?;
        let rating_b = lookup(row, &outcome.player_b)?;

        let prediction =
            rule.predict_outcome(rating_a, rating_b, outcome.factor_a, outcome.factor_b)?;
        total += scoring_function(scoring, &prediction, outcome.outcome.class());
    }

    let score = total / outcomes.len() as f64;
    debug!(
        scoring = scoring.name(),
        rule = rule.name(),
        rows = outcomes.len(),
        score,
        "scored predictions"
    );
    Ok(score)
}
