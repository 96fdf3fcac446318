//! Elo-family rules
//!
//! Both rules are recursive: they start from the ratings they are given,
//! compute every delta of the call against that frozen snapshot and apply
//! the summed deltas together. Calling a rule once per competition gives
//! classic sequential Elo; replaying longer histories is the job of
//! `Iterate`.

use crate::distribution::{Distribution, PerformanceModel};
use crate::error::{RatingsError, Result};
use crate::ratings::RatingsList;
use crate::rules::info::{Computation, InputKind, OutputKind, Parameter, RuleInfo, StateModel};
use crate::rules::Rule;
use crate::types::{Competition, PlayerId, Prediction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Default rating given to players the list has not seen yet
pub const DEFAULT_R0: f64 = 1500.0;

/// Default gain
pub const DEFAULT_K: f64 = 32.0;

/// Classic Elo with a pluggable performance model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elo {
    r0: f64,
    k: f64,
    dist: Distribution,
}

impl Default for Elo {
    fn default() -> Self {
        Self {
            r0: DEFAULT_R0,
            k: DEFAULT_K,
            dist: Distribution::default(),
        }
    }
}

impl Elo {
    pub const NAME: &'static str = "Elo";

    /// Create a new Elo rule, rejecting negative gain or default rating
    pub fn new(r0: f64, k: f64, dist: Distribution) -> Result<Self> {
        validate_gain(Self::NAME, r0, k)?;
        dist.validate(Self::NAME)?;

        Ok(Self { r0, k, dist })
    }

    pub fn r0(&self) -> f64 {
        self.r0
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn distribution(&self) -> Distribution {
        self.dist
    }

    /// Expected scores of A and B
    ///
    /// Evaluated separately rather than as `1 - expected_a` so that
    /// asymmetric performance models are honoured.
    pub fn expected_scores(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_difference: f64,
    ) -> (f64, f64) {
        let d = rating_a - rating_b;
        (
            self.dist.cdf(d + factor_difference),
            self.dist.cdf(-d - factor_difference),
        )
    }
}

impl Rule for Elo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            computation: Computation::Simultaneous,
            state_model: StateModel::Recursive,
            input: InputKind::Outcome,
            output: OutputKind::Probabilistic,
            model: format!("Elo with {} performance", self.dist.describe()),
            ties: false,
            factors: true,
            record: false,
            parameters: elo_parameters(),
        }
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        Ok(accumulate(Self::NAME, ratings, competitions, self.r0, self.k, |ra, rb, f| {
            self.expected_scores(ra, rb, f)
        }))
    }

    fn predict(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_a: Option<f64>,
        factor_b: Option<f64>,
    ) -> Result<Prediction> {
        let factor_difference = factor_a.unwrap_or(0.0) - factor_b.unwrap_or(0.0);
        let (win_a, win_b) = self.expected_scores(rating_a, rating_b, factor_difference);
        // Ties are not modelled
        Ok(Prediction::new(win_a, win_b, 0.0))
    }
}

/// Elo with a Davidson-style tie model
///
/// With `pa = F(d)` and `pb = F(-d)`, the tie weight is
/// `draw * sqrt(pa * pb)` and the three weights are normalised. A tie is
/// worth half a win when computing expected scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloF {
    elo: Elo,
    draw: f64,
}

impl EloF {
    pub const NAME: &'static str = "EloF";

    pub fn new(r0: f64, k: f64, dist: Distribution, draw: f64) -> Result<Self> {
        validate_gain(Self::NAME, r0, k)?;
        dist.validate(Self::NAME)?;
        if !(draw.is_finite() && draw >= 0.0) {
            return Err(RatingsError::invalid_parameter(
                Self::NAME,
                format!("draw weight must be non-negative, got {}", draw),
            )
            .into());
        }

        Ok(Self {
            elo: Elo { r0, k, dist },
            draw,
        })
    }

    pub fn draw(&self) -> f64 {
        self.draw
    }

    pub fn probabilities(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_difference: f64,
    ) -> Prediction {
        let (pa, pb) = self.elo.expected_scores(rating_a, rating_b, factor_difference);
        let tie = self.draw * (pa * pb).sqrt();
        let total = pa + pb + tie;
        if total <= 0.0 {
            return Prediction::new(0.5, 0.5, 0.0);
        }
        Prediction::new(pa / total, pb / total, tie / total)
    }

    fn expected_scores(&self, rating_a: f64, rating_b: f64, factor_difference: f64) -> (f64, f64) {
        let p = self.probabilities(rating_a, rating_b, factor_difference);
        (p.win_a + p.tie / 2.0, p.win_b + p.tie / 2.0)
    }
}

impl Rule for EloF {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        let mut parameters = elo_parameters();
        parameters.push(Parameter::new("draw", "tie weight of the Davidson model"));

        RuleInfo {
            computation: Computation::Simultaneous,
            state_model: StateModel::Recursive,
            input: InputKind::Outcome,
            output: OutputKind::Probabilistic,
            model: format!("Elo-Davidson with {} performance", self.elo.dist.describe()),
            ties: true,
            factors: true,
            record: false,
            parameters,
        }
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        Ok(accumulate(
            Self::NAME,
            ratings,
            competitions,
            self.elo.r0,
            self.elo.k,
            |ra, rb, f| self.expected_scores(ra, rb, f),
        ))
    }

    fn predict(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_a: Option<f64>,
        factor_b: Option<f64>,
    ) -> Result<Prediction> {
        let factor_difference = factor_a.unwrap_or(0.0) - factor_b.unwrap_or(0.0);
        Ok(self.probabilities(rating_a, rating_b, factor_difference))
    }
}

fn validate_gain(rule: &str, r0: f64, k: f64) -> Result<()> {
    if !(k.is_finite() && k >= 0.0) {
        let message = format!("K must be non-negative, got {}", k);
        return Err(RatingsError::invalid_parameter(rule, message).into());
    }
    if !(r0.is_finite() && r0 >= 0.0) {
        let message = format!("r0 must be non-negative, got {}", r0);
        return Err(RatingsError::invalid_parameter(rule, message).into());
    }
    Ok(())
}

fn elo_parameters() -> Vec<Parameter> {
    vec![
        Parameter::new("r0", "rating given to unseen players"),
        Parameter::new("K", "gain applied to the score surprise"),
        Parameter::new("dist", "performance distribution"),
    ]
}

/// Sum `K * (observed - expected)` per player against the frozen snapshot
fn accumulate<F>(
    rule: &str,
    ratings: &RatingsList,
    competitions: &[Competition],
    r0: f64,
    k: f64,
    expected: F,
) -> RatingsList
where
    F: Fn(f64, f64, f64) -> (f64, f64),
{
    let mut deltas: HashMap<PlayerId, f64> = HashMap::new();

    for competition in competitions {
        let rating_a = ratings.get_or(&competition.player_a, r0);
        let rating_b = ratings.get_or(&competition.player_b, r0);

        let (expected_a, expected_b) =
            expected(rating_a, rating_b, competition.factor_difference());
        let (outcome_a, outcome_b) = competition.outcome.scores();

        *deltas.entry(competition.player_a.clone()).or_insert(0.0) += k * (outcome_a - expected_a);
        *deltas.entry(competition.player_b.clone()).or_insert(0.0) += k * (outcome_b - expected_b);
    }

    debug!(
        rule,
        competitions = competitions.len(),
        players_updated = deltas.len(),
        "applied rating deltas"
    );

    ratings.apply_deltas(&deltas, r0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind_of;
    use crate::types::Outcome;

    fn two_players() -> RatingsList {
        RatingsList::uniform(["A", "B"], 1500.0)
    }

    #[test]
    fn test_equal_priors_win_moves_sixteen_points() {
        let elo = Elo::default();
        let result = elo
            .update_ratings(&two_players(), &[Competition::new("A", "B", Outcome::WinA)])
            .unwrap();

        assert!((result.get("A").unwrap() - 1516.0).abs() < 1e-9);
        assert!((result.get("B").unwrap() - 1484.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_between_equals_changes_nothing() {
        let elo = Elo::default();
        let result = elo
            .update_ratings(&two_players(), &[Competition::new("A", "B", Outcome::Tie)])
            .unwrap();
        assert_eq!(result, two_players());
    }

    #[test]
    fn test_unseen_players_seeded_at_r0() {
        let elo = Elo::new(1000.0, 20.0, Distribution::default()).unwrap();
        let ratings = RatingsList::new();
        let result = elo
            .update_ratings(&ratings, &[Competition::new("new1", "new2", Outcome::WinB)])
            .unwrap();

        assert!((result.get("new1").unwrap() - 990.0).abs() < 1e-9);
        assert!((result.get("new2").unwrap() - 1010.0).abs() < 1e-9);
        assert!(ratings.is_empty());
    }

    #[test]
    fn test_deltas_use_pre_call_snapshot() {
        // A beats B twice in one call: both deltas come from the same
        // expected score, so the gain is exactly twice one game.
        let elo = Elo::default();
        let games = vec![
            Competition::new("A", "B", Outcome::WinA),
            Competition::new("A", "B", Outcome::WinA),
        ];
        let result = elo.update_ratings(&two_players(), &games).unwrap();
        assert!((result.get("A").unwrap() - 1532.0).abs() < 1e-9);
    }

    #[test]
    fn test_factors_shift_expectation() {
        let elo = Elo::default();
        let home = elo.predict(1500.0, 1500.0, Some(100.0), None).unwrap();
        let away = elo.predict(1500.0, 1500.0, None, Some(100.0)).unwrap();

        assert!(home.win_a > 0.5);
        assert!(away.win_a < 0.5);
        assert_eq!(home.tie, 0.0);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        for (r0, k) in [(1500.0, -1.0), (-1.0, 32.0), (f64::NAN, 32.0)] {
            let err = Elo::new(r0, k, Distribution::default()).unwrap_err();
            assert!(matches!(kind_of(&err), Some(RatingsError::InvalidParameter { .. })));
        }
        assert!(Elo::new(0.0, 0.0, Distribution::default()).is_ok());
        assert!(EloF::new(1500.0, 32.0, Distribution::default(), -0.5).is_err());
    }

    #[test]
    fn test_elof_probabilities_sum_to_one() {
        let rule = EloF::new(1500.0, 32.0, Distribution::default(), 1.0).unwrap();
        let p = rule.probabilities(1600.0, 1500.0, 0.0);
        assert!((p.win_a + p.win_b + p.tie - 1.0).abs() < 1e-12);
        assert!(p.win_a > p.win_b);
        assert!(p.tie > 0.0);
    }

    #[test]
    fn test_elof_without_draw_weight_matches_elo_update() {
        let elof = EloF::new(1500.0, 32.0, Distribution::default(), 0.0).unwrap();
        let elo = Elo::default();
        let ratings = RatingsList::new().with_rating("A", 1600.0).with_rating("B", 1450.0);
        let games = vec![Competition::new("A", "B", Outcome::WinB)];

        let a = elof.update_ratings(&ratings, &games).unwrap();
        let b = elo.update_ratings(&ratings, &games).unwrap();
        assert!((a.get("A").unwrap() - b.get("A").unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_elof_tie_between_equals_is_neutral() {
        let rule = EloF::new(1500.0, 32.0, Distribution::default(), 2.0).unwrap();
        let result = rule
            .update_ratings(&two_players(), &[Competition::new("A", "B", Outcome::Tie)])
            .unwrap();
        assert!((result.get("A").unwrap() - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_info_reports_elo_shape() {
        let info = Elo::default().info();
        assert_eq!(info.state_model, StateModel::Recursive);
        assert_eq!(info.input, InputKind::Outcome);
        assert!(!info.ties);
        assert!(info.factors);
        assert_eq!(info.parameter_names(), vec!["r0", "K", "dist"]);
    }
}
