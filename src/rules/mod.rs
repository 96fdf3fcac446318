//! Rating update rules
//!
//! Each rule lives in its own module and implements the `Rule` trait. The
//! closed `UpdateRule` enum is what callers hold: it dispatches to the
//! variant and enforces the cross-cutting parts of the contract, such as
//! refusing predictions from rules that do not consume outcomes.

pub(crate) mod components;
pub mod elo;
pub mod info;
pub mod iterate;
pub mod keener;
pub mod least_squares;
pub mod revert;

use crate::error::{RatingsError, Result};
use crate::ratings::{RatingsList, RatingsTable, RecordingOverflow};
use crate::types::{Competition, Prediction};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use elo::{Elo, EloF};
pub use info::{Computation, InputKind, OutputKind, Parameter, RuleInfo, StateModel};
pub use iterate::{Iterate, SampleIterate};
pub use keener::KeenerScores;
pub use least_squares::{Colley, Massey, MasseyColley};
pub use revert::Revert;

/// Contract every rating rule implements
pub trait Rule {
    /// Canonical rule name, used in errors, logs and configuration
    fn name(&self) -> &'static str;

    /// Describe the rule
    fn info(&self) -> RuleInfo;

    /// Compute new ratings from `ratings` and a competition table
    ///
    /// The input list is never modified. The result covers at least every
    /// player of the input list.
    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList>;

    /// Outcome probabilities for one pairing
    fn predict(
        &self,
        _rating_a: f64,
        _rating_b: f64,
        _factor_a: Option<f64>,
        _factor_b: Option<f64>,
    ) -> Result<Prediction> {
        Err(RatingsError::NotImplemented {
            rule: self.name().to_string(),
            operation: "predict_outcome".to_string(),
        }
        .into())
    }
}

/// Ratings produced by a recording run, with any dropped snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsUpdate {
    pub ratings: RatingsList,
    pub overflows: Vec<RecordingOverflow>,
}

/// The closed family of rating rules
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateRule {
    Elo(Elo),
    EloF(EloF),
    Massey(Massey),
    Colley(Colley),
    MasseyColley(MasseyColley),
    KeenerScores(KeenerScores),
    Revert(Revert),
    Iterate(Iterate),
    SampleIterate(SampleIterate),
}

macro_rules! dispatch {
    ($self:expr, $rule:ident => $body:expr) => {
        match $self {
            UpdateRule::Elo($rule) => $body,
            UpdateRule::EloF($rule) => $body,
            UpdateRule::Massey($rule) => $body,
            UpdateRule::Colley($rule) => $body,
            UpdateRule::MasseyColley($rule) => $body,
            UpdateRule::KeenerScores($rule) => $body,
            UpdateRule::Revert($rule) => $body,
            UpdateRule::Iterate($rule) => $body,
            UpdateRule::SampleIterate($rule) => $body,
        }
    };
}

impl UpdateRule {
    /// Names accepted by `config::RuleConfig`
    pub const NAMES: [&'static str; 9] = [
        Elo::NAME,
        EloF::NAME,
        Massey::NAME,
        Colley::NAME,
        MasseyColley::NAME,
        KeenerScores::NAME,
        Revert::NAME,
        Iterate::NAME,
        SampleIterate::NAME,
    ];

    pub fn name(&self) -> &'static str {
        dispatch!(self, rule => rule.name())
    }

    pub fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        dispatch!(self, rule => rule.update_ratings(ratings, competitions))
    }

    pub fn update_info(&self) -> RuleInfo {
        dispatch!(self, rule => rule.info())
    }

    /// Update ratings while recording the trajectory into `table`
    ///
    /// Only rules that report `record` support this. Snapshots that do not
    /// fit are returned as overflows; the run itself always completes.
    pub fn update_ratings_recorded(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
        table: &mut RatingsTable,
    ) -> Result<RatingsUpdate> {
        match self {
            UpdateRule::Iterate(rule) => {
                rule.update_ratings_recorded(ratings, competitions, Some(table))
            }
            UpdateRule::SampleIterate(rule) => {
                rule.update_ratings_recorded(ratings, competitions, Some(table))
            }
            other => Err(RatingsError::UnsupportedOperation {
                rule: other.name().to_string(),
                operation: "update_ratings_recorded".to_string(),
            }
            .into()),
        }
    }

    /// Outcome probabilities `[A wins, B wins, tie]` for one pairing
    ///
    /// Only rules whose input is outcome-based can predict.
    pub fn predict_outcome(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_a: Option<f64>,
        factor_b: Option<f64>,
    ) -> Result<Prediction> {
        if self.update_info().input != InputKind::Outcome {
            return Err(RatingsError::UnsupportedOperation {
                rule: self.name().to_string(),
                operation: "predict_outcome".to_string(),
            }
            .into());
        }
        dispatch!(self, rule => rule.predict(rating_a, rating_b, factor_a, factor_b))
    }
}

impl From<Elo> for UpdateRule {
    fn from(rule: Elo) -> Self {
        UpdateRule::Elo(rule)
    }
}

impl From<EloF> for UpdateRule {
    fn from(rule: EloF) -> Self {
        UpdateRule::EloF(rule)
    }
}

impl From<Massey> for UpdateRule {
    fn from(rule: Massey) -> Self {
        UpdateRule::Massey(rule)
    }
}

impl From<Colley> for UpdateRule {
    fn from(rule: Colley) -> Self {
        UpdateRule::Colley(rule)
    }
}

impl From<MasseyColley> for UpdateRule {
    fn from(rule: MasseyColley) -> Self {
        UpdateRule::MasseyColley(rule)
    }
}

impl From<KeenerScores> for UpdateRule {
    fn from(rule: KeenerScores) -> Self {
        UpdateRule::KeenerScores(rule)
    }
}

impl From<Revert> for UpdateRule {
    fn from(rule: Revert) -> Self {
        UpdateRule::Revert(rule)
    }
}

impl From<Iterate> for UpdateRule {
    fn from(rule: Iterate) -> Self {
        UpdateRule::Iterate(rule)
    }
}

impl From<SampleIterate> for UpdateRule {
    fn from(rule: SampleIterate) -> Self {
        UpdateRule::SampleIterate(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind_of;
    use crate::types::Outcome;

    #[test]
    fn test_names_match_variants() {
        let rules: Vec<UpdateRule> = vec![
            Elo::default().into(),
            Colley.into(),
            Massey.into(),
            MasseyColley.into(),
            KeenerScores::default().into(),
        ];
        for rule in rules {
            assert!(UpdateRule::NAMES.contains(&rule.name()));
        }
    }

    #[test]
    fn test_predict_requires_outcome_input() {
        let err = UpdateRule::Massey(Massey)
            .predict_outcome(1.0, 0.0, None, None)
            .unwrap_err();
        assert_eq!(
            kind_of(&err),
            Some(&RatingsError::UnsupportedOperation {
                rule: "Massey".to_string(),
                operation: "predict_outcome".to_string(),
            })
        );

        let revert: UpdateRule = Revert::new(0.0, 0.5).unwrap().into();
        let err = revert.predict_outcome(1.0, 0.0, None, None).unwrap_err();
        assert!(matches!(kind_of(&err), Some(RatingsError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_colley_prediction_not_implemented() {
        let err = UpdateRule::Colley(Colley)
            .predict_outcome(1.0, 0.0, None, None)
            .unwrap_err();
        assert!(matches!(kind_of(&err), Some(RatingsError::NotImplemented { .. })));
    }

    #[test]
    fn test_iterate_prediction_delegates() {
        let elo = UpdateRule::Elo(Elo::default());
        let iterate: UpdateRule = Iterate::new(elo.clone(), 4).unwrap().into();

        assert_eq!(
            iterate.predict_outcome(1600.0, 1500.0, None, None).unwrap(),
            elo.predict_outcome(1600.0, 1500.0, None, None).unwrap()
        );
    }

    #[test]
    fn test_recording_requires_recording_rule() {
        let mut table = RatingsTable::with_capacity(1);
        let err = UpdateRule::Elo(Elo::default())
            .update_ratings_recorded(&RatingsList::new(), &[], &mut table)
            .unwrap_err();
        assert!(matches!(kind_of(&err), Some(RatingsError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_dispatch_reaches_variant() {
        let ratings = RatingsList::uniform(["A", "B"], 1500.0);
        let games = [Competition::new("A", "B", Outcome::WinA)];

        let via_enum = UpdateRule::Elo(Elo::default())
            .update_ratings(&ratings, &games)
            .unwrap();
        let direct = Elo::default().update_ratings(&ratings, &games).unwrap();

        assert_eq!(via_enum, direct);
    }
}
