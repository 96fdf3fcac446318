//! Common types used throughout the rating engine

use serde::{Deserialize, Serialize};

/// Unique identifier for players and teams
pub type PlayerId = String;

/// Result of a single pairwise competition, from player A's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Outcome {
    WinA,
    WinB,
    Tie,
}

impl Outcome {
    /// Sign of the outcome: +1 when A wins, -1 when B wins, 0 for a tie
    pub fn sign(self) -> f64 {
        match self {
            Outcome::WinA => 1.0,
            Outcome::WinB => -1.0,
            Outcome::Tie => 0.0,
        }
    }

    /// Observed scores `((sign(o)+1)/2, (sign(-o)+1)/2)` for A and B
    pub fn scores(self) -> (f64, f64) {
        let sign = self.sign();
        ((sign + 1.0) / 2.0, (-sign + 1.0) / 2.0)
    }

    /// 1-based class index used by the scoring rules
    pub fn class(self) -> usize {
        match self {
            Outcome::WinA => 1,
            Outcome::WinB => 2,
            Outcome::Tie => 3,
        }
    }

    /// Outcome implied by a (performance or score) difference
    pub fn from_difference(difference: f64, tie_margin: f64) -> Self {
        if difference.abs() <= tie_margin {
            Outcome::Tie
        } else if difference > 0.0 {
            Outcome::WinA
        } else {
            Outcome::WinB
        }
    }
}

impl TryFrom<i8> for Outcome {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Outcome::WinA),
            -1 => Ok(Outcome::WinB),
            0 => Ok(Outcome::Tie),
            other => Err(format!("Invalid outcome {}, expected 1, -1 or 0", other)),
        }
    }
}

impl From<Outcome> for i8 {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::WinA => 1,
            Outcome::WinB => -1,
            Outcome::Tie => 0,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::WinA => write!(f, "A wins"),
            Outcome::WinB => write!(f, "B wins"),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}

/// One row of a competition record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_b: Option<f64>,
    /// Extra per-player term such as home advantage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor_b: Option<f64>,
}

impl Competition {
    /// Create an outcome-only competition row
    pub fn new(
        player_a: impl Into<PlayerId>,
        player_b: impl Into<PlayerId>,
        outcome: Outcome,
    ) -> Self {
        Self {
            player_a: player_a.into(),
            player_b: player_b.into(),
            outcome,
            score_a: None,
            score_b: None,
            factor_a: None,
            factor_b: None,
        }
    }

    /// Create a row with scores; the outcome follows the score difference
    pub fn with_scores(
        player_a: impl Into<PlayerId>,
        player_b: impl Into<PlayerId>,
        score_a: f64,
        score_b: f64,
    ) -> Self {
        Self {
            score_a: Some(score_a),
            score_b: Some(score_b),
            ..Self::new(player_a, player_b, Outcome::from_difference(score_a - score_b, 0.0))
        }
    }

    pub fn factors(mut self, factor_a: f64, factor_b: f64) -> Self {
        self.factor_a = Some(factor_a);
        self.factor_b = Some(factor_b);
        self
    }

    /// Factor difference `factor_a - factor_b`, missing factors count as zero
    pub fn factor_difference(&self) -> f64 {
        self.factor_a.unwrap_or(0.0) - self.factor_b.unwrap_or(0.0)
    }

    /// Both scores, if the row carries them
    pub fn scores(&self) -> Option<(f64, f64)> {
        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// Probability distribution over {A wins, B wins, tie}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub win_a: f64,
    pub win_b: f64,
    pub tie: f64,
}

impl Prediction {
    pub fn new(win_a: f64, win_b: f64, tie: f64) -> Self {
        Self { win_a, win_b, tie }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.win_a, self.win_b, self.tie]
    }

    /// Probability of a 1-based outcome class
    pub fn probability(&self, class: usize) -> f64 {
        match class {
            1 => self.win_a,
            2 => self.win_b,
            3 => self.tie,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_scores() {
        assert_eq!(Outcome::WinA.scores(), (1.0, 0.0));
        assert_eq!(Outcome::WinB.scores(), (0.0, 1.0));
        assert_eq!(Outcome::Tie.scores(), (0.5, 0.5));
    }

    #[test]
    fn test_outcome_class_mapping() {
        assert_eq!(Outcome::WinA.class(), 1);
        assert_eq!(Outcome::WinB.class(), 2);
        assert_eq!(Outcome::Tie.class(), 3);
    }

    #[test]
    fn test_outcome_serde_as_integer() {
        let row: Competition = serde_json::from_str(
            r#"{"player_a":"a","player_b":"b","outcome":-1,"score_a":1.0,"score_b":3.0}"#,
        )
        .unwrap();
        assert_eq!(row.outcome, Outcome::WinB);
        assert_eq!(row.scores(), Some((1.0, 3.0)));
        assert_eq!(row.factor_difference(), 0.0);

        let json = serde_json::to_string(&Competition::new("a", "b", Outcome::Tie)).unwrap();
        assert!(json.contains("\"outcome\":0"));
    }

    #[test]
    fn test_outcome_rejects_invalid_integer() {
        let result: Result<Competition, _> =
            serde_json::from_str(r#"{"player_a":"a","player_b":"b","outcome":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_scores_sets_outcome() {
        assert_eq!(Competition::with_scores("a", "b", 3.0, 1.0).outcome, Outcome::WinA);
        assert_eq!(Competition::with_scores("a", "b", 1.0, 3.0).outcome, Outcome::WinB);
        assert_eq!(Competition::with_scores("a", "b", 2.0, 2.0).outcome, Outcome::Tie);
    }

    #[test]
    fn test_prediction_probability() {
        let prediction = Prediction::new(0.6, 0.3, 0.1);
        assert_eq!(prediction.probability(1), 0.6);
        assert_eq!(prediction.probability(2), 0.3);
        assert_eq!(prediction.probability(3), 0.1);
        assert_eq!(prediction.as_array(), [0.6, 0.3, 0.1]);
    }
}
