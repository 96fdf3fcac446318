//! Proper scoring rules for three-way outcome predictions

use crate::types::Prediction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    Brier,
    Logarithmic,
    Quadratic,
    Spherical,
}

impl ScoringRule {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringRule::Brier => "Brier",
            ScoringRule::Logarithmic => "Logarithmic",
            ScoringRule::Quadratic => "Quadratic",
            ScoringRule::Spherical => "Spherical",
        }
    }
}

impl std::fmt::Display for ScoringRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Score of one prediction given the observed 1-based outcome class
pub fn scoring_function(rule: ScoringRule, prediction: &Prediction, class: usize) -> f64 {
    let p = prediction.as_array();
    let p_class = prediction.probability(class);
    let sum_squares: f64 = p.iter().map(|x| x * x).sum();

    match rule {
        ScoringRule::Brier => p
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let observed = if i + 1 == class { 1.0 } else { 0.0 };
                (x - observed).powi(2)
            })
            .sum(),
        ScoringRule::Logarithmic => p_class.ln(),
        ScoringRule::Quadratic => 2.0 * p_class - sum_squares,
        ScoringRule::Spherical => {
            if sum_squares > 0.0 {
                p_class / sum_squares.sqrt()
            } else {
                0.0
            }
        }
    }
}

/// +1 when larger scores are better, -1 when smaller scores are better
pub fn score_direction(rule: ScoringRule) -> i8 {
    match rule {
        ScoringRule::Brier => -1,
        ScoringRule::Logarithmic | ScoringRule::Quadratic | ScoringRule::Spherical => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ScoringRule; 4] = [
        ScoringRule::Brier,
        ScoringRule::Logarithmic,
        ScoringRule::Quadratic,
        ScoringRule::Spherical,
    ];

    #[test]
    fn test_perfect_prediction_scores() {
        let certain = Prediction::new(1.0, 0.0, 0.0);
        assert_eq!(scoring_function(ScoringRule::Brier, &certain, 1), 0.0);
        assert_eq!(scoring_function(ScoringRule::Logarithmic, &certain, 1), 0.0);
        assert_eq!(scoring_function(ScoringRule::Quadratic, &certain, 1), 1.0);
        assert_eq!(scoring_function(ScoringRule::Spherical, &certain, 1), 1.0);
    }

    #[test]
    fn test_hand_computed_values() {
        let p = Prediction::new(0.5, 0.3, 0.2);
        // (0.5-0)^2 + (0.3-1)^2 + (0.2-0)^2
        assert!((scoring_function(ScoringRule::Brier, &p, 2) - 0.78).abs() < 1e-12);
        assert!((scoring_function(ScoringRule::Logarithmic, &p, 3) - 0.2_f64.ln()).abs() < 1e-12);
        // 2 * 0.5 - 0.38
        assert!((scoring_function(ScoringRule::Quadratic, &p, 1) - 0.62).abs() < 1e-12);
        let spherical = scoring_function(ScoringRule::Spherical, &p, 1);
        assert!((spherical - 0.5 / 0.38_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_direction_agrees_with_better_prediction() {
        // A sharper correct prediction must score better under every rule
        let sharp = Prediction::new(0.9, 0.1, 0.0);
        let vague = Prediction::new(0.5, 0.5, 0.0);
        for rule in ALL {
            let gain = scoring_function(rule, &sharp, 1) - scoring_function(rule, &vague, 1);
            assert!(gain * score_direction(rule) as f64 > 0.0, "{} direction is wrong", rule);
        }
    }

    #[test]
    fn test_unmodelled_tie_observed() {
        let p = Prediction::new(0.6, 0.4, 0.0);
        assert_eq!(scoring_function(ScoringRule::Logarithmic, &p, 3), f64::NEG_INFINITY);
        assert_eq!(scoring_function(ScoringRule::Spherical, &p, 3), 0.0);
    }
}
