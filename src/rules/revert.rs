//! Reversion towards a reference rating
//!
//! Moves every rating a fixed fraction of the way back to `r0`, ignoring
//! the competitions. Typically used between seasons, either directly or
//! inside `Iterate`.

use crate::error::{RatingsError, Result};
use crate::ratings::RatingsList;
use crate::rules::info::{Computation, InputKind, OutputKind, Parameter, RuleInfo, StateModel};
use crate::rules::Rule;
use crate::types::Competition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revert {
    r0: f64,
    fraction: f64,
}

impl Revert {
    pub const NAME: &'static str = "Revert";

    pub fn new(r0: f64, fraction: f64) -> Result<Self> {
        if !r0.is_finite() {
            return Err(RatingsError::invalid_parameter(Self::NAME, "r0 must be finite").into());
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(RatingsError::invalid_parameter(
                Self::NAME,
                format!("fraction must lie in [0, 1], got {}", fraction),
            )
            .into());
        }

        Ok(Self { r0, fraction })
    }
}

impl Rule for Revert {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            computation: Computation::Simultaneous,
            state_model: StateModel::Recursive,
            input: InputKind::None,
            output: OutputKind::Deterministic,
            model: "reversion to the mean".to_string(),
            ties: false,
            factors: false,
            record: false,
            parameters: vec![
                Parameter::new("r0", "rating reverted towards"),
                Parameter::new("fraction", "share of the gap closed per call"),
            ],
        }
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        _competitions: &[Competition],
    ) -> Result<RatingsList> {
        Ok(ratings.map(|r| r + self.fraction * (self.r0 - r)))
    }
}
