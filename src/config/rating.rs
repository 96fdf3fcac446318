//! Rating system configuration

use crate::distribution::{Distribution, DEFAULT_SCALE};
use crate::rules::elo::{DEFAULT_K, DEFAULT_R0};
use serde::{Deserialize, Serialize};

/// Defaults used when a rule configuration leaves a parameter out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    pub default_rating: f64,
    pub k_factor: f64,
    /// Logistic scale of the default performance model
    pub scale: f64,
    pub draw: f64,
    pub batch_size: usize,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            default_rating: DEFAULT_R0,
            k_factor: DEFAULT_K,
            scale: DEFAULT_SCALE,
            draw: 1.0,
            batch_size: 1,
        }
    }
}

impl RatingSettings {
    pub fn distribution(&self) -> Distribution {
        Distribution::logistic(self.scale)
    }
}
