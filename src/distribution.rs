//! Performance models
//!
//! Elo-family rules only need the cumulative distribution of the difference
//! in performance between two players. The simulation engine additionally
//! draws performance noise from the same model.

use crate::error::{RatingsError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Logistic scale giving the classic Elo convention: 400 points = 10:1 odds
pub const DEFAULT_SCALE: f64 = 400.0 / std::f64::consts::LN_10;

/// A performance model seen through its distribution function
pub trait PerformanceModel {
    /// Probability that the performance noise is at most `x`
    fn cdf(&self, x: f64) -> f64;

    /// Draw one performance noise value
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;
}

/// Built-in performance models
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    Logistic { scale: f64 },
    Normal { sd: f64 },
}

impl Default for Distribution {
    fn default() -> Self {
        Distribution::Logistic {
            scale: DEFAULT_SCALE,
        }
    }
}

impl Distribution {
    pub fn logistic(scale: f64) -> Self {
        Distribution::Logistic { scale }
    }

    pub fn normal(sd: f64) -> Self {
        Distribution::Normal { sd }
    }

    /// Check the spread parameter on behalf of `rule`
    pub fn validate(&self, rule: &str) -> Result<()> {
        let spread = match self {
            Distribution::Logistic { scale } => scale,
            Distribution::Normal { sd } => sd,
        };
        if !(spread.is_finite() && *spread > 0.0) {
            return Err(RatingsError::invalid_parameter(
                rule,
                format!("distribution spread must be positive, got {}", spread),
            )
            .into());
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        match self {
            Distribution::Logistic { scale } => format!("logistic(scale={:.4})", scale),
            Distribution::Normal { sd } => format!("normal(sd={:.4})", sd),
        }
    }
}

impl PerformanceModel for Distribution {
    fn cdf(&self, x: f64) -> f64 {
        match *self {
            Distribution::Logistic { scale } => 1.0 / (1.0 + (-x / scale).exp()),
            Distribution::Normal { sd } => 0.5 * erfc(-x / (sd * std::f64::consts::SQRT_2)),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Distribution::Logistic { scale } => {
                // Inverse transform; keep u away from 0 and 1
                let u: f64 = rng.gen_range(f64::EPSILON..1.0 - f64::EPSILON);
                scale * (u / (1.0 - u)).ln()
            }
            Distribution::Normal { sd } => {
                // Box-Muller
                let u1: f64 = rng.gen::<f64>().max(1e-300);
                let u2: f64 = rng.gen();
                sd * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
            }
        }
    }
}

/// Complementary error function, Chebyshev fit with relative error below 1.5e-7
///
/// The fit is scaled so both branches meet at exactly 1 when `x` is zero,
/// which keeps the normal distribution function monotone across the origin.
fn erfc(x: f64) -> f64 {
    let ans = erfc_fit(x.abs()) / erfc_fit(0.0);
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

fn erfc_fit(z: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    t * poly.exp()
}
