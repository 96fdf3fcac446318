//! Rule selection from configuration
//!
//! A `RuleConfig` names a rule and carries the parameters it needs. Missing
//! parameters fall back to `RatingSettings`; composite rules nest the
//! configuration of the rule they wrap under `rule`.

use crate::config::rating::RatingSettings;
use crate::distribution::Distribution;
use crate::error::{RatingsError, Result};
use crate::rules::keener::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::rules::{
    Colley, Elo, EloF, Iterate, KeenerScores, Massey, MasseyColley, Revert, SampleIterate,
    UpdateRule,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batches: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Wrapped rule for `Iterate` and `SampleIterate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Box<RuleConfig>>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::named(Elo::NAME)
    }
}

impl RuleConfig {
    /// Configuration naming `name` with every parameter left at its default
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            r0: None,
            k: None,
            distribution: None,
            draw: None,
            fraction: None,
            tolerance: None,
            max_iterations: None,
            batch_size: None,
            batches: None,
            seed: None,
            rule: None,
        }
    }

    /// Switch to rule `name`, keeping every configured parameter and any
    /// wrapped rule
    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Wrap `inner` in this (composite) rule
    pub fn wrapping(mut self, inner: RuleConfig) -> Self {
        self.rule = Some(Box::new(inner));
        self
    }

    /// Build and validate the configured rule
    pub fn build(&self, defaults: &RatingSettings) -> Result<UpdateRule> {
        let canonical = UpdateRule::NAMES
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&self.name))
            .ok_or_else(|| RatingsError::UndefinedRule {
                name: self.name.clone(),
            })?;

        let r0 = self.r0.unwrap_or(defaults.default_rating);
        let k = self.k.unwrap_or(defaults.k_factor);
        let dist = self.distribution.unwrap_or_else(|| defaults.distribution());
        let batch_size = self.batch_size.unwrap_or(defaults.batch_size);

        let rule: UpdateRule = match *canonical {
            Elo::NAME => Elo::new(r0, k, dist)?.into(),
            EloF::NAME => EloF::new(r0, k, dist, self.draw.unwrap_or(defaults.draw))?.into(),
            Massey::NAME => Massey.into(),
            Colley::NAME => Colley.into(),
            MasseyColley::NAME => MasseyColley.into(),
            KeenerScores::NAME => KeenerScores::new(
                self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
                self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            )?
            .into(),
            Revert::NAME => Revert::new(r0, self.fraction.unwrap_or(0.0))?.into(),
            Iterate::NAME => Iterate::new(self.inner(canonical, defaults)?, batch_size)?.into(),
            SampleIterate::NAME => SampleIterate::new(
                self.inner(canonical, defaults)?,
                batch_size,
                self.batches.unwrap_or(1),
                self.seed.unwrap_or(0),
            )?
            .into(),
            other => {
                return Err(RatingsError::UndefinedRule {
                    name: other.to_string(),
                }
                .into())
            }
        };

        debug!(rule = rule.name(), "built rule from configuration");
        Ok(rule)
    }

    fn inner(&self, outer: &str, defaults: &RatingSettings) -> Result<UpdateRule> {
        self.rule
            .as_ref()
            .ok_or_else(|| RatingsError::invalid_parameter(outer, "missing wrapped `rule`"))?
            .build(defaults)
    }
}
