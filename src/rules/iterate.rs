//! Sequential replay of a recursive rule
//!
//! `Iterate` splits the competition table into consecutive windows and feeds
//! them, in order, through its sub-rule, threading the ratings from one
//! window to the next. `SampleIterate` does the same with windows drawn at
//! random (with replacement) from the table. Both can record the ratings
//! after every batch into a `RatingsTable`; running out of slots only
//! produces warnings.

use crate::error::{RatingsError, Result};
use crate::ratings::{RatingsList, RatingsTable};
use crate::rules::info::{Computation, Parameter, RuleInfo, StateModel};
use crate::rules::{RatingsUpdate, Rule, UpdateRule};
use crate::types::{Competition, Prediction};
use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Replays competitions through a recursive rule in fixed-size ordered batches
#[derive(Debug, Clone, PartialEq)]
pub struct Iterate {
    rule: Box<UpdateRule>,
    batch_size: usize,
}

impl Iterate {
    pub const NAME: &'static str = "Iterate";

    /// Wrap `rule`, which must build on prior ratings
    pub fn new(rule: UpdateRule, batch_size: usize) -> Result<Self> {
        validate_wrapped(Self::NAME, &rule, batch_size)?;

        Ok(Self {
            rule: Box::new(rule),
            batch_size,
        })
    }

    pub fn rule(&self) -> &UpdateRule {
        &self.rule
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn update_ratings_recorded(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
        table: Option<&mut RatingsTable>,
    ) -> Result<RatingsUpdate> {
        replay(
            Self::NAME,
            &self.rule,
            ratings,
            competitions.chunks(self.batch_size),
            table,
        )
    }
}

impl Rule for Iterate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        wrapped_info(
            &self.rule,
            vec![
                Parameter::new("rule", "recursive rule being replayed"),
                Parameter::new("batch_size", "competitions per batch"),
            ],
        )
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        Ok(self.update_ratings_recorded(ratings, competitions, None)?.ratings)
    }

    fn predict(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_a: Option<f64>,
        factor_b: Option<f64>,
    ) -> Result<Prediction> {
        self.rule.predict_outcome(rating_a, rating_b, factor_a, factor_b)
    }
}

/// Replays randomly sampled batches through a recursive rule
///
/// Each of the `batches` windows holds `batch_size` rows drawn uniformly
/// with replacement. The generator is seeded from `seed` on every call, so
/// repeated calls give identical results.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleIterate {
    rule: Box<UpdateRule>,
    batch_size: usize,
    batches: usize,
    seed: u64,
}

impl SampleIterate {
    pub const NAME: &'static str = "SampleIterate";

    pub fn new(rule: UpdateRule, batch_size: usize, batches: usize, seed: u64) -> Result<Self> {
        validate_wrapped(Self::NAME, &rule, batch_size)?;
        if batches == 0 {
            return Err(
                RatingsError::invalid_parameter(Self::NAME, "batches must be at least 1").into(),
            );
        }

        Ok(Self {
            rule: Box::new(rule),
            batch_size,
            batches,
            seed,
        })
    }

    pub fn rule(&self) -> &UpdateRule {
        &self.rule
    }

    pub fn update_ratings_recorded(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
        table: Option<&mut RatingsTable>,
    ) -> Result<RatingsUpdate> {
        if competitions.is_empty() {
            debug!(rule = Self::NAME, "no competitions to sample from");
            return Ok(RatingsUpdate {
                ratings: ratings.clone(),
                overflows: Vec::new(),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let batches: Vec<Vec<Competition>> = (0..self.batches)
            .map(|_| {
                (0..self.batch_size)
                    .map(|_| competitions[rng.gen_range(0..competitions.len())].clone())
                    .collect()
            })
            .collect();

        replay(Self::NAME, &self.rule, ratings, batches, table)
    }
}

impl Rule for SampleIterate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> RuleInfo {
        wrapped_info(
            &self.rule,
            vec![
                Parameter::new("rule", "recursive rule being replayed"),
                Parameter::new("batch_size", "competitions per sampled batch"),
                Parameter::new("batches", "number of sampled batches"),
                Parameter::new("seed", "random seed for sampling"),
            ],
        )
    }

    fn update_ratings(
        &self,
        ratings: &RatingsList,
        competitions: &[Competition],
    ) -> Result<RatingsList> {
        Ok(self.update_ratings_recorded(ratings, competitions, None)?.ratings)
    }

    fn predict(
        &self,
        rating_a: f64,
        rating_b: f64,
        factor_a: Option<f64>,
        factor_b: Option<f64>,
    ) -> Result<Prediction> {
        self.rule.predict_outcome(rating_a, rating_b, factor_a, factor_b)
    }
}

fn validate_wrapped(rule: &str, wrapped: &UpdateRule, batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(RatingsError::invalid_parameter(rule, "batch_size must be at least 1").into());
    }
    if !wrapped.update_info().is_recursive() {
        return Err(RatingsError::invalid_parameter(
            rule,
            format!("{} does not build on prior ratings and cannot be iterated", wrapped.name()),
        )
        .into());
    }
    Ok(())
}

/// Metadata of a wrapper: the sub-rule's shape, sequential and recording
fn wrapped_info(wrapped: &UpdateRule, mut parameters: Vec<Parameter>) -> RuleInfo {
    let inner = wrapped.update_info();
    parameters.extend(inner.parameters);

    RuleInfo {
        computation: Computation::Sequential,
        state_model: StateModel::Recursive,
        input: inner.input,
        output: inner.output,
        model: inner.model,
        ties: inner.ties,
        factors: inner.factors,
        record: true,
        parameters,
    }
}

/// Thread ratings through `wrapped` one batch at a time
fn replay<I, B>(
    rule: &str,
    wrapped: &UpdateRule,
    ratings: &RatingsList,
    batches: I,
    mut table: Option<&mut RatingsTable>,
) -> Result<RatingsUpdate>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[Competition]>,
{
    let mut current = ratings.clone();
    let mut overflows = Vec::new();
    let mut replayed = 0;

    for (batch, rows) in batches.into_iter().enumerate() {
        current = wrapped
            .update_ratings(&current, rows.as_ref())
            .with_context(|| format!("{} failed in batch {}", rule, batch))?;

        if let Some(table) = table.as_deref_mut() {
            if let Err(overflow) = table.record(batch, current.clone()) {
                warn!(rule, batch, capacity = overflow.capacity, "{}", overflow);
                overflows.push(overflow);
            }
        }
        replayed += 1;
    }

    debug!(
        rule,
        wrapped = wrapped.name(),
        batches = replayed,
        overflows = overflows.len(),
        "replayed competitions"
    );

    Ok(RatingsUpdate {
        ratings: current,
        overflows,
    })
}
