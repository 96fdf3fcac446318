//! Rule metadata
//!
//! Every rule describes itself through a fixed `RuleInfo` record so that
//! drivers and composite rules can reason about it without knowing the
//! concrete variant.

use serde::{Deserialize, Serialize};

/// How a rule consumes a competition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Computation {
    /// All competitions are resolved in one pass
    Simultaneous,
    /// Competitions are replayed batch by batch
    Sequential,
}

/// Whether a rule builds on the ratings it is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateModel {
    Recursive,
    None,
}

/// Granularity of the competition data a rule needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    None,
    Outcome,
    Score,
    Margin,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Deterministic,
    Probabilistic,
    Either,
}

/// Named rule parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
}

impl Parameter {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Structured description of an update rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub computation: Computation,
    pub state_model: StateModel,
    pub input: InputKind,
    pub output: OutputKind,
    /// Short name of the underlying model
    pub model: String,
    pub ties: bool,
    pub factors: bool,
    /// Whether the rule can record a ratings trajectory
    pub record: bool,
    pub parameters: Vec<Parameter>,
}

impl RuleInfo {
    pub fn is_recursive(&self) -> bool {
        self.state_model == StateModel::Recursive
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}
