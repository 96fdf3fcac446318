//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Callers that need to tell failures apart can
//! `downcast_ref::<RatingsError>()` on the returned error.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingsError {
    #[error("Undefined rule: {name}")]
    UndefinedRule { name: String },

    #[error("Invalid parameter for {rule}: {message}")]
    InvalidParameter { rule: String, message: String },

    #[error("Operation {operation} is not supported by {rule}")]
    UnsupportedOperation { rule: String, operation: String },

    #[error("Operation {operation} is not implemented for {rule}")]
    NotImplemented { rule: String, operation: String },

    #[error("Player not found by {rule} in row {row}: {player_id}")]
    PlayerNotFound {
        rule: String,
        row: usize,
        player_id: String,
    },

    #[error("Missing score in row {row} required by {rule}")]
    MissingScore { rule: String, row: usize },

    #[error("Solver failed for {rule}: {reason}")]
    SolverFailure { rule: String, reason: String },
}

impl RatingsError {
    pub fn invalid_parameter(rule: &str, message: impl Into<String>) -> Self {
        RatingsError::InvalidParameter {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Extract the typed error from an anyhow error, if it is one of ours
pub fn kind_of(error: &anyhow::Error) -> Option<&RatingsError> {
    error.downcast_ref::<RatingsError>()
}
