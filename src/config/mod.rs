//! Configuration management for the ratings driver
//!
//! This module handles configuration loading from TOML files and
//! environment variables, validation, and the mapping from a configured
//! rule name to a constructed rule.

pub mod app;
pub mod rating;
pub mod rule;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use rating::RatingSettings;
pub use rule::RuleConfig;
