//! Main application configuration
//!
//! This module defines the primary configuration structures for the ratings
//! driver, including TOML and environment variable loading and validation.

use crate::config::rating::RatingSettings;
use crate::config::rule::RuleConfig;
use crate::simulation::SimulationConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub rating: RatingSettings,
    #[serde(default)]
    pub rule: RuleConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "pairwise-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.with_env_overrides()
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(rating) = env::var("DEFAULT_RATING") {
            self.rating.default_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_RATING value: {}", rating))?;
        }
        if let Ok(k) = env::var("K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k))?;
        }
        if let Ok(scale) = env::var("PERFORMANCE_SCALE") {
            self.rating.scale = scale
                .parse()
                .map_err(|_| anyhow!("Invalid PERFORMANCE_SCALE value: {}", scale))?;
        }
        if let Ok(batch_size) = env::var("BATCH_SIZE") {
            self.rating.batch_size = batch_size
                .parse()
                .map_err(|_| anyhow!("Invalid BATCH_SIZE value: {}", batch_size))?;
        }
        if let Ok(seed) = env::var("SIMULATION_SEED") {
            self.simulation.seed = seed
                .parse()
                .map_err(|_| anyhow!("Invalid SIMULATION_SEED value: {}", seed))?;
        }

        validate_config(&self)?;
        Ok(self)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate rating defaults
    if config.rating.default_rating < 0.0 {
        return Err(anyhow!("Default rating cannot be negative"));
    }
    if config.rating.k_factor < 0.0 {
        return Err(anyhow!("K factor cannot be negative"));
    }
    if config.rating.scale <= 0.0 {
        return Err(anyhow!("Performance scale must be positive"));
    }
    if config.rating.draw < 0.0 {
        return Err(anyhow!("Draw weight cannot be negative"));
    }
    if config.rating.batch_size == 0 {
        return Err(anyhow!("Batch size must be greater than 0"));
    }

    // Validate simulation settings
    if config.simulation.tie_margin < 0.0 {
        return Err(anyhow!("Tie margin cannot be negative"));
    }

    Ok(())
}
