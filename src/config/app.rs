//! Main application configuration
//!
//! This module defines the primary configuration structures for the rating
//! engine, including environment variable and TOML loading plus validation.

use crate::config::rating::{RatingConfig, RatingSystemKind};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub ratings: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "foosball-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text, filling omitted fields with defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(contents).map_err(|e| anyhow!("Invalid TOML configuration: {}", e))?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(systems) = env::var("RATING_SYSTEMS") {
            self.ratings.systems = systems
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<RatingSystemKind>())
                .collect::<std::result::Result<Vec<_>, _>>()?;
        }
        if let Ok(initial) = env::var("ELO_INITIAL_RATING") {
            self.ratings.elo.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_INITIAL_RATING value: {}", initial))?;
        }
        if let Ok(k_factor) = env::var("ELO_K_FACTOR") {
            self.ratings.elo.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(threshold) = env::var("ELO_PROVISIONAL_SNAPSHOTS") {
            self.ratings.elo.provisional_snapshots = threshold
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_PROVISIONAL_SNAPSHOTS value: {}", threshold))?;
        }
        if let Ok(margin) = env::var("NPS_PROMOTER_MARGIN") {
            self.ratings.net_promoter.promoter_margin = margin
                .parse()
                .map_err(|_| anyhow!("Invalid NPS_PROMOTER_MARGIN value: {}", margin))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.ratings.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.ratings.elo.initial_rating, 1200.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [service]
            log_level = "debug"

            [ratings]
            systems = ["elo", "wins_minus_losses"]

            [ratings.elo]
            k_factor = 32.0
            "#,
        )
        .unwrap();

        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.service.name, "foosball-ratings");
        assert_eq!(
            config.ratings.systems,
            vec![RatingSystemKind::Elo, RatingSystemKind::WinsMinusLosses]
        );
        assert_eq!(config.ratings.elo.k_factor, 32.0);
        assert_eq!(config.ratings.elo.initial_rating, 1200.0);
        assert_eq!(config.ratings.net_promoter.promoter_margin, 2);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(AppConfig::from_toml_str("[ratings]\nsystems = [\"glicko\"]").is_err());
        assert!(AppConfig::from_toml_str("[ratings.elo]\nk_factor = -5.0").is_err());
    }
}
