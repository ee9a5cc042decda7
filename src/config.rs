//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing section (or a partial one)
//! falls back to the stock scoring table.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::EligibilityError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

/// Trend thresholds, base probabilities and affordability rules.
///
/// Slope thresholds are compared with strict `>` in descending order.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub strong_up_slope: f64,
    pub moderate_up_slope: f64,
    pub stable_floor_slope: f64,
    pub moderate_down_slope: f64,
    pub strong_up_probability: f64,
    pub moderate_up_probability: f64,
    pub stable_probability: f64,
    pub moderate_down_probability: f64,
    pub strong_down_probability: f64,
    /// Ceiling = average monthly inflow × this multiple.
    pub loan_multiple: f64,
    /// Probability multiplier applied when the request exceeds the ceiling.
    pub over_limit_penalty: f64,
    /// Minimum probability for an eligible verdict (inclusive).
    pub approval_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strong_up_slope: 100.0,
            moderate_up_slope: 20.0,
            stable_floor_slope: -20.0,
            moderate_down_slope: -100.0,
            strong_up_probability: 0.95,
            moderate_up_probability: 0.75,
            stable_probability: 0.50,
            moderate_down_probability: 0.20,
            strong_down_probability: 0.05,
            loan_multiple: 3.0,
            over_limit_penalty: 0.1,
            approval_threshold: 0.60,
        }
    }
}

impl ScoringConfig {
    /// Check the table is internally consistent.
    pub fn validate(&self) -> Result<(), EligibilityError> {
        let slopes = [
            self.strong_up_slope,
            self.moderate_up_slope,
            self.stable_floor_slope,
            self.moderate_down_slope,
        ];
        if slopes.iter().any(|s| !s.is_finite()) {
            return Err(EligibilityError::Config(
                "slope thresholds must be finite".to_string(),
            ));
        }
        if slopes.windows(2).any(|w| w[0] <= w[1]) {
            return Err(EligibilityError::Config(format!(
                "slope thresholds must be strictly descending, got {slopes:?}"
            )));
        }

        let probabilities = [
            ("strong_up_probability", self.strong_up_probability),
            ("moderate_up_probability", self.moderate_up_probability),
            ("stable_probability", self.stable_probability),
            ("moderate_down_probability", self.moderate_down_probability),
            ("strong_down_probability", self.strong_down_probability),
            ("over_limit_penalty", self.over_limit_penalty),
            ("approval_threshold", self.approval_threshold),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(EligibilityError::Config(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }

        if !self.loan_multiple.is_finite() || self.loan_multiple <= 0.0 {
            return Err(EligibilityError::Config(format!(
                "loan_multiple must be positive, got {}",
                self.loan_multiple
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding an array of transaction records.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "transactions.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency code prefixed to amounts in messages and reports.
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "NGN".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.scoring.validate()?;
        Ok(config)
    }
}
