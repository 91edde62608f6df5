//! Configuration management for the Flood Risk Assessment Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FLOOD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{MissingIndicatorPolicy, RiskThresholds, RiskWeights, ScoringModel};

use crate::error::{AppError, AppResult};
use crate::services::history::JitterBounds;

/// Longest lookback window that may be configured
pub const MAX_LOOKBACK_DAYS: u32 = 60;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Indicator provider configuration
    pub provider: ProviderConfig,

    /// Scoring and history configuration
    pub assessment: AssessmentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Indicator API endpoint
    pub api_endpoint: String,

    /// Indicator API key
    pub api_key: String,

    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,

    /// Extra attempts after a transport failure or timeout
    pub retries: u32,

    /// Imagery with more cloud cover than this is ignored upstream
    pub max_cloud_percent: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssessmentConfig {
    pub weights: RiskWeights,

    pub thresholds: RiskThresholds,

    pub missing_indicator_policy: MissingIndicatorPolicy,

    /// Number of trailing days in the historical series
    pub lookback_days: u32,

    /// Length of the current observation window in days
    pub current_window_days: u32,

    pub jitter: JitterBounds,

    /// Fixed seed for synthetic jitter; entropy when unset
    pub jitter_seed: Option<u64>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
            missing_indicator_policy: MissingIndicatorPolicy::default(),
            lookback_days: 10,
            current_window_days: 1,
            jitter: JitterBounds::default(),
            jitter_seed: None,
        }
    }
}

impl AssessmentConfig {
    /// Check the configuration and build the scoring model from it
    pub fn scoring_model(&self) -> AppResult<ScoringModel> {
        ScoringModel::new(self.weights, self.thresholds, self.missing_indicator_policy)
            .map_err(|e| AppError::Configuration(e.to_string()))
    }

    pub fn validate(&self) -> AppResult<()> {
        self.scoring_model()?;

        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(AppError::Configuration(format!(
                "lookback_days must be between 1 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        if self.current_window_days == 0 {
            return Err(AppError::Configuration(
                "current_window_days must be at least 1".to_string(),
            ));
        }
        self.jitter
            .validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FLOOD_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jitter = JitterBounds::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("provider.api_endpoint", "http://localhost:8080/v1")?
            .set_default("provider.api_key", "")?
            .set_default("provider.timeout_secs", 20)?
            .set_default("provider.retries", 1)?
            .set_default("provider.max_cloud_percent", 20)?
            .set_default("assessment.weights.vegetation", 0.3)?
            .set_default("assessment.weights.water", 0.3)?
            .set_default("assessment.weights.soil", 0.4)?
            .set_default("assessment.thresholds.high", 0.7)?
            .set_default("assessment.thresholds.medium", 0.4)?
            .set_default("assessment.missing_indicator_policy", "neutral")?
            .set_default("assessment.lookback_days", 10)?
            .set_default("assessment.current_window_days", 1)?
            .set_default("assessment.jitter.ndvi", jitter.ndvi)?
            .set_default("assessment.jitter.ndwi", jitter.ndwi)?
            .set_default("assessment.jitter.soil_moisture", jitter.soil_moisture)?
            .set_default("assessment.jitter.water_level", jitter.water_level)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FLOOD_ prefix)
            .add_source(
                Environment::with_prefix("FLOOD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}
