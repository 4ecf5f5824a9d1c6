use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::Path;

use super::scoring::ScoringConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub app: AppSettings,
    pub scoring: ScoringConfig,
    pub conviction: ConvictionThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Caller-side policy that maps a 0-100 score to a conviction label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvictionThresholds {
    pub very_high: f64,
    pub high: f64,
    pub moderate: f64,
}

impl Default for ConvictionThresholds {
    fn default() -> Self {
        Self {
            very_high: 80.0,
            high: 65.0,
            moderate: 50.0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Conviction Scorer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            scoring: ScoringConfig::default(),
            conviction: ConvictionThresholds::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CONVICTION").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.scoring.validate()?;

        let c = &self.conviction;
        if !(c.very_high >= c.high && c.high >= c.moderate) {
            return Err("Conviction thresholds must be ordered very_high >= high >= moderate".to_string());
        }
        if c.moderate < 0.0 || c.very_high > 100.0 {
            return Err("Conviction thresholds must be between 0 and 100".to_string());
        }

        Ok(())
    }
}
