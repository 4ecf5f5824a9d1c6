use serde::{Deserialize, Serialize};

/// Share of the final score each stage is designed to carry, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageWeights {
    pub platform: f64,
    pub momentum: f64,
    pub safety: f64,
    pub cross_platform: f64,
}

impl Default for StageWeights {
    fn default() -> Self {
        Self {
            platform: 40.0,
            momentum: 30.0,
            safety: 20.0,
            cross_platform: 10.0,
        }
    }
}

impl StageWeights {
    pub fn total(&self) -> f64 {
        self.platform + self.momentum + self.safety + self.cross_platform
    }

    pub fn validate(&self) -> Result<(), String> {
        let total = self.total();
        if (total - 100.0).abs() > 0.01 {
            return Err(format!("Stage weights must sum to 100, got {}", total));
        }

        if self.platform < 0.0 || self.momentum < 0.0 || self.safety < 0.0 || self.cross_platform < 0.0 {
            return Err("All stage weights must be non-negative".to_string());
        }

        Ok(())
    }
}

/// Maximum raw points per stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageCaps {
    pub platform: f64,
    pub momentum: f64,
    pub safety: f64,
    pub cross_platform: f64,
}

impl Default for StageCaps {
    fn default() -> Self {
        Self {
            platform: 50.0,
            momentum: 38.0,
            safety: 25.0,
            cross_platform: 12.0,
        }
    }
}

impl StageCaps {
    /// Raw maximum the aggregator normalizes against.
    pub fn total(&self) -> f64 {
        self.platform + self.momentum + self.safety + self.cross_platform
    }

    pub fn validate(&self) -> Result<(), String> {
        let caps = [self.platform, self.momentum, self.safety, self.cross_platform];
        if caps.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err("Stage caps must be finite and non-negative".to_string());
        }
        if self.total() <= 0.0 {
            return Err("Stage caps must not all be zero".to_string());
        }
        Ok(())
    }
}
