use serde::{Deserialize, Serialize};

use super::candidate::AgeEstimate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    EarlyDetection,
    High,
    Medium,
    Low,
    VeryLow,
    Error,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::EarlyDetection => "EARLY_DETECTION",
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::VeryLow => "VERY_LOW",
            ConfidenceLevel::Error => "ERROR",
        }
    }
}

/// Age band the assessment was made in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    UltraEarly,
    Early,
    Established,
    Mature,
}

/// How far the available timeframe coverage can be trusted, given age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceAssessment {
    pub level: ConfidenceLevel,
    /// In [0, 1].
    pub score: f64,
    pub coverage_pct: f64,
    /// Multiplicative adjustment for downstream thresholds; below 1.0 relaxes them.
    pub threshold_adjustment: f64,
    pub age: AgeEstimate,
    pub age_category: Option<AgeCategory>,
    pub needs_review: bool,
    pub reason: String,
}
