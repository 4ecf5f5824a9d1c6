use serde::{Deserialize, Serialize};

use super::analysis::SupplementaryAnalyses;
use super::breakdown::ScoreBreakdown;
use super::candidate::Candidate;
use crate::config::ConvictionThresholds;

/// One scoring request as it arrives from the enrichment layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringInput {
    pub candidate: Candidate,
    pub analyses: SupplementaryAnalyses,
}

impl ScoringInput {
    pub fn new(candidate: Candidate, analyses: SupplementaryAnalyses) -> Self {
        Self { candidate, analyses }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvictionScore {
    pub candidate: String,
    /// 0-100
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConvictionLevel {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl ConvictionLevel {
    pub fn from_score(score: f64, thresholds: &ConvictionThresholds) -> Self {
        match score {
            s if s >= thresholds.very_high => ConvictionLevel::VeryHigh,
            s if s >= thresholds.high => ConvictionLevel::High,
            s if s >= thresholds.moderate => ConvictionLevel::Moderate,
            _ => ConvictionLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConvictionLevel::VeryHigh => "very_high",
            ConvictionLevel::High => "high",
            ConvictionLevel::Moderate => "moderate",
            ConvictionLevel::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conviction_levels() {
        let thresholds = ConvictionThresholds::default();
        assert_eq!(ConvictionLevel::from_score(92.0, &thresholds), ConvictionLevel::VeryHigh);
        assert_eq!(ConvictionLevel::from_score(65.0, &thresholds), ConvictionLevel::High);
        assert_eq!(ConvictionLevel::from_score(51.0, &thresholds), ConvictionLevel::Moderate);
        assert_eq!(ConvictionLevel::from_score(12.0, &thresholds), ConvictionLevel::Low);
    }
}
