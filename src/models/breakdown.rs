use serde::{Deserialize, Serialize};

use super::candidate::LaunchVenue;
use super::confidence::ConfidenceAssessment;

/// One named contribution inside a stage. Built through [`Component::capped`],
/// so `points` never exceeds `max_points`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub points: f64,
    pub max_points: f64,
    pub signals: Vec<String>,
}

impl Component {
    /// Caps from above only; negative adjustments pass through to the stage sum.
    pub fn capped(raw: f64, max_points: f64) -> Self {
        Self {
            points: raw.min(max_points),
            max_points,
            signals: Vec::new(),
        }
    }

    pub fn zero(max_points: f64) -> Self {
        Self::capped(0.0, max_points)
    }

    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signals.push(signal.into());
        self
    }

    pub fn with_signals<I, S>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signals.extend(signals.into_iter().map(Into::into));
        self
    }
}

/// Points, ceiling and weight of one stage. `score` is always within
/// `[0, max_score]` and is exactly what the aggregator sums.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageSummary {
    pub score: f64,
    pub max_score: f64,
    pub weight_pct: f64,
}

impl StageSummary {
    pub fn clamped(raw: f64, max_score: f64, weight_pct: f64) -> Self {
        Self {
            score: raw.clamp(0.0, max_score),
            max_score,
            weight_pct,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformBreakdown {
    pub summary: StageSummary,
    pub venue: LaunchVenue,
    pub base: Component,
    pub velocity: Component,
    pub stage: Component,
    pub age_freshness: Component,
    pub progression_risk: Component,
    /// Sum of the five components before the stage clamp.
    pub raw_sum: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MomentumBreakdown {
    pub summary: StageSummary,
    pub volume_acceleration: Component,
    pub momentum_cascade: Component,
    pub activity_surge: Component,
    /// Clamped sub-total before the confidence multiplier.
    pub pre_confidence: f64,
    pub confidence_multiplier: f64,
    /// Absent in fast mode.
    pub confidence: Option<ConfidenceAssessment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyBreakdown {
    pub summary: StageSummary,
    pub security: Component,
    pub security_defaulted: bool,
    /// DEX presence in full mode, snapshot liquidity in fast mode.
    pub liquidity: Component,
    pub liquidity_defaulted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossPlatformBreakdown {
    pub summary: StageSummary,
    pub platform_count: usize,
    pub platforms: Component,
    pub key_platforms: Component,
    pub key_platforms_found: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    Full,
    Fast,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub mode: ScoringMode,
    pub platform: PlatformBreakdown,
    pub momentum: MomentumBreakdown,
    pub safety: SafetyBreakdown,
    pub cross_platform: CrossPlatformBreakdown,
    pub raw_total: f64,
    pub raw_max: f64,
}

impl ScoreBreakdown {
    pub fn stage_summaries(&self) -> [(&'static str, &StageSummary); 4] {
        [
            ("platform", &self.platform.summary),
            ("momentum", &self.momentum.summary),
            ("safety", &self.safety.summary),
            ("cross_platform", &self.cross_platform.summary),
        ]
    }
}
