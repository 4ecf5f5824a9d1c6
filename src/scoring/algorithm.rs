use tracing::debug;

use crate::config::ScoringConfig;
use crate::models::{
    Candidate, ConvictionScore, Result, ScoreBreakdown, ScoringError, ScoringInput, ScoringMode, SecurityAnalysis,
    StageSummary, SupplementaryAnalyses,
};
use super::confidence::ConfidenceAssessor;
use super::cross_platform::CrossPlatformScorer;
use super::momentum::{Horizon, MomentumAnalyzer};
use super::platform::PlatformScorer;
use super::safety::SafetyValidator;

/// Pure, deterministic aggregator over the four point-producing stages.
/// Holds nothing but immutable configuration, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct ScoringAlgorithm {
    config: ScoringConfig,
}

impl Default for ScoringAlgorithm {
    fn default() -> Self {
        Self { config: ScoringConfig::default() }
    }
}

impl ScoringAlgorithm {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate().map_err(ScoringError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Full six-timeframe scoring.
    pub fn score(&self, candidate: &Candidate, analyses: &SupplementaryAnalyses) -> Result<ConvictionScore> {
        self.score_with_mode(candidate, analyses, ScoringMode::Full)
    }

    /// Reduced-cost screening pass over 1h/6h/24h data only.
    pub fn score_fast(&self, candidate: &Candidate, analyses: &SupplementaryAnalyses) -> Result<ConvictionScore> {
        self.score_with_mode(candidate, analyses, ScoringMode::Fast)
    }

    pub fn score_input(&self, input: &ScoringInput, mode: ScoringMode) -> Result<ConvictionScore> {
        self.score_with_mode(&input.candidate, &input.analyses, mode)
    }

    pub fn score_with_mode(
        &self,
        candidate: &Candidate,
        analyses: &SupplementaryAnalyses,
        mode: ScoringMode,
    ) -> Result<ConvictionScore> {
        self.calculate(candidate, analyses, mode)
            .map_err(|e| e.for_candidate(candidate.identity()))
    }

    fn calculate(
        &self,
        candidate: &Candidate,
        analyses: &SupplementaryAnalyses,
        mode: ScoringMode,
    ) -> Result<ConvictionScore> {
        candidate.validate()?;
        analyses.validate()?;

        let breakdown = self.calculate_breakdown(candidate, analyses, mode);
        for (stage, summary) in breakdown.stage_summaries() {
            ensure_finite(stage, summary)?;
        }

        let raw_total = breakdown.raw_total;
        if !raw_total.is_finite() || breakdown.raw_max <= 0.0 {
            return Err(ScoringError::NonFiniteStage { stage: "aggregate" });
        }
        let score = (raw_total / breakdown.raw_max * 100.0).clamp(0.0, 100.0);

        debug!(
            candidate = %candidate.identity(),
            mode = ?mode,
            platform = breakdown.platform.summary.score,
            momentum = breakdown.momentum.summary.score,
            safety = breakdown.safety.summary.score,
            cross_platform = breakdown.cross_platform.summary.score,
            score,
            "candidate scored"
        );

        Ok(ConvictionScore {
            candidate: candidate.identity(),
            score,
            breakdown,
        })
    }

    fn calculate_breakdown(
        &self,
        candidate: &Candidate,
        analyses: &SupplementaryAnalyses,
        mode: ScoringMode,
    ) -> ScoreBreakdown {
        let cfg = &self.config;
        let caps = &cfg.caps;
        let weights = &cfg.weights;
        let series = analyses.merged_series(candidate);

        let platform = PlatformScorer::new(&cfg.platform, caps.platform, weights.platform)
            .score(candidate, cfg.confidence.default_age_minutes);

        let analyzer = MomentumAnalyzer::new(&cfg.momentum, caps.momentum, weights.momentum);
        let momentum = match mode {
            ScoringMode::Full => {
                let confidence = ConfidenceAssessor::new(&cfg.confidence).assess(candidate, &series);
                analyzer.analyze(&series, Some(confidence), Horizon::Full)
            }
            ScoringMode::Fast => analyzer.analyze(&series, None, Horizon::Fast),
        };

        let snapshot_security = SecurityAnalysis::from_snapshot(candidate);
        let safety = match mode {
            ScoringMode::Full => SafetyValidator::new(&cfg.safety, caps.safety, weights.safety).validate(
                analyses.security.as_ref().or(snapshot_security.as_ref()),
                analyses.dex_presence.as_ref(),
            ),
            ScoringMode::Fast => SafetyValidator::validate_fast(
                &cfg.fast,
                caps.safety,
                weights.safety,
                candidate,
                analyses.security.as_ref(),
            ),
        };

        let cross_platform = CrossPlatformScorer::new(&cfg.cross_platform, caps.cross_platform, weights.cross_platform)
            .score(candidate);

        let raw_total = platform.summary.score
            + momentum.summary.score
            + safety.summary.score
            + cross_platform.summary.score;

        ScoreBreakdown {
            mode,
            platform,
            momentum,
            safety,
            cross_platform,
            raw_total,
            raw_max: caps.total(),
        }
    }
}

fn ensure_finite(stage: &'static str, summary: &StageSummary) -> Result<()> {
    if summary.score.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::NonFiniteStage { stage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceLevel, LaunchStage};

    #[test]
    fn test_empty_candidate_scores_defaults_only() {
        let algo = ScoringAlgorithm::default();
        let score = algo.score(&Candidate::default(), &SupplementaryAnalyses::default()).unwrap();

        // Safety defaults (8 + 5) are the only points
        assert_eq!(score.breakdown.raw_total, 13.0);
        assert!((score.score - 10.4).abs() < 1e-9);
        assert_eq!(score.candidate, "<unknown>");
    }

    #[test]
    fn test_invalid_input_is_surfaced_with_identity() {
        let algo = ScoringAlgorithm::default();
        let mut candidate = Candidate::new("BadMint111");
        candidate.timeframes.m5.volume = Some(-10.0);

        let err = algo.score(&candidate, &SupplementaryAnalyses::default()).unwrap_err();
        match &err {
            ScoringError::Candidate { candidate, source } => {
                assert_eq!(candidate, "BadMint111");
                assert!(matches!(**source, ScoringError::InvalidField { ref field, .. } if field == "timeframes.m5.volume"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("BadMint111"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ScoringConfig::default();
        config.weights.safety = 5.0;
        assert!(matches!(ScoringAlgorithm::new(config), Err(ScoringError::InvalidConfig(_))));
    }

    #[test]
    fn test_breakdown_totals_match_aggregate() {
        let algo = ScoringAlgorithm::default();
        let mut candidate = Candidate::new("mint");
        candidate.sources = ["pump_fun".to_string(), "dexscreener".to_string()].into_iter().collect();
        candidate.launch_stage = Some(LaunchStage::EarlyMomentum);
        candidate.age_minutes = Some(12.0);
        candidate.timeframes.m5.volume = Some(4_000.0);
        candidate.timeframes.h1.volume = Some(20_000.0);

        let score = algo.score(&candidate, &SupplementaryAnalyses::default()).unwrap();
        let b = &score.breakdown;
        let sum: f64 = b.stage_summaries().iter().map(|(_, s)| s.score).sum();
        assert_eq!(sum, b.raw_total);
        assert!((score.score - b.raw_total / 125.0 * 100.0).abs() < 1e-9);
        assert_eq!(
            b.momentum.confidence.as_ref().map(|c| c.level),
            Some(ConfidenceLevel::EarlyDetection)
        );
    }

    #[test]
    fn test_fast_mode_has_no_confidence() {
        let algo = ScoringAlgorithm::default();
        let score = algo.score_fast(&Candidate::new("mint"), &SupplementaryAnalyses::default()).unwrap();
        assert_eq!(score.breakdown.mode, ScoringMode::Fast);
        assert!(score.breakdown.momentum.confidence.is_none());
        assert_eq!(score.breakdown.momentum.confidence_multiplier, 1.0);
    }

    #[test]
    fn test_clock_skew_scores_with_neutral_multiplier() {
        let algo = ScoringAlgorithm::default();
        let mut candidate = Candidate::new("skewed");
        let observed = chrono::Utc::now();
        candidate.observed_at = Some(observed);
        candidate.created_at = Some(observed + chrono::Duration::minutes(3));
        candidate.timeframes.h1.volume = Some(60_000.0);
        candidate.timeframes.h6.volume = Some(120_000.0);

        let score = algo.score(&candidate, &SupplementaryAnalyses::default()).unwrap();
        let momentum = &score.breakdown.momentum;
        let confidence = momentum.confidence.as_ref().unwrap();
        assert_eq!(confidence.level, ConfidenceLevel::Error);
        assert!(confidence.needs_review);
        assert_eq!(momentum.confidence_multiplier, 1.0);
        assert!(momentum.pre_confidence > 0.0);
        assert_eq!(momentum.summary.score, momentum.pre_confidence);
        assert_eq!(score.breakdown.platform.age_freshness.signals, vec!["AGE_UNKNOWN".to_string()]);
    }

    #[test]
    fn test_snapshot_security_backs_missing_analysis() {
        let algo = ScoringAlgorithm::default();
        let mut candidate = Candidate::new("snap");
        candidate.security_score = Some(90.0);
        candidate.risk_factors = vec!["mint_authority".to_string(), "Mint_Authority".to_string()];

        let score = algo.score(&candidate, &SupplementaryAnalyses::default()).unwrap();
        let safety = &score.breakdown.safety;
        // 90/100 * 12 - 2 for the one distinct tag
        assert!((safety.security.points - 8.8).abs() < 1e-9);
        assert!(!safety.security_defaulted);

        let analyses = SupplementaryAnalyses {
            security: Some(SecurityAnalysis { score: 100.0, risk_factors: vec![] }),
            ..SupplementaryAnalyses::default()
        };
        let score = algo.score(&candidate, &analyses).unwrap();
        assert_eq!(score.breakdown.safety.security.points, 12.0);
    }
}
