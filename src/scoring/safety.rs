use tracing::debug;

use crate::config::{FastModeConfig, SafetyConfig};
use crate::models::{Candidate, Component, DexPresenceAnalysis, SafetyBreakdown, SecurityAnalysis, StageSummary};

pub struct SafetyValidator<'a> {
    config: &'a SafetyConfig,
    max_score: f64,
    weight_pct: f64,
}

impl<'a> SafetyValidator<'a> {
    pub fn new(config: &'a SafetyConfig, max_score: f64, weight_pct: f64) -> Self {
        Self { config, max_score, weight_pct }
    }

    pub fn validate(
        &self,
        security: Option<&SecurityAnalysis>,
        dex_presence: Option<&DexPresenceAnalysis>,
    ) -> SafetyBreakdown {
        let cfg = self.config;

        let security_component = match security {
            Some(analysis) => {
                let risk_count = analysis.distinct_risk_factors();
                let raw = analysis.score / 100.0 * cfg.security_scale - cfg.risk_factor_penalty * risk_count as f64;
                Component::capped(raw.max(0.0), cfg.security_cap)
                    .with_signal(format!("SECURITY_SCORE_{:.0}", analysis.score))
                    .with_signal(format!("RISK_FACTORS_{}", risk_count))
            }
            None => Component::capped(cfg.security_default, cfg.security_cap).with_signal("SECURITY_DEFAULT"),
        };

        let liquidity_component = match dex_presence {
            Some(analysis) => {
                let presence = analysis.presence_score / 10.0 * cfg.presence_scale;
                let quality = cfg.liquidity_quality.evaluate(analysis.liquidity_quality);
                Component::capped((presence + quality).max(0.0), cfg.dex_cap)
                    .with_signal(format!("DEX_PRESENCE_{:.1}", analysis.presence_score))
                    .with_signal(format!("LIQUIDITY_QUALITY_{:.0}", analysis.liquidity_quality))
            }
            None => Component::capped(cfg.dex_default, cfg.dex_cap).with_signal("DEX_PRESENCE_DEFAULT"),
        };

        let raw = security_component.points + liquidity_component.points;
        debug!(raw, "safety stage scored");

        SafetyBreakdown {
            summary: StageSummary::clamped(raw, self.max_score, self.weight_pct),
            security: security_component,
            security_defaulted: security.is_none(),
            liquidity: liquidity_component,
            liquidity_defaulted: dex_presence.is_none(),
        }
    }

    /// Two-ladder variant for the screening pass: security score and raw
    /// snapshot liquidity, no risk-tag penalty.
    pub fn validate_fast(
        fast: &FastModeConfig,
        max_score: f64,
        weight_pct: f64,
        candidate: &Candidate,
        security: Option<&SecurityAnalysis>,
    ) -> SafetyBreakdown {
        let security_score = security.map(|s| s.score).or(candidate.security_score);

        let security_component = match security_score {
            Some(score) => Component::capped(fast.security.evaluate(score), fast.security_cap)
                .with_signal(format!("SECURITY_SCORE_{:.0}", score)),
            None => Component::capped(fast.security_default, fast.security_cap).with_signal("SECURITY_DEFAULT"),
        };

        let liquidity_component = match candidate.liquidity {
            Some(liquidity) => Component::capped(fast.liquidity_usd.evaluate(liquidity), fast.liquidity_cap)
                .with_signal(format!("LIQUIDITY_USD_{:.0}", liquidity)),
            None => Component::capped(fast.liquidity_default, fast.liquidity_cap).with_signal("LIQUIDITY_DEFAULT"),
        };

        let raw = security_component.points + liquidity_component.points;

        SafetyBreakdown {
            summary: StageSummary::clamped(raw, max_score, weight_pct),
            security: security_component,
            security_defaulted: security_score.is_none(),
            liquidity: liquidity_component,
            liquidity_defaulted: candidate.liquidity.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_analyses_use_defaults() {
        let config = SafetyConfig::default();
        let b = SafetyValidator::new(&config, 25.0, 20.0).validate(None, None);
        assert_eq!(b.security.points, 8.0);
        assert_eq!(b.liquidity.points, 5.0);
        assert_eq!(b.summary.score, 13.0);
        assert!(b.security_defaulted && b.liquidity_defaulted);
    }

    #[test]
    fn test_risk_factors_reduce_security_to_floor() {
        let config = SafetyConfig::default();
        let security = SecurityAnalysis {
            score: 50.0,
            risk_factors: vec!["mint".into(), "freeze".into(), "lp_unlocked".into(), "honeypot".into()],
        };
        let b = SafetyValidator::new(&config, 25.0, 20.0).validate(Some(&security), None);
        // 6 - 8 floors at 0
        assert_eq!(b.security.points, 0.0);
        assert!(!b.security_defaulted);
    }

    #[test]
    fn test_strong_safety_profile() {
        let config = SafetyConfig::default();
        let security = SecurityAnalysis { score: 100.0, risk_factors: vec![] };
        let dex = DexPresenceAnalysis { presence_score: 10.0, liquidity_quality: 95.0 };
        let b = SafetyValidator::new(&config, 25.0, 20.0).validate(Some(&security), Some(&dex));
        assert_eq!(b.security.points, 12.0);
        assert_eq!(b.liquidity.points, 10.0);
        assert_eq!(b.summary.score, 22.0);
    }

    #[test]
    fn test_fast_mode_reads_snapshot() {
        let fast = FastModeConfig::default();
        let mut candidate = Candidate::new("mint");
        candidate.security_score = Some(65.0);
        candidate.liquidity = Some(55_000.0);
        let b = SafetyValidator::validate_fast(&fast, 25.0, 20.0, &candidate, None);
        assert_eq!(b.security.points, 9.0);
        assert_eq!(b.liquidity.points, 8.0);
        assert_eq!(b.summary.score, 17.0);

        let bare = SafetyValidator::validate_fast(&fast, 25.0, 20.0, &Candidate::default(), None);
        assert_eq!(bare.summary.score, 9.0);
    }
}
