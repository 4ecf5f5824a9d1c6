use tracing::debug;

use crate::config::{PlatformConfig, Step};
use crate::models::{Candidate, Component, LaunchStage, LaunchVenue, PlatformBreakdown, StageSummary};

/// Scores how early and structurally favorable the launch placement is.
pub struct PlatformScorer<'a> {
    config: &'a PlatformConfig,
    max_score: f64,
    weight_pct: f64,
}

impl<'a> PlatformScorer<'a> {
    pub fn new(config: &'a PlatformConfig, max_score: f64, weight_pct: f64) -> Self {
        Self { config, max_score, weight_pct }
    }

    pub fn score(&self, candidate: &Candidate, default_age_minutes: f64) -> PlatformBreakdown {
        let venue = candidate.venue();

        let base = self.base_component(venue);
        let velocity = self.velocity_component(venue, candidate);
        let stage = self.stage_component(candidate);
        let age_freshness = self.age_component(candidate, default_age_minutes);
        let progression_risk = self.progression_component(candidate);

        // Clamp once, on the sum. Negative components must reach the sum intact.
        let raw_sum = base.points
            + velocity.points
            + stage.points
            + age_freshness.points
            + progression_risk.points;

        debug!(
            candidate = %candidate.identity(),
            venue = venue.as_str(),
            raw_sum,
            "platform stage scored"
        );

        PlatformBreakdown {
            summary: StageSummary::clamped(raw_sum, self.max_score, self.weight_pct),
            venue,
            base,
            velocity,
            stage,
            age_freshness,
            progression_risk,
            raw_sum,
        }
    }

    fn base_component(&self, venue: LaunchVenue) -> Component {
        Component::capped(self.config.venue_points.for_venue(venue), self.config.base_cap)
            .with_signal(format!("VENUE_{}", venue.as_str().to_uppercase()))
    }

    fn velocity_component(&self, venue: LaunchVenue, candidate: &Candidate) -> Component {
        let usd = candidate.usd_per_hour.map(|v| (v, &self.config.usd_velocity));
        let native = candidate.native_per_hour.map(|v| (v, &self.config.native_velocity));

        let chosen = if venue.is_native_unit() {
            native.or(usd)
        } else {
            usd.or(native)
        };

        match chosen {
            Some((value, ladder)) => from_step(ladder.step(value), self.config.velocity_cap),
            None => Component::zero(self.config.velocity_cap).with_signal("NO_VELOCITY_DATA"),
        }
    }

    fn stage_component(&self, candidate: &Candidate) -> Component {
        let cap = self.config.stage_cap;
        match (candidate.launch_stage, candidate.native_raised) {
            (Some(stage), _) if stage != LaunchStage::Unknown => {
                Component::capped(self.config.stage_points.for_stage(stage), cap)
                    .with_signal(format!("STAGE_{}", stage.as_str().to_uppercase()))
            }
            (_, Some(raised)) => from_step(self.config.native_raised.step(raised), cap),
            _ => Component::capped(self.config.stage_points.unknown, cap).with_signal("STAGE_UNKNOWN"),
        }
    }

    fn age_component(&self, candidate: &Candidate, default_age_minutes: f64) -> Component {
        let age = candidate.estimate_age(default_age_minutes);
        if !age.is_known() {
            return Component::zero(self.config.age_cap).with_signal("AGE_UNKNOWN");
        }
        from_step(self.config.age_freshness.step(age.minutes), self.config.age_cap)
    }

    fn progression_component(&self, candidate: &Candidate) -> Component {
        match candidate.bonding_curve_progress {
            Some(progress) => from_step(self.config.progression.step(progress), self.config.progression_cap),
            None => Component::zero(self.config.progression_cap).with_signal("NO_PROGRESS_DATA"),
        }
    }
}

fn from_step(step: Step, cap: f64) -> Component {
    let component = Component::capped(step.points, cap);
    match step.label {
        Some(label) => component.with_signal(label),
        None => component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer(config: &PlatformConfig) -> PlatformScorer<'_> {
        PlatformScorer::new(config, 50.0, 40.0)
    }

    fn candidate(tags: &[&str]) -> Candidate {
        let mut candidate = Candidate::new("mint");
        candidate.sources = tags.iter().map(|t| t.to_string()).collect();
        candidate
    }

    #[test]
    fn test_fresh_pump_fun_low_progress() {
        let config = PlatformConfig::default();
        let mut c = candidate(&["pump_fun"]);
        c.age_minutes = Some(5.0);
        c.bonding_curve_progress = Some(15.0);

        let breakdown = scorer(&config).score(&c, 180.0);
        assert_eq!(breakdown.base.points, 15.0);
        assert_eq!(breakdown.age_freshness.points, 6.0);
        assert_eq!(breakdown.age_freshness.signals, vec!["ULTRA_FRESH_0-5_MIN".to_string()]);
        assert_eq!(breakdown.progression_risk.points, 1.0);
        assert_eq!(breakdown.summary.score, 22.0);
    }

    #[test]
    fn test_every_bonus_hits_stage_cap_exactly() {
        let config = PlatformConfig::default();
        let mut c = candidate(&["pump_fun_live"]);
        c.usd_per_hour = Some(250_000.0);
        c.launch_stage = Some(LaunchStage::UltraEarly);
        c.age_minutes = Some(1.0);
        c.bonding_curve_progress = Some(65.0);

        let breakdown = scorer(&config).score(&c, 180.0);
        assert_eq!(breakdown.raw_sum, 52.0);
        assert_eq!(breakdown.summary.score, 50.0);
    }

    #[test]
    fn test_negative_components_reach_the_sum() {
        let config = PlatformConfig::default();
        let mut c = candidate(&["letsbonk"]);
        c.native_raised = Some(95.0);
        c.bonding_curve_progress = Some(97.0);

        let breakdown = scorer(&config).score(&c, 180.0);
        assert_eq!(breakdown.stage.points, -3.0);
        assert_eq!(breakdown.progression_risk.points, -2.0);
        // 12 base - 3 stage - 2 progression, age unknown
        assert_eq!(breakdown.summary.score, 7.0);
    }

    #[test]
    fn test_stage_total_never_negative() {
        let config = PlatformConfig::default();
        let mut c = candidate(&[]);
        c.native_raised = Some(90.0);
        c.bonding_curve_progress = Some(99.0);

        let breakdown = scorer(&config).score(&c, 180.0);
        assert!(breakdown.raw_sum < 0.0);
        assert_eq!(breakdown.summary.score, 0.0);
    }

    #[test]
    fn test_native_venue_prefers_native_velocity() {
        let config = PlatformConfig::default();
        let mut c = candidate(&["bonk.fun"]);
        c.native_per_hour = Some(120.0);
        c.usd_per_hour = Some(60_000.0);

        let breakdown = scorer(&config).score(&c, 180.0);
        assert_eq!(breakdown.velocity.points, 9.0);

        let mut c = candidate(&["pump.fun"]);
        c.native_per_hour = Some(120.0);
        c.usd_per_hour = Some(60_000.0);
        assert_eq!(scorer(&config).score(&c, 180.0).velocity.points, 12.0);
    }

    #[test]
    fn test_age_freshness_monotonic() {
        let config = PlatformConfig::default();
        let mut previous = f64::MAX;
        for age in [0.0, 3.0, 5.0, 9.0, 15.0, 22.0, 30.0, 45.0, 60.0, 100.0, 180.0, 400.0] {
            let mut c = candidate(&["pump_fun"]);
            c.age_minutes = Some(age);
            let points = scorer(&config).score(&c, 180.0).age_freshness.points;
            assert!(points <= previous, "age {} scored {} after {}", age, points, previous);
            previous = points;
        }
    }

    #[test]
    fn test_discrete_stage_wins_over_raised_amount() {
        let config = PlatformConfig::default();
        let mut c = candidate(&["letsbonk"]);
        c.launch_stage = Some(LaunchStage::EarlyMomentum);
        c.native_raised = Some(95.0);
        assert_eq!(scorer(&config).score(&c, 180.0).stage.points, 8.0);
    }
}
