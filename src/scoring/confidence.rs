use tracing::warn;

use crate::config::{ConfidenceConfig, CoverageTier};
use crate::models::{
    AgeCategory, AgeEstimate, AgeSource, Candidate, ConfidenceAssessment, ConfidenceLevel, Timeframe,
    TimeframeSeries,
};

/// Classifies how far timeframe coverage can be trusted, taking the
/// candidate's age into account so a fresh launch is not punished for
/// history it cannot have yet.
pub struct ConfidenceAssessor<'a> {
    config: &'a ConfidenceConfig,
}

impl<'a> ConfidenceAssessor<'a> {
    pub fn new(config: &'a ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn assess(&self, candidate: &Candidate, series: &TimeframeSeries) -> ConfidenceAssessment {
        let age = candidate.estimate_age(self.config.default_age_minutes);
        let with_data = series.timeframes_with_data();
        let coverage_pct = with_data.len() as f64 / Timeframe::ALL.len() as f64 * 100.0;

        let assessment = match age.source {
            AgeSource::ClockSkew => self.build(
                ConfidenceLevel::Error,
                1.0,
                true,
                coverage_pct,
                age,
                None,
                "creation time is after observation time",
            ),
            _ if age.minutes <= self.config.ultra_early.max_age_minutes => {
                self.assess_ultra_early(&with_data, coverage_pct, age)
            }
            _ => self.assess_by_coverage(coverage_pct, age),
        };

        if age.source == AgeSource::Default {
            warn!(
                candidate = %candidate.identity(),
                default_minutes = self.config.default_age_minutes,
                "no age information, assuming default age"
            );
        }
        if assessment.needs_review {
            warn!(
                candidate = %candidate.identity(),
                level = assessment.level.as_str(),
                coverage_pct,
                age_minutes = age.minutes,
                reason = %assessment.reason,
                "confidence flagged for manual review"
            );
        }

        assessment
    }

    fn assess_ultra_early(&self, with_data: &[Timeframe], coverage_pct: f64, age: AgeEstimate) -> ConfidenceAssessment {
        let policy = &self.config.ultra_early;
        let has_short = with_data.iter().any(|tf| Timeframe::SHORT.contains(tf));
        let has_long = with_data.iter().any(|tf| Timeframe::LONG.contains(tf));
        let category = Some(AgeCategory::UltraEarly);

        if with_data.is_empty() {
            return self.build(
                ConfidenceLevel::Low,
                policy.no_data_adjustment,
                false,
                coverage_pct,
                age,
                category,
                "no timeframe data yet",
            );
        }

        if has_short && with_data.len() >= policy.min_timeframes {
            return self.build(
                ConfidenceLevel::EarlyDetection,
                policy.early_detection_adjustment,
                false,
                coverage_pct,
                age,
                category,
                "short-horizon momentum on a fresh launch",
            );
        }

        if has_long && !has_short {
            return self.build(
                ConfidenceLevel::Low,
                policy.suspicious_adjustment,
                true,
                coverage_pct,
                age,
                category,
                "fresh launch with only long-horizon history",
            );
        }

        self.build(
            ConfidenceLevel::Medium,
            policy.partial_adjustment,
            false,
            coverage_pct,
            age,
            category,
            "partial short-horizon data",
        )
    }

    fn assess_by_coverage(&self, coverage_pct: f64, age: AgeEstimate) -> ConfidenceAssessment {
        let band_index = self
            .config
            .bands
            .iter()
            .position(|band| band.max_age_minutes.map_or(true, |max| age.minutes <= max))
            .unwrap_or(self.config.bands.len().saturating_sub(1));

        let category = match band_index {
            0 => AgeCategory::Early,
            i if i + 1 >= self.config.bands.len() => AgeCategory::Mature,
            _ => AgeCategory::Established,
        };

        let tier = self
            .config
            .bands
            .get(band_index)
            .and_then(|band| {
                band.tiers
                    .iter()
                    .find(|tier| coverage_pct >= tier.min_coverage_pct)
                    .or_else(|| band.tiers.last())
            });

        match tier {
            Some(CoverageTier { level, adjustment, review, .. }) => self.build(
                *level,
                *adjustment,
                *review,
                coverage_pct,
                age,
                Some(category),
                "coverage graded for age band",
            ),
            None => self.build(
                ConfidenceLevel::Error,
                1.0,
                true,
                coverage_pct,
                age,
                Some(category),
                "no coverage tiers configured",
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        level: ConfidenceLevel,
        threshold_adjustment: f64,
        needs_review: bool,
        coverage_pct: f64,
        age: AgeEstimate,
        age_category: Option<AgeCategory>,
        reason: &str,
    ) -> ConfidenceAssessment {
        ConfidenceAssessment {
            level,
            score: self.config.scores.for_level(level),
            coverage_pct,
            threshold_adjustment,
            age,
            age_category,
            needs_review,
            reason: reason.to_string(),
        }
    }
}
