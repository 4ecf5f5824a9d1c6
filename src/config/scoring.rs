use serde::{Deserialize, Serialize};

use super::ladder::{Band, BandLadder, Ladder, Rung};
use crate::models::{ConfidenceLevel, LaunchStage, LaunchVenue};
use crate::scoring::weights::{StageCaps, StageWeights};

/// Every tunable the scoring engine reads. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: StageWeights,
    pub caps: StageCaps,
    pub platform: PlatformConfig,
    pub momentum: MomentumConfig,
    pub confidence: ConfidenceConfig,
    pub safety: SafetyConfig,
    pub cross_platform: CrossPlatformConfig,
    pub fast: FastModeConfig,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        self.caps.validate()?;
        self.platform.validate()?;
        self.momentum.validate()?;
        self.confidence.validate()?;
        self.safety.validate()?;
        self.cross_platform.validate()?;
        self.fast.validate()?;
        Ok(())
    }
}

fn check_within_cap(name: &str, best: f64, cap: f64) -> Result<(), String> {
    if best > cap + f64::EPSILON {
        return Err(format!("{} can award {} points but is capped at {}", name, best, cap));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VenuePoints {
    pub pump_fun_live: f64,
    pub pump_fun: f64,
    pub letsbonk: f64,
    pub graduated: f64,
    pub trending: f64,
    pub unrecognized: f64,
}

impl VenuePoints {
    pub fn for_venue(&self, venue: LaunchVenue) -> f64 {
        match venue {
            LaunchVenue::PumpFunLive => self.pump_fun_live,
            LaunchVenue::PumpFun => self.pump_fun,
            LaunchVenue::LetsBonk => self.letsbonk,
            LaunchVenue::Graduated => self.graduated,
            LaunchVenue::Trending => self.trending,
            LaunchVenue::Unrecognized => self.unrecognized,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StagePoints {
    pub ultra_early: f64,
    pub early_momentum: f64,
    pub confirmed_growth: f64,
    pub graduated: f64,
    pub unknown: f64,
}

impl StagePoints {
    pub fn for_stage(&self, stage: LaunchStage) -> f64 {
        match stage {
            LaunchStage::UltraEarly => self.ultra_early,
            LaunchStage::EarlyMomentum => self.early_momentum,
            LaunchStage::ConfirmedGrowth => self.confirmed_growth,
            LaunchStage::Graduated => self.graduated,
            LaunchStage::Unknown => self.unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    pub base_cap: f64,
    pub velocity_cap: f64,
    pub stage_cap: f64,
    pub age_cap: f64,
    pub progression_cap: f64,
    pub venue_points: VenuePoints,
    /// Value raised per hour in USD.
    pub usd_velocity: Ladder,
    /// Value raised per hour in the chain's native unit.
    pub native_velocity: Ladder,
    pub stage_points: StagePoints,
    /// Continuous raised amount, used when no discrete stage is known.
    pub native_raised: BandLadder,
    pub age_freshness: BandLadder,
    pub progression: BandLadder,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_cap: 20.0,
            velocity_cap: 12.0,
            stage_cap: 10.0,
            age_cap: 6.0,
            progression_cap: 4.0,
            venue_points: VenuePoints {
                pump_fun_live: 20.0,
                pump_fun: 15.0,
                letsbonk: 12.0,
                graduated: 8.0,
                trending: 5.0,
                unrecognized: 0.0,
            },
            usd_velocity: Ladder::new(vec![
                Rung::labeled(50_000.0, 12.0, "USD_VELOCITY_50K+"),
                Rung::labeled(20_000.0, 9.0, "USD_VELOCITY_20K+"),
                Rung::labeled(10_000.0, 6.0, "USD_VELOCITY_10K+"),
                Rung::labeled(5_000.0, 4.0, "USD_VELOCITY_5K+"),
                Rung::labeled(1_000.0, 2.0, "USD_VELOCITY_1K+"),
            ]),
            native_velocity: Ladder::new(vec![
                Rung::labeled(300.0, 12.0, "NATIVE_VELOCITY_300+"),
                Rung::labeled(100.0, 9.0, "NATIVE_VELOCITY_100+"),
                Rung::labeled(50.0, 6.0, "NATIVE_VELOCITY_50+"),
                Rung::labeled(20.0, 4.0, "NATIVE_VELOCITY_20+"),
                Rung::labeled(5.0, 2.0, "NATIVE_VELOCITY_5+"),
            ]),
            stage_points: StagePoints {
                ultra_early: 10.0,
                early_momentum: 8.0,
                confirmed_growth: 6.0,
                graduated: 2.0,
                unknown: 0.0,
            },
            native_raised: BandLadder {
                bands: vec![
                    Band::labeled(5.0, 2.0, "RAISED_0-5_TOO_EARLY"),
                    Band::labeled(20.0, 6.0, "RAISED_5-20_BUILDING"),
                    Band::labeled(50.0, 10.0, "RAISED_20-50_MOMENTUM"),
                    Band::labeled(70.0, 4.0, "RAISED_50-70_MATURING"),
                    Band::labeled(85.0, 0.0, "RAISED_70-85_LATE"),
                ],
                otherwise: -3.0,
                otherwise_label: Some("RAISED_85+_EXIT_RISK".to_string()),
            },
            age_freshness: BandLadder {
                bands: vec![
                    Band::labeled(5.0, 6.0, "ULTRA_FRESH_0-5_MIN"),
                    Band::labeled(15.0, 5.0, "VERY_FRESH_5-15_MIN"),
                    Band::labeled(30.0, 4.0, "FRESH_15-30_MIN"),
                    Band::labeled(60.0, 3.0, "RECENT_30-60_MIN"),
                    Band::labeled(180.0, 1.0, "YOUNG_1-3_HOURS"),
                ],
                otherwise: 0.0,
                otherwise_label: Some("AGED_3_HOURS_PLUS".to_string()),
            },
            progression: BandLadder {
                bands: vec![
                    Band::labeled(20.0, 1.0, "PROGRESS_0-20_EARLY"),
                    Band::labeled(50.0, 2.0, "PROGRESS_20-50_BUILDING"),
                    Band::labeled(80.0, 4.0, "PROGRESS_50-80_SWEET_SPOT"),
                    Band::labeled(85.0, 2.0, "PROGRESS_80-85_LATE"),
                ],
                otherwise: -2.0,
                otherwise_label: Some("PROGRESS_85+_EXIT_RISK".to_string()),
            },
        }
    }
}

impl PlatformConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.usd_velocity.validate("platform.usd_velocity")?;
        self.native_velocity.validate("platform.native_velocity")?;
        self.native_raised.validate("platform.native_raised")?;
        self.age_freshness.validate("platform.age_freshness")?;
        self.progression.validate("platform.progression")?;

        let best_venue = LaunchVenue::ALL
            .iter()
            .map(|v| self.venue_points.for_venue(*v))
            .fold(0.0, f64::max);
        check_within_cap("platform.venue_points", best_venue, self.base_cap)?;
        check_within_cap("platform.usd_velocity", self.usd_velocity.max_points(), self.velocity_cap)?;
        check_within_cap("platform.native_velocity", self.native_velocity.max_points(), self.velocity_cap)?;
        check_within_cap("platform.native_raised", self.native_raised.max_points(), self.stage_cap)?;
        check_within_cap("platform.age_freshness", self.age_freshness.max_points(), self.age_cap)?;
        check_within_cap("platform.progression", self.progression.max_points(), self.progression_cap)?;

        // Ranking: a more speculative venue never earns less than a later one.
        for pair in LaunchVenue::ALL.windows(2) {
            if self.venue_points.for_venue(pair[0]) < self.venue_points.for_venue(pair[1]) {
                return Err(format!(
                    "Venue {} must not score below {}",
                    pair[0].as_str(),
                    pair[1].as_str()
                ));
            }
        }
        Ok(())
    }
}

/// Trader-breadth rung: both thresholds must be met.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreadthRung {
    pub min_unique_traders: u64,
    pub min_trades_24h: u64,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceMultipliers {
    pub early_detection: f64,
    pub high: f64,
    pub very_low: f64,
    pub other: f64,
}

impl ConfidenceMultipliers {
    pub fn for_level(&self, level: ConfidenceLevel) -> f64 {
        match level {
            ConfidenceLevel::EarlyDetection => self.early_detection,
            ConfidenceLevel::High => self.high,
            ConfidenceLevel::VeryLow => self.very_low,
            _ => self.other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MomentumConfig {
    // Volume acceleration
    pub volume_raw_max: f64,
    pub volume_scale: f64,
    pub volume_cap: f64,
    /// Short-horizon extrapolated hourly rate over the 1h volume.
    pub short_vs_hour: Ladder,
    /// 1h volume over the 6h average hourly rate.
    pub hour_vs_six_hour: Ladder,
    /// 6h average hourly rate over the 24h average hourly rate.
    pub six_hour_vs_day: Ladder,
    pub hour_volume_usd: Ladder,

    // Momentum cascade
    pub cascade_raw_min: f64,
    pub cascade_raw_max: f64,
    pub cascade_scale: f64,
    pub cascade_cap: f64,
    pub cascade_floor: f64,
    /// Average of the 5m/15m/30m price changes when all three are positive.
    pub short_positive: Ladder,
    /// Average of the 1h/6h price changes when both are positive.
    pub sustained_positive: Ladder,
    pub day_surge: Ladder,
    pub day_drawdown: BandLadder,
    pub acceleration_bonus: f64,

    // Activity surge
    pub activity_raw_max: f64,
    pub activity_scale: f64,
    pub activity_cap: f64,
    pub trades_5m: Ladder,
    pub trades_1h: Ladder,
    pub trader_breadth: Vec<BreadthRung>,

    pub confidence_multipliers: ConfidenceMultipliers,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            volume_raw_max: 0.4,
            volume_scale: 37.5,
            volume_cap: 15.0,
            short_vs_hour: Ladder::from_pairs(&[(3.0, 0.10), (2.0, 0.07), (1.5, 0.05), (1.0, 0.02)]),
            hour_vs_six_hour: Ladder::from_pairs(&[(3.0, 0.10), (2.0, 0.07), (1.5, 0.05), (1.0, 0.02)]),
            six_hour_vs_day: Ladder::from_pairs(&[(3.0, 0.08), (2.0, 0.06), (1.5, 0.04), (1.0, 0.02)]),
            hour_volume_usd: Ladder::from_pairs(&[(100_000.0, 0.12), (50_000.0, 0.08), (10_000.0, 0.04)]),

            cascade_raw_min: -0.1,
            cascade_raw_max: 0.35,
            cascade_scale: 37.14,
            cascade_cap: 13.0,
            cascade_floor: -3.7,
            short_positive: Ladder::from_pairs(&[(20.0, 0.15), (10.0, 0.12), (5.0, 0.08), (0.0, 0.05)]),
            sustained_positive: Ladder::from_pairs(&[(50.0, 0.10), (20.0, 0.07), (5.0, 0.04), (0.0, 0.02)]),
            day_surge: Ladder::from_pairs(&[(100.0, 0.05), (50.0, 0.03)]),
            day_drawdown: BandLadder {
                bands: vec![
                    Band::labeled(-50.0, -0.10, "DUMP_24H_50+"),
                    Band::labeled(-30.0, -0.05, "DUMP_24H_30+"),
                ],
                otherwise: 0.0,
                otherwise_label: None,
            },
            acceleration_bonus: 0.05,

            activity_raw_max: 0.25,
            activity_scale: 40.0,
            activity_cap: 10.0,
            trades_5m: Ladder::from_pairs(&[(50.0, 0.10), (20.0, 0.07), (10.0, 0.04), (5.0, 0.02)]),
            trades_1h: Ladder::from_pairs(&[(500.0, 0.08), (200.0, 0.06), (100.0, 0.04), (50.0, 0.02)]),
            trader_breadth: vec![
                BreadthRung { min_unique_traders: 500, min_trades_24h: 2_000, points: 0.07 },
                BreadthRung { min_unique_traders: 200, min_trades_24h: 800, points: 0.05 },
                BreadthRung { min_unique_traders: 50, min_trades_24h: 200, points: 0.03 },
            ],

            confidence_multipliers: ConfidenceMultipliers {
                early_detection: 1.05,
                high: 1.02,
                very_low: 0.95,
                other: 1.0,
            },
        }
    }
}

impl MomentumConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.short_vs_hour.validate("momentum.short_vs_hour")?;
        self.hour_vs_six_hour.validate("momentum.hour_vs_six_hour")?;
        self.six_hour_vs_day.validate("momentum.six_hour_vs_day")?;
        self.hour_volume_usd.validate("momentum.hour_volume_usd")?;
        self.short_positive.validate("momentum.short_positive")?;
        self.sustained_positive.validate("momentum.sustained_positive")?;
        self.day_surge.validate("momentum.day_surge")?;
        self.day_drawdown.validate("momentum.day_drawdown")?;
        self.trades_5m.validate("momentum.trades_5m")?;
        self.trades_1h.validate("momentum.trades_1h")?;

        if self.cascade_raw_min > self.cascade_raw_max {
            return Err("momentum.cascade_raw_min must not exceed cascade_raw_max".to_string());
        }
        if self.cascade_floor > 0.0 {
            return Err("momentum.cascade_floor must not be positive".to_string());
        }
        let scales = [self.volume_scale, self.cascade_scale, self.activity_scale];
        if scales.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err("momentum scales must be finite and non-negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageTier {
    pub min_coverage_pct: f64,
    pub level: ConfidenceLevel,
    pub adjustment: f64,
    #[serde(default)]
    pub review: bool,
}

impl CoverageTier {
    fn new(min_coverage_pct: f64, level: ConfidenceLevel, adjustment: f64, review: bool) -> Self {
        Self { min_coverage_pct, level, adjustment, review }
    }
}

/// Coverage thresholds for one age band. `max_age_minutes == None` is the
/// open-ended oldest band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgeBand {
    pub max_age_minutes: Option<f64>,
    /// Descending by `min_coverage_pct`; the last tier should start at 0.
    pub tiers: Vec<CoverageTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UltraEarlyPolicy {
    pub max_age_minutes: f64,
    pub min_timeframes: usize,
    pub early_detection_adjustment: f64,
    pub partial_adjustment: f64,
    pub suspicious_adjustment: f64,
    pub no_data_adjustment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelScores {
    pub early_detection: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
    pub very_low: f64,
    pub error: f64,
}

impl LevelScores {
    pub fn for_level(&self, level: ConfidenceLevel) -> f64 {
        match level {
            ConfidenceLevel::EarlyDetection => self.early_detection,
            ConfidenceLevel::High => self.high,
            ConfidenceLevel::Medium => self.medium,
            ConfidenceLevel::Low => self.low,
            ConfidenceLevel::VeryLow => self.very_low,
            ConfidenceLevel::Error => self.error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceConfig {
    pub default_age_minutes: f64,
    pub ultra_early: UltraEarlyPolicy,
    /// early, established, mature; ascending by age.
    pub bands: Vec<AgeBand>,
    pub scores: LevelScores,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        use ConfidenceLevel::*;
        Self {
            default_age_minutes: 180.0,
            ultra_early: UltraEarlyPolicy {
                max_age_minutes: 30.0,
                min_timeframes: 2,
                early_detection_adjustment: 0.95,
                partial_adjustment: 1.0,
                suspicious_adjustment: 1.1,
                no_data_adjustment: 1.2,
            },
            bands: vec![
                AgeBand {
                    max_age_minutes: Some(120.0),
                    tiers: vec![
                        CoverageTier::new(80.0, High, 1.0, false),
                        CoverageTier::new(50.0, Medium, 1.0, false),
                        CoverageTier::new(0.0, Low, 1.1, false),
                    ],
                },
                AgeBand {
                    max_age_minutes: Some(720.0),
                    tiers: vec![
                        CoverageTier::new(80.0, High, 1.0, false),
                        CoverageTier::new(60.0, Medium, 1.05, false),
                        CoverageTier::new(30.0, Low, 1.15, false),
                        CoverageTier::new(0.0, VeryLow, 1.3, true),
                    ],
                },
                AgeBand {
                    max_age_minutes: None,
                    tiers: vec![
                        CoverageTier::new(90.0, High, 1.0, false),
                        CoverageTier::new(70.0, Medium, 1.05, false),
                        CoverageTier::new(40.0, Low, 1.2, true),
                        CoverageTier::new(0.0, VeryLow, 1.5, true),
                    ],
                },
            ],
            scores: LevelScores {
                early_detection: 0.8,
                high: 0.9,
                medium: 0.6,
                low: 0.35,
                very_low: 0.15,
                error: 0.0,
            },
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bands.is_empty() {
            return Err("confidence.bands must not be empty".to_string());
        }
        if self.bands.last().and_then(|b| b.max_age_minutes).is_some() {
            return Err("the last confidence band must be open-ended".to_string());
        }
        let mut previous = self.ultra_early.max_age_minutes;
        for band in &self.bands {
            if let Some(max_age) = band.max_age_minutes {
                if max_age <= previous {
                    return Err("confidence bands must be ascending by age".to_string());
                }
                previous = max_age;
            }
            if band.tiers.is_empty() {
                return Err("every confidence band needs at least one tier".to_string());
            }
            for pair in band.tiers.windows(2) {
                if pair[0].min_coverage_pct <= pair[1].min_coverage_pct {
                    return Err("coverage tiers must be descending".to_string());
                }
            }
        }
        let scores = [
            self.scores.early_detection,
            self.scores.high,
            self.scores.medium,
            self.scores.low,
            self.scores.very_low,
            self.scores.error,
        ];
        if scores.iter().any(|s| !(0.0..=1.0).contains(s)) {
            return Err("confidence scores must lie within [0, 1]".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyConfig {
    pub security_cap: f64,
    /// Points for a perfect 100 security score.
    pub security_scale: f64,
    pub risk_factor_penalty: f64,
    pub security_default: f64,
    pub dex_cap: f64,
    /// Points for a perfect 10/10 presence score.
    pub presence_scale: f64,
    pub liquidity_quality: Ladder,
    pub dex_default: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            security_cap: 12.0,
            security_scale: 12.0,
            risk_factor_penalty: 2.0,
            security_default: 8.0,
            dex_cap: 10.0,
            presence_scale: 7.0,
            liquidity_quality: Ladder::from_pairs(&[(80.0, 3.0), (60.0, 2.0), (40.0, 1.0)]),
            dex_default: 5.0,
        }
    }
}

impl SafetyConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.liquidity_quality.validate("safety.liquidity_quality")?;
        check_within_cap("safety.security_scale", self.security_scale, self.security_cap)?;
        check_within_cap("safety.security_default", self.security_default, self.security_cap)?;
        check_within_cap(
            "safety.dex_presence",
            self.presence_scale + self.liquidity_quality.max_points(),
            self.dex_cap,
        )?;
        check_within_cap("safety.dex_default", self.dex_default, self.dex_cap)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossPlatformConfig {
    pub count: Ladder,
    pub key_platforms: Vec<String>,
    pub key_platform_points: f64,
    pub key_cap: f64,
}

impl Default for CrossPlatformConfig {
    fn default() -> Self {
        Self {
            count: Ladder::from_pairs(&[(4.0, 8.0), (2.0, 5.0), (1.0, 2.0)]),
            key_platforms: vec![
                "dexscreener".to_string(),
                "birdeye".to_string(),
                "geckoterminal".to_string(),
                "jupiter".to_string(),
            ],
            key_platform_points: 1.0,
            key_cap: 4.0,
        }
    }
}

impl CrossPlatformConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.count.validate("cross_platform.count")?;
        if self.key_platform_points < 0.0 || self.key_cap < 0.0 {
            return Err("cross_platform key points must be non-negative".to_string());
        }
        Ok(())
    }
}

/// Reduced-cost screening pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FastModeConfig {
    /// Candidates below this fast score are dropped before the full pass.
    pub screening_threshold: f64,
    pub security_cap: f64,
    pub security: Ladder,
    pub security_default: f64,
    pub liquidity_cap: f64,
    pub liquidity_usd: Ladder,
    pub liquidity_default: f64,
}

impl Default for FastModeConfig {
    fn default() -> Self {
        Self {
            screening_threshold: 35.0,
            security_cap: 12.0,
            security: Ladder::from_pairs(&[(80.0, 12.0), (60.0, 9.0), (40.0, 6.0), (20.0, 3.0)]),
            security_default: 6.0,
            liquidity_cap: 10.0,
            liquidity_usd: Ladder::from_pairs(&[
                (100_000.0, 10.0),
                (50_000.0, 8.0),
                (20_000.0, 6.0),
                (10_000.0, 4.0),
                (5_000.0, 2.0),
            ]),
            liquidity_default: 3.0,
        }
    }
}

impl FastModeConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.security.validate("fast.security")?;
        self.liquidity_usd.validate("fast.liquidity_usd")?;
        check_within_cap("fast.security", self.security.max_points(), self.security_cap)?;
        check_within_cap("fast.liquidity_usd", self.liquidity_usd.max_points(), self.liquidity_cap)?;
        if !(0.0..=100.0).contains(&self.screening_threshold) {
            return Err("fast.screening_threshold must lie within [0, 100]".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ScoringConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_ladder_above_cap_is_rejected() {
        let mut config = ScoringConfig::default();
        config.platform.usd_velocity = Ladder::from_pairs(&[(1_000.0, 15.0)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_venue_order_is_enforced() {
        let mut config = ScoringConfig::default();
        config.platform.venue_points.trending = 18.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_confidence_bands_must_ascend() {
        let mut config = ScoringConfig::default();
        config.confidence.bands[1].max_age_minutes = Some(60.0);
        assert!(config.validate().is_err());
    }
}
