use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use super::error::{Result, ScoringError};

/// The fixed set of trading horizons the engine reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timeframe {
    M5,
    M15,
    M30,
    H1,
    H6,
    H24,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H6,
        Timeframe::H24,
    ];

    pub const SHORT: [Timeframe; 3] = [Timeframe::M5, Timeframe::M15, Timeframe::M30];

    pub const LONG: [Timeframe; 2] = [Timeframe::H6, Timeframe::H24];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M5 => "m5",
            Timeframe::M15 => "m15",
            Timeframe::M30 => "m30",
            Timeframe::H1 => "h1",
            Timeframe::H6 => "h6",
            Timeframe::H24 => "h24",
        }
    }

    pub fn minutes(&self) -> f64 {
        match self {
            Timeframe::M5 => 5.0,
            Timeframe::M15 => 15.0,
            Timeframe::M30 => 30.0,
            Timeframe::H1 => 60.0,
            Timeframe::H6 => 360.0,
            Timeframe::H24 => 1440.0,
        }
    }

    /// Multiplier that turns a window total into an hourly rate.
    pub fn hourly_factor(&self) -> f64 {
        60.0 / self.minutes()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeframeMetrics {
    pub volume: Option<f64>,
    pub price_change: Option<f64>,
    pub trades: Option<u64>,
}

impl TimeframeMetrics {
    pub fn has_data(&self) -> bool {
        self.volume.map_or(false, |v| v > 0.0)
            || self.trades.map_or(false, |t| t > 0)
            || self.price_change.map_or(false, |p| p != 0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeframeSeries {
    pub m5: TimeframeMetrics,
    pub m15: TimeframeMetrics,
    pub m30: TimeframeMetrics,
    pub h1: TimeframeMetrics,
    pub h6: TimeframeMetrics,
    pub h24: TimeframeMetrics,
    pub unique_traders_24h: Option<u64>,
}

impl TimeframeSeries {
    pub fn get(&self, timeframe: Timeframe) -> &TimeframeMetrics {
        match timeframe {
            Timeframe::M5 => &self.m5,
            Timeframe::M15 => &self.m15,
            Timeframe::M30 => &self.m30,
            Timeframe::H1 => &self.h1,
            Timeframe::H6 => &self.h6,
            Timeframe::H24 => &self.h24,
        }
    }

    pub fn get_mut(&mut self, timeframe: Timeframe) -> &mut TimeframeMetrics {
        match timeframe {
            Timeframe::M5 => &mut self.m5,
            Timeframe::M15 => &mut self.m15,
            Timeframe::M30 => &mut self.m30,
            Timeframe::H1 => &mut self.h1,
            Timeframe::H6 => &mut self.h6,
            Timeframe::H24 => &mut self.h24,
        }
    }

    /// Volume for the window, zero when absent.
    pub fn volume(&self, timeframe: Timeframe) -> f64 {
        self.get(timeframe).volume.unwrap_or(0.0)
    }

    pub fn price_change(&self, timeframe: Timeframe) -> Option<f64> {
        self.get(timeframe).price_change
    }

    pub fn trades(&self, timeframe: Timeframe) -> u64 {
        self.get(timeframe).trades.unwrap_or(0)
    }

    pub fn timeframes_with_data(&self) -> Vec<Timeframe> {
        Timeframe::ALL
            .iter()
            .copied()
            .filter(|tf| self.get(*tf).has_data())
            .collect()
    }

    fn validate(&self) -> Result<()> {
        for tf in Timeframe::ALL {
            let metrics = self.get(tf);
            check_non_negative(&format!("timeframes.{}.volume", tf.as_str()), metrics.volume)?;
            check_finite(&format!("timeframes.{}.price_change", tf.as_str()), metrics.price_change)?;
        }
        Ok(())
    }
}

/// Launch venues, ordered from least to most speculative placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LaunchVenue {
    Unrecognized,
    Trending,
    Graduated,
    LetsBonk,
    PumpFun,
    PumpFunLive,
}

impl LaunchVenue {
    pub const ALL: [LaunchVenue; 6] = [
        LaunchVenue::PumpFunLive,
        LaunchVenue::PumpFun,
        LaunchVenue::LetsBonk,
        LaunchVenue::Graduated,
        LaunchVenue::Trending,
        LaunchVenue::Unrecognized,
    ];

    /// Higher rank means an earlier, more speculative placement.
    pub fn rank(&self) -> u8 {
        match self {
            LaunchVenue::Unrecognized => 0,
            LaunchVenue::Trending => 1,
            LaunchVenue::Graduated => 2,
            LaunchVenue::LetsBonk => 3,
            LaunchVenue::PumpFun => 4,
            LaunchVenue::PumpFunLive => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchVenue::Unrecognized => "unrecognized",
            LaunchVenue::Trending => "trending",
            LaunchVenue::Graduated => "graduated",
            LaunchVenue::LetsBonk => "letsbonk",
            LaunchVenue::PumpFun => "pump_fun",
            LaunchVenue::PumpFunLive => "pump_fun_live",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match canonical_source(tag).as_str() {
            "pump_fun_live" => Some(LaunchVenue::PumpFunLive),
            "pump_fun" => Some(LaunchVenue::PumpFun),
            "letsbonk" => Some(LaunchVenue::LetsBonk),
            "graduated" | "pumpswap" | "raydium" | "meteora" => Some(LaunchVenue::Graduated),
            "trending" | "dexscreener" | "birdeye" | "geckoterminal" | "moralis" | "jupiter" => {
                Some(LaunchVenue::Trending)
            }
            _ => None,
        }
    }

    /// Highest-ranked venue among the tags; unknown tags never outrank a known one.
    pub fn detect<'a, I>(tags: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter()
            .filter_map(|tag| LaunchVenue::from_tag(tag))
            .max_by_key(|venue| venue.rank())
            .unwrap_or(LaunchVenue::Unrecognized)
    }

    /// Venues that report raise velocity in the chain's native unit rather than USD.
    pub fn is_native_unit(&self) -> bool {
        matches!(self, LaunchVenue::LetsBonk)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LaunchStage {
    UltraEarly,
    EarlyMomentum,
    ConfirmedGrowth,
    Graduated,
    Unknown,
}

impl LaunchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStage::UltraEarly => "ultra_early",
            LaunchStage::EarlyMomentum => "early_momentum",
            LaunchStage::ConfirmedGrowth => "confirmed_growth",
            LaunchStage::Graduated => "graduated",
            LaunchStage::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AgeSource {
    Minutes,
    Hours,
    CreatedAt,
    /// Creation timestamp lies after the observation timestamp.
    ClockSkew,
    Default,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgeEstimate {
    pub minutes: f64,
    pub source: AgeSource,
}

impl AgeEstimate {
    pub fn is_known(&self) -> bool {
        !matches!(self.source, AgeSource::Default | AgeSource::ClockSkew)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Candidate {
    pub address: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,

    // Discovery metadata
    pub sources: BTreeSet<String>,
    pub launch_stage: Option<LaunchStage>,
    pub age_minutes: Option<f64>,
    pub age_hours: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub observed_at: Option<DateTime<Utc>>,
    pub bonding_curve_progress: Option<f64>,
    pub usd_per_hour: Option<f64>,
    pub native_per_hour: Option<f64>,
    pub native_raised: Option<f64>,

    // Market snapshot
    pub market_cap: Option<f64>,
    pub liquidity: Option<f64>,
    pub security_score: Option<f64>,
    pub risk_factors: Vec<String>,

    pub timeframes: TimeframeSeries,
}

impl Candidate {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Identity used when annotating errors and log lines.
    pub fn identity(&self) -> String {
        self.address
            .as_deref()
            .or(self.symbol.as_deref())
            .or(self.name.as_deref())
            .unwrap_or("<unknown>")
            .to_string()
    }

    /// Canonical, non-empty source tags. Aliases of one platform collapse
    /// into a single entry.
    pub fn normalized_sources(&self) -> BTreeSet<String> {
        self.sources
            .iter()
            .map(|s| canonical_source(s))
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn venue(&self) -> LaunchVenue {
        LaunchVenue::detect(self.sources.iter())
    }

    pub fn estimate_age(&self, default_minutes: f64) -> AgeEstimate {
        if let Some(minutes) = self.age_minutes {
            return AgeEstimate { minutes, source: AgeSource::Minutes };
        }
        if let Some(hours) = self.age_hours {
            return AgeEstimate { minutes: hours * 60.0, source: AgeSource::Hours };
        }
        if let (Some(created), Some(observed)) = (self.created_at, self.observed_at) {
            let seconds = (observed - created).num_seconds();
            if seconds < 0 {
                return AgeEstimate { minutes: default_minutes, source: AgeSource::ClockSkew };
            }
            return AgeEstimate {
                minutes: seconds as f64 / 60.0,
                source: AgeSource::CreatedAt,
            };
        }
        AgeEstimate { minutes: default_minutes, source: AgeSource::Default }
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("age_minutes", self.age_minutes)?;
        check_non_negative("age_hours", self.age_hours)?;
        check_percentage("bonding_curve_progress", self.bonding_curve_progress)?;
        check_non_negative("usd_per_hour", self.usd_per_hour)?;
        check_non_negative("native_per_hour", self.native_per_hour)?;
        check_non_negative("native_raised", self.native_raised)?;
        check_non_negative("market_cap", self.market_cap)?;
        check_non_negative("liquidity", self.liquidity)?;
        check_percentage("security_score", self.security_score)?;
        self.timeframes.validate()
    }
}

/// Canonical spelling of a discovery source tag: lowercased, with `.`, `-`
/// and spaces folded to `_`, and known aliases mapped to one name.
pub fn canonical_source(tag: &str) -> String {
    let normalized = tag.trim().to_lowercase().replace(['.', '-', ' '], "_");
    let canonical = match normalized.as_str() {
        "pump_fun_live" | "pumpfun_live" | "pump_live" => "pump_fun_live",
        "pump_fun" | "pumpfun" | "pump" => "pump_fun",
        "letsbonk" | "lets_bonk" | "bonk_fun" | "bonk" => "letsbonk",
        "pumpswap" | "pump_swap" => "pumpswap",
        "dex_screener" => "dexscreener",
        "gecko_terminal" => "geckoterminal",
        other => other,
    };
    canonical.to_string()
}

pub(crate) fn check_finite(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => Err(ScoringError::invalid_field(field, format!("expected a finite number, got {}", v))),
        _ => Ok(()),
    }
}

pub(crate) fn check_non_negative(field: &str, value: Option<f64>) -> Result<()> {
    check_finite(field, value)?;
    match value {
        Some(v) if v < 0.0 => Err(ScoringError::invalid_field(field, format!("must not be negative, got {}", v))),
        _ => Ok(()),
    }
}

pub(crate) fn check_range(field: &str, value: Option<f64>, min: f64, max: f64) -> Result<()> {
    check_finite(field, value)?;
    match value {
        Some(v) if v < min || v > max => Err(ScoringError::invalid_field(
            field,
            format!("must be within [{}, {}], got {}", min, max, v),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn check_percentage(field: &str, value: Option<f64>) -> Result<()> {
    check_range(field, value, 0.0, 100.0)
}
