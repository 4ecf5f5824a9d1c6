use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::candidate::{check_non_negative, check_percentage, check_range, check_finite, Candidate, Timeframe, TimeframeSeries};
use super::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityAnalysis {
    /// 0-100, higher is safer.
    pub score: f64,
    pub risk_factors: Vec<String>,
}

impl SecurityAnalysis {
    pub fn distinct_risk_factors(&self) -> usize {
        self.risk_factors
            .iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Security view built from the candidate's own market snapshot, used when
    /// no dedicated analysis was run. Needs at least the snapshot score.
    pub fn from_snapshot(candidate: &Candidate) -> Option<Self> {
        candidate.security_score.map(|score| SecurityAnalysis {
            score,
            risk_factors: candidate.risk_factors.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DexPresenceAnalysis {
    /// 0-10
    pub presence_score: f64,
    /// 0-100
    pub liquidity_quality: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TradingActivity {
    pub trades_5m: Option<u64>,
    pub trades_1h: Option<u64>,
    pub trades_24h: Option<u64>,
    pub unique_traders_24h: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeTrend {
    pub volume_1h: Option<f64>,
    pub volume_6h: Option<f64>,
    pub volume_24h: Option<f64>,
    pub price_change_1h: Option<f64>,
    pub price_change_6h: Option<f64>,
    pub price_change_24h: Option<f64>,
}

/// Pre-computed summaries supplied alongside a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SupplementaryAnalyses {
    pub security: Option<SecurityAnalysis>,
    pub dex_presence: Option<DexPresenceAnalysis>,
    pub trading_activity: Option<TradingActivity>,
    pub volume_trend: Option<VolumeTrend>,
}

impl SupplementaryAnalyses {
    pub fn validate(&self) -> Result<()> {
        if let Some(security) = &self.security {
            check_percentage("security.score", Some(security.score))?;
        }
        if let Some(dex) = &self.dex_presence {
            check_range("dex_presence.presence_score", Some(dex.presence_score), 0.0, 10.0)?;
            check_percentage("dex_presence.liquidity_quality", Some(dex.liquidity_quality))?;
        }
        if let Some(trend) = &self.volume_trend {
            check_non_negative("volume_trend.volume_1h", trend.volume_1h)?;
            check_non_negative("volume_trend.volume_6h", trend.volume_6h)?;
            check_non_negative("volume_trend.volume_24h", trend.volume_24h)?;
            check_finite("volume_trend.price_change_1h", trend.price_change_1h)?;
            check_finite("volume_trend.price_change_6h", trend.price_change_6h)?;
            check_finite("volume_trend.price_change_24h", trend.price_change_24h)?;
        }
        Ok(())
    }

    /// The candidate's series with absent fields filled from the activity and
    /// trend summaries. Values already on the candidate are kept.
    pub fn merged_series(&self, candidate: &Candidate) -> TimeframeSeries {
        let mut series = candidate.timeframes.clone();

        if let Some(activity) = &self.trading_activity {
            fill(&mut series.get_mut(Timeframe::M5).trades, activity.trades_5m);
            fill(&mut series.get_mut(Timeframe::H1).trades, activity.trades_1h);
            fill(&mut series.get_mut(Timeframe::H24).trades, activity.trades_24h);
            fill(&mut series.unique_traders_24h, activity.unique_traders_24h);
        }

        if let Some(trend) = &self.volume_trend {
            let pairs = [
                (Timeframe::H1, trend.volume_1h, trend.price_change_1h),
                (Timeframe::H6, trend.volume_6h, trend.price_change_6h),
                (Timeframe::H24, trend.volume_24h, trend.price_change_24h),
            ];
            for (tf, volume, price_change) in pairs {
                let metrics = series.get_mut(tf);
                fill(&mut metrics.volume, volume);
                fill(&mut metrics.price_change, price_change);
            }
        }

        series
    }
}

fn fill<T: Copy>(slot: &mut Option<T>, fallback: Option<T>) {
    if slot.is_none() {
        *slot = fallback;
    }
}
