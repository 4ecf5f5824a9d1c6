use tracing::debug;

use crate::config::MomentumConfig;
use crate::models::{Component, ConfidenceAssessment, MomentumBreakdown, StageSummary, Timeframe, TimeframeSeries};

/// Which timeframes the analyzer may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// All six timeframes.
    Full,
    /// 1h, 6h and 24h only.
    Fast,
}

impl Horizon {
    fn short_term(&self) -> bool {
        matches!(self, Horizon::Full)
    }
}

pub struct MomentumAnalyzer<'a> {
    config: &'a MomentumConfig,
    max_score: f64,
    weight_pct: f64,
}

impl<'a> MomentumAnalyzer<'a> {
    pub fn new(config: &'a MomentumConfig, max_score: f64, weight_pct: f64) -> Self {
        Self { config, max_score, weight_pct }
    }

    pub fn analyze(
        &self,
        series: &TimeframeSeries,
        confidence: Option<ConfidenceAssessment>,
        horizon: Horizon,
    ) -> MomentumBreakdown {
        let volume_acceleration = self.volume_acceleration(series, horizon);
        let momentum_cascade = self.momentum_cascade(series, horizon);
        let activity_surge = self.activity_surge(series, horizon);

        let pre_confidence = (volume_acceleration.points + momentum_cascade.points + activity_surge.points)
            .clamp(0.0, self.max_score);

        let confidence_multiplier = confidence
            .as_ref()
            .map(|c| self.config.confidence_multipliers.for_level(c.level))
            .unwrap_or(1.0);

        let summary = StageSummary::clamped(pre_confidence * confidence_multiplier, self.max_score, self.weight_pct);

        debug!(
            pre_confidence,
            confidence_multiplier,
            score = summary.score,
            "momentum stage scored"
        );

        MomentumBreakdown {
            summary,
            volume_acceleration,
            momentum_cascade,
            activity_surge,
            pre_confidence,
            confidence_multiplier,
            confidence,
        }
    }

    fn volume_acceleration(&self, series: &TimeframeSeries, horizon: Horizon) -> Component {
        let cfg = self.config;
        let mut raw: f64 = 0.0;
        let mut signals = Vec::new();

        let hour = series.volume(Timeframe::H1);
        let six_hour_rate = series.volume(Timeframe::H6) / 6.0;
        let day_rate = series.volume(Timeframe::H24) / 24.0;

        if horizon.short_term() {
            let short_rate = Timeframe::SHORT
                .iter()
                .map(|tf| series.volume(*tf) * tf.hourly_factor())
                .find(|rate| *rate > 0.0);
            if let (Some(rate), true) = (short_rate, hour > 0.0) {
                let ratio = rate / hour;
                let points = cfg.short_vs_hour.evaluate(ratio);
                if points > 0.0 {
                    signals.push(format!("SHORT_VS_1H_{:.1}X", ratio));
                }
                raw += points;
            }
        }

        if hour > 0.0 && six_hour_rate > 0.0 {
            let ratio = hour / six_hour_rate;
            let points = cfg.hour_vs_six_hour.evaluate(ratio);
            if points > 0.0 {
                signals.push(format!("1H_VS_6H_AVG_{:.1}X", ratio));
            }
            raw += points;
        }

        if six_hour_rate > 0.0 && day_rate > 0.0 {
            let ratio = six_hour_rate / day_rate;
            let points = cfg.six_hour_vs_day.evaluate(ratio);
            if points > 0.0 {
                signals.push(format!("6H_VS_24H_AVG_{:.1}X", ratio));
            }
            raw += points;
        }

        let absolute = cfg.hour_volume_usd.evaluate(hour);
        if absolute > 0.0 {
            signals.push(format!("1H_VOLUME_{:.0}", hour));
        }
        raw += absolute;

        let raw = raw.clamp(0.0, cfg.volume_raw_max);
        Component::capped(raw * cfg.volume_scale, cfg.volume_cap).with_signals(signals)
    }

    fn momentum_cascade(&self, series: &TimeframeSeries, horizon: Horizon) -> Component {
        let cfg = self.config;
        let mut raw: f64 = 0.0;
        let mut signals = Vec::new();

        let p5 = series.price_change(Timeframe::M5);
        let p1h = series.price_change(Timeframe::H1);
        let p6h = series.price_change(Timeframe::H6);

        if horizon.short_term() {
            let short: Option<Vec<f64>> = Timeframe::SHORT
                .iter()
                .map(|tf| series.price_change(*tf).filter(|p| *p > 0.0))
                .collect();
            if let Some(changes) = short {
                let average = changes.iter().sum::<f64>() / changes.len() as f64;
                raw += cfg.short_positive.evaluate(average);
                signals.push(format!("SHORT_CASCADE_AVG_{:.1}PCT", average));
            }
        }

        if let (Some(h1), Some(h6)) = (p1h, p6h) {
            if h1 > 0.0 && h6 > 0.0 {
                let average = (h1 + h6) / 2.0;
                raw += cfg.sustained_positive.evaluate(average);
                signals.push(format!("SUSTAINED_AVG_{:.1}PCT", average));
            }
        }

        if let Some(day) = series.price_change(Timeframe::H24) {
            let surge = cfg.day_surge.evaluate(day);
            let drawdown = cfg.day_drawdown.step(day);
            if surge > 0.0 {
                signals.push(format!("24H_SURGE_{:.0}PCT", day));
            }
            if let Some(label) = drawdown.label {
                signals.push(label);
            }
            raw += surge + drawdown.points;
        }

        if horizon.short_term() {
            if let (Some(m5), Some(h1), Some(h6)) = (p5, p1h, p6h) {
                if m5 > h1 && h1 > h6 && h6 > 0.0 {
                    raw += cfg.acceleration_bonus;
                    signals.push("ACCELERATION_SIGNATURE".to_string());
                }
            }
        }

        let raw = raw.clamp(cfg.cascade_raw_min, cfg.cascade_raw_max);
        let scaled = (raw * cfg.cascade_scale).clamp(cfg.cascade_floor, cfg.cascade_cap);
        Component::capped(scaled, cfg.cascade_cap).with_signals(signals)
    }

    fn activity_surge(&self, series: &TimeframeSeries, horizon: Horizon) -> Component {
        let cfg = self.config;
        let mut raw: f64 = 0.0;
        let mut signals = Vec::new();

        if horizon.short_term() {
            let trades = series.trades(Timeframe::M5);
            let points = cfg.trades_5m.evaluate(trades as f64);
            if points > 0.0 {
                signals.push(format!("5M_TRADES_{}", trades));
            }
            raw += points;
        }

        let trades = series.trades(Timeframe::H1);
        let points = cfg.trades_1h.evaluate(trades as f64);
        if points > 0.0 {
            signals.push(format!("1H_TRADES_{}", trades));
        }
        raw += points;

        let unique = series.unique_traders_24h.unwrap_or(0);
        let day_trades = series.trades(Timeframe::H24);
        if let Some(rung) = cfg
            .trader_breadth
            .iter()
            .find(|r| unique >= r.min_unique_traders && day_trades >= r.min_trades_24h)
        {
            raw += rung.points;
            signals.push(format!("TRADER_BREADTH_{}_UNIQUE", unique));
        }

        let raw = raw.clamp(0.0, cfg.activity_raw_max);
        Component::capped(raw * cfg.activity_scale, cfg.activity_cap).with_signals(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeEstimate, AgeSource, ConfidenceLevel};

    fn analyzer(config: &MomentumConfig) -> MomentumAnalyzer<'_> {
        MomentumAnalyzer::new(config, 38.0, 30.0)
    }

    fn confidence(level: ConfidenceLevel) -> ConfidenceAssessment {
        ConfidenceAssessment {
            level,
            score: 0.5,
            coverage_pct: 50.0,
            threshold_adjustment: 1.0,
            age: AgeEstimate { minutes: 20.0, source: AgeSource::Minutes },
            age_category: None,
            needs_review: false,
            reason: String::new(),
        }
    }

    fn hot_series() -> TimeframeSeries {
        let mut s = TimeframeSeries::default();
        s.m5.volume = Some(60_000.0);
        s.h1.volume = Some(150_000.0);
        s.h6.volume = Some(180_000.0);
        s.h24.volume = Some(200_000.0);
        s.m5.price_change = Some(40.0);
        s.m15.price_change = Some(30.0);
        s.m30.price_change = Some(25.0);
        s.h1.price_change = Some(80.0);
        s.h6.price_change = Some(60.0);
        s.h24.price_change = Some(150.0);
        s.m5.trades = Some(120);
        s.h1.trades = Some(900);
        s.h24.trades = Some(5_000);
        s.unique_traders_24h = Some(1_200);
        s
    }

    #[test]
    fn test_empty_series_scores_zero() {
        let config = MomentumConfig::default();
        let b = analyzer(&config).analyze(&TimeframeSeries::default(), None, Horizon::Full);
        assert_eq!(b.summary.score, 0.0);
        assert_eq!(b.confidence_multiplier, 1.0);
    }

    #[test]
    fn test_sub_analyses_respect_caps() {
        let config = MomentumConfig::default();
        let mut series = hot_series();
        // 80 > 60 breaks the acceleration signature; swap so it holds
        series.h1.price_change = Some(30.0);
        series.h6.price_change = Some(20.0);

        let b = analyzer(&config).analyze(&series, None, Horizon::Full);
        assert!(b.volume_acceleration.points <= 15.0);
        assert!(b.momentum_cascade.points <= 13.0);
        assert!(b.activity_surge.points <= 10.0);
        assert!((b.volume_acceleration.points - 15.0).abs() < 1e-9);
        assert!((b.activity_surge.points - 10.0).abs() < 1e-9);
        assert!(b.summary.score <= 38.0);
        assert!(b.momentum_cascade.signals.iter().any(|s| s == "ACCELERATION_SIGNATURE"));
    }

    #[test]
    fn test_multiplier_cannot_exceed_cap() {
        let config = MomentumConfig::default();
        let mut series = hot_series();
        series.h1.price_change = Some(30.0);
        series.h6.price_change = Some(20.0);

        let b = analyzer(&config).analyze(&series, Some(confidence(ConfidenceLevel::EarlyDetection)), Horizon::Full);
        assert_eq!(b.confidence_multiplier, 1.05);
        assert!(b.pre_confidence > 36.2);
        assert_eq!(b.summary.score, 38.0);
    }

    #[test]
    fn test_very_low_confidence_dampens() {
        let config = MomentumConfig::default();
        let series = hot_series();
        let plain = analyzer(&config).analyze(&series, Some(confidence(ConfidenceLevel::Medium)), Horizon::Full);
        let damped = analyzer(&config).analyze(&series, Some(confidence(ConfidenceLevel::VeryLow)), Horizon::Full);
        assert!((damped.summary.score - plain.summary.score * 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_day_dump_goes_negative_but_stage_does_not() {
        let config = MomentumConfig::default();
        let mut series = TimeframeSeries::default();
        series.h24.price_change = Some(-70.0);
        let b = analyzer(&config).analyze(&series, None, Horizon::Full);
        // -0.1 raw rescales to -3.714, held at the -3.7 floor
        assert!((b.momentum_cascade.points - (-3.7)).abs() < 1e-9);
        assert!(b.momentum_cascade.signals.iter().any(|s| s == "DUMP_24H_50+"));
        assert_eq!(b.summary.score, 0.0);
    }

    #[test]
    fn test_fast_horizon_ignores_short_timeframes() {
        let config = MomentumConfig::default();
        let mut series = TimeframeSeries::default();
        series.m5.volume = Some(10_000.0);
        series.m5.trades = Some(80);
        series.m5.price_change = Some(25.0);
        series.m15.price_change = Some(25.0);
        series.m30.price_change = Some(25.0);

        let full = analyzer(&config).analyze(&series, None, Horizon::Full);
        let fast = analyzer(&config).analyze(&series, None, Horizon::Fast);
        assert!(full.summary.score > 0.0);
        assert_eq!(fast.summary.score, 0.0);
    }

    #[test]
    fn test_zero_denominators_are_skipped() {
        let config = MomentumConfig::default();
        let mut series = TimeframeSeries::default();
        series.m5.volume = Some(5_000.0);
        series.h6.volume = Some(0.0);
        let b = analyzer(&config).analyze(&series, None, Horizon::Full);
        assert!(b.summary.score.is_finite());
        assert_eq!(b.volume_acceleration.points, 0.0);
    }
}
