use crate::config::CrossPlatformConfig;
use crate::models::{canonical_source, Candidate, Component, CrossPlatformBreakdown, StageSummary};

/// Small bonus for showing up on several independent discovery sources.
pub struct CrossPlatformScorer<'a> {
    config: &'a CrossPlatformConfig,
    max_score: f64,
    weight_pct: f64,
}

impl<'a> CrossPlatformScorer<'a> {
    pub fn new(config: &'a CrossPlatformConfig, max_score: f64, weight_pct: f64) -> Self {
        Self { config, max_score, weight_pct }
    }

    pub fn score(&self, candidate: &Candidate) -> CrossPlatformBreakdown {
        let sources = candidate.normalized_sources();
        let platform_count = sources.len();

        let count_points = self.config.count.evaluate(platform_count as f64);
        let count_cap = self.config.count.max_points();
        let platforms = Component::capped(count_points, count_cap)
            .with_signal(format!("PLATFORMS_{}", platform_count));

        let key_platforms_found: Vec<String> = self
            .config
            .key_platforms
            .iter()
            .map(|k| canonical_source(k))
            .filter(|k| sources.contains(k))
            .collect();
        let key_points = key_platforms_found.len() as f64 * self.config.key_platform_points;
        let key_platforms = Component::capped(key_points, self.config.key_cap)
            .with_signals(key_platforms_found.iter().map(|k| format!("KEY_{}", k.to_uppercase())));

        CrossPlatformBreakdown {
            summary: StageSummary::clamped(platforms.points + key_platforms.points, self.max_score, self.weight_pct),
            platform_count,
            platforms,
            key_platforms,
            key_platforms_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(tags: &[&str]) -> Candidate {
        let mut c = Candidate::new("mint");
        c.sources = tags.iter().map(|t| t.to_string()).collect();
        c
    }

    #[test]
    fn test_platform_ladder() {
        let config = CrossPlatformConfig::default();
        let scorer = CrossPlatformScorer::new(&config, 12.0, 10.0);
        assert_eq!(scorer.score(&candidate(&[])).summary.score, 0.0);
        assert_eq!(scorer.score(&candidate(&["pump_fun"])).summary.score, 2.0);
        assert_eq!(scorer.score(&candidate(&["pump_fun", "letsbonk"])).summary.score, 5.0);
    }

    #[test]
    fn test_key_platforms_add_up_to_cap() {
        let config = CrossPlatformConfig::default();
        let scorer = CrossPlatformScorer::new(&config, 12.0, 10.0);
        let b = scorer.score(&candidate(&["pump_fun", "DexScreener", "birdeye", "geckoterminal", "jupiter"]));
        assert_eq!(b.platform_count, 5);
        assert_eq!(b.platforms.points, 8.0);
        assert_eq!(b.key_platforms.points, 4.0);
        assert_eq!(b.summary.score, 12.0);
    }

    #[test]
    fn test_duplicate_tags_count_once() {
        let config = CrossPlatformConfig::default();
        let scorer = CrossPlatformScorer::new(&config, 12.0, 10.0);
        let b = scorer.score(&candidate(&["birdeye", "BirdEye ", "birdeye"]));
        assert_eq!(b.platform_count, 1);
        assert_eq!(b.summary.score, 3.0);
    }

    #[test]
    fn test_venue_aliases_are_one_platform() {
        let config = CrossPlatformConfig::default();
        let scorer = CrossPlatformScorer::new(&config, 12.0, 10.0);
        let aliased = scorer.score(&candidate(&["pump.fun", "pump_fun", "PumpFun"]));
        assert_eq!(aliased.platform_count, 1);
        assert_eq!(aliased.summary.score, scorer.score(&candidate(&["pump_fun"])).summary.score);

        let keyed = scorer.score(&candidate(&["Dex-Screener", "dexscreener", "gecko terminal"]));
        assert_eq!(keyed.platform_count, 2);
        assert_eq!(keyed.key_platforms_found, vec!["dexscreener".to_string(), "geckoterminal".to_string()]);
        assert_eq!(keyed.summary.score, 7.0);
    }
}
