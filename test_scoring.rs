use conviction_scorer::{
    config::Settings,
    models::{
        Candidate, DexPresenceAnalysis, LaunchStage, ScoringInput, SecurityAnalysis, SupplementaryAnalyses,
        TimeframeMetrics,
    },
    scoring::ScoreCalculator,
};
use tracing::{error, info};

fn fresh_launch() -> ScoringInput {
    let mut candidate = Candidate::new("FreshLaunch1111111111111111111111111111pump");
    candidate.symbol = Some("FRESH".to_string());
    candidate.sources = ["pump_fun".to_string()].into_iter().collect();
    candidate.age_minutes = Some(5.0);
    candidate.bonding_curve_progress = Some(15.0);
    candidate.timeframes.m5.trades = Some(3);

    ScoringInput::new(candidate, SupplementaryAnalyses::default())
}

fn breakout() -> ScoringInput {
    let mut candidate = Candidate::new("Breakout11111111111111111111111111111pump");
    candidate.symbol = Some("BRKT".to_string());
    candidate.sources = ["pump_fun", "dexscreener", "birdeye", "moralis"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    candidate.launch_stage = Some(LaunchStage::EarlyMomentum);
    candidate.age_minutes = Some(20.0);
    candidate.usd_per_hour = Some(20_000.0);
    candidate.bonding_curve_progress = Some(60.0);
    candidate.timeframes.m5 = TimeframeMetrics { volume: Some(6_000.0), price_change: Some(15.0), trades: Some(25) };
    candidate.timeframes.m15 = TimeframeMetrics { volume: Some(14_000.0), price_change: Some(12.0), trades: None };
    candidate.timeframes.m30 = TimeframeMetrics { volume: Some(26_000.0), price_change: Some(10.0), trades: None };
    candidate.timeframes.h1 = TimeframeMetrics { volume: Some(50_000.0), price_change: Some(8.0), trades: Some(300) };
    candidate.timeframes.h6 = TimeframeMetrics { volume: Some(60_000.0), price_change: Some(5.0), trades: None };
    candidate.timeframes.h24 = TimeframeMetrics { volume: Some(120_000.0), price_change: Some(30.0), trades: Some(1_000) };
    candidate.timeframes.unique_traders_24h = Some(300);

    let analyses = SupplementaryAnalyses {
        security: Some(SecurityAnalysis { score: 90.0, risk_factors: vec![] }),
        dex_presence: Some(DexPresenceAnalysis { presence_score: 8.0, liquidity_quality: 85.0 }),
        ..SupplementaryAnalyses::default()
    };

    ScoringInput::new(candidate, analyses)
}

fn stale_listing() -> ScoringInput {
    let mut candidate = Candidate::new("Stale111111111111111111111111111111111111");
    candidate.symbol = Some("OLD".to_string());
    candidate.sources = ["geckoterminal".to_string()].into_iter().collect();
    candidate.age_hours = Some(20.0);
    candidate.timeframes.h24.volume = Some(8_000.0);
    candidate.timeframes.h24.price_change = Some(-45.0);

    let analyses = SupplementaryAnalyses {
        security: Some(SecurityAnalysis {
            score: 40.0,
            risk_factors: vec!["mint_authority".to_string(), "top10_concentration".to_string()],
        }),
        ..SupplementaryAnalyses::default()
    };

    ScoringInput::new(candidate, analyses)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Running reference conviction scenarios");

    let calculator = ScoreCalculator::new(Settings::default())?;
    let scenarios = vec![
        ("fresh launch", fresh_launch()),
        ("breakout", breakout()),
        ("stale listing", stale_listing()),
    ];

    for (name, input) in scenarios {
        info!("\n============================================================");
        info!("Scenario: {}", name);
        info!("============================================================");

        match calculator.score_candidate(input).await {
            Ok(score) => {
                let b = &score.breakdown;
                info!("🎯 CONVICTION: {:.1}/100 ({})", score.score, calculator.conviction_level(&score).as_str());
                info!("📊 Platform/Stage:   {:.2}/{:.0}", b.platform.summary.score, b.platform.summary.max_score);
                info!("   venue {} base {:.1} velocity {:.1} stage {:.1} age {:.1} progression {:.1}",
                    b.platform.venue.as_str(),
                    b.platform.base.points,
                    b.platform.velocity.points,
                    b.platform.stage.points,
                    b.platform.age_freshness.points,
                    b.platform.progression_risk.points);
                info!("📈 Momentum:         {:.2}/{:.0}", b.momentum.summary.score, b.momentum.summary.max_score);
                info!("   volume {:.2} cascade {:.2} activity {:.2} x{:.2}",
                    b.momentum.volume_acceleration.points,
                    b.momentum.momentum_cascade.points,
                    b.momentum.activity_surge.points,
                    b.momentum.confidence_multiplier);
                if let Some(confidence) = &b.momentum.confidence {
                    info!("   confidence {} ({:.0}% coverage){}",
                        confidence.level.as_str(),
                        confidence.coverage_pct,
                        if confidence.needs_review { " ⚠️ review" } else { "" });
                }
                info!("🛡️  Safety:           {:.2}/{:.0}", b.safety.summary.score, b.safety.summary.max_score);
                info!("🌐 Cross-platform:   {:.2}/{:.0}", b.cross_platform.summary.score, b.cross_platform.summary.max_score);
            }
            Err(e) => {
                error!("Failed to score {}: {}", name, e);
            }
        }
    }

    Ok(())
}
