use clap::{Parser, Subcommand};
use conviction_scorer::{
    config::Settings,
    models::{ConvictionScore, ScoringInput, ScoringMode},
    scoring::ScoreCalculator,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "conviction-scorer")]
#[clap(about = "Score early-stage token candidates", long_about = None)]
struct Cli {
    /// Settings file layered over the built-in defaults
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one candidate (or every candidate in an array)
    Score {
        /// JSON file with a scoring input or an array of them
        #[clap(short, long)]
        input: PathBuf,

        /// Use the reduced-cost 1h/6h/24h screening mode
        #[clap(long)]
        fast: bool,

        /// Print the full breakdown as JSON
        #[clap(long)]
        json: bool,
    },

    /// Score a batch on the worker pool
    Batch {
        /// JSON file with an array of scoring inputs
        #[clap(short, long)]
        input: PathBuf,

        /// Run the fast screening pass first and fully score survivors only
        #[clap(long)]
        screen: bool,
    },

    /// Print the effective settings as JSON
    Config,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputFile {
    Many(Vec<ScoringInput>),
    One(Box<ScoringInput>),
}

impl InputFile {
    fn into_vec(self) -> Vec<ScoringInput> {
        match self {
            InputFile::Many(inputs) => inputs,
            InputFile::One(input) => vec![*input],
        }
    }
}

fn load_inputs(path: &PathBuf) -> anyhow::Result<Vec<ScoringInput>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let parsed: InputFile = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Malformed input in {}: {}", path.display(), e))?;
    Ok(parsed.into_vec())
}

fn print_summary(calculator: &ScoreCalculator, score: &ConvictionScore) {
    let b = &score.breakdown;
    println!("\n=== Conviction Score ===");
    println!("Candidate: {}", score.candidate);
    println!("Mode: {:?}", b.mode);
    println!("Score: {:.2}/100 ({})", score.score, calculator.conviction_level(score).as_str());
    println!("\nBreakdown (raw {:.2}/{:.0}):", b.raw_total, b.raw_max);
    for (name, summary) in b.stage_summaries() {
        println!(
            "  {:<15} {:>6.2} / {:<4.0} ({:.0}%)",
            name, summary.score, summary.max_score, summary.weight_pct
        );
    }
    println!("\nVenue: {}", b.platform.venue.as_str());
    if let Some(confidence) = &b.momentum.confidence {
        println!(
            "Confidence: {} (coverage {:.0}%, multiplier {:.2}{})",
            confidence.level.as_str(),
            confidence.coverage_pct,
            b.momentum.confidence_multiplier,
            if confidence.needs_review { ", needs review" } else { "" }
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (settings, load_error) = match &cli.config {
        Some(path) => (Settings::from_file(path)?, None),
        None => match Settings::new() {
            Ok(settings) => (settings, None),
            Err(e) => (Settings::default(), Some(e)),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level)),
        )
        .init();

    if let Some(e) = load_error {
        warn!("Failed to load layered settings, using built-in defaults: {}", e);
    }

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    match cli.command {
        Commands::Score { input, fast, json } => {
            let calculator = ScoreCalculator::new(settings)?;
            let mode = if fast { ScoringMode::Fast } else { ScoringMode::Full };

            for scoring_input in load_inputs(&input)? {
                info!("Scoring candidate {}", scoring_input.candidate.identity());
                let score = calculator.algorithm().score_input(&scoring_input, mode)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&score)?);
                } else {
                    print_summary(&calculator, &score);
                }
            }
        }

        Commands::Batch { input, screen } => {
            let calculator = ScoreCalculator::new(settings)?;
            let inputs = load_inputs(&input)?;

            let results = if screen {
                calculator.screen_and_score(inputs).await
            } else {
                calculator.score_batch(inputs).await
            };

            let mut failed = 0;
            for result in results {
                match result {
                    Ok(score) => print_summary(&calculator, &score),
                    Err(e) => {
                        failed += 1;
                        error!("{}", e);
                    }
                }
            }
            if failed > 0 {
                return Err(anyhow::anyhow!("{} candidates failed to score", failed));
            }
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
