use crate::{
    config::Settings,
    models::{ConvictionLevel, ConvictionScore, Result, ScoringError, ScoringInput, ScoringMode},
    scoring::ScoringAlgorithm,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Async façade for pipelines that score many candidates per cycle. Scoring is
/// CPU-bound, so every call runs on the blocking pool.
pub struct ScoreCalculator {
    algorithm: Arc<ScoringAlgorithm>,
    settings: Settings,
}

impl ScoreCalculator {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate().map_err(ScoringError::InvalidConfig)?;
        let algorithm = ScoringAlgorithm::new(settings.scoring.clone())?;

        Ok(Self {
            algorithm: Arc::new(algorithm),
            settings,
        })
    }

    pub fn algorithm(&self) -> &ScoringAlgorithm {
        &self.algorithm
    }

    pub async fn score_candidate(&self, input: ScoringInput) -> Result<ConvictionScore> {
        self.spawn_scoring(input, ScoringMode::Full).await
    }

    /// Scores every input; results keep input order and failures are returned,
    /// not dropped.
    pub async fn score_batch(&self, inputs: Vec<ScoringInput>) -> Vec<Result<ConvictionScore>> {
        info!("Scoring batch of {} candidates", inputs.len());
        self.run_all(inputs, ScoringMode::Full).await
    }

    /// Fast pass on every input, full pass only on candidates whose fast score
    /// clears the screening threshold. Screened-out candidates are omitted;
    /// survivors and failures keep their input order.
    pub async fn screen_and_score(&self, inputs: Vec<ScoringInput>) -> Vec<Result<ConvictionScore>> {
        let threshold = self.settings.scoring.fast.screening_threshold;
        let total = inputs.len();

        let screened = self.run_all(inputs.clone(), ScoringMode::Fast).await;

        let mut slots: Vec<Option<Result<ConvictionScore>>> = Vec::with_capacity(total);
        let mut survivors = Vec::new();
        let mut survivor_slots = Vec::new();
        for (input, result) in inputs.into_iter().zip(screened) {
            match result {
                Ok(fast) if fast.score >= threshold => {
                    survivor_slots.push(slots.len());
                    survivors.push(input);
                    slots.push(None);
                }
                Ok(fast) => {
                    info!("Screened out {} (fast score {:.1} < {:.1})", fast.candidate, fast.score, threshold);
                }
                Err(e) => slots.push(Some(Err(e))),
            }
        }

        info!(
            "{} of {} candidates passed screening, {} failed",
            survivors.len(),
            total,
            slots.len() - survivors.len()
        );

        let scored = self.run_all(survivors, ScoringMode::Full).await;
        for (slot, result) in survivor_slots.into_iter().zip(scored) {
            slots[slot] = Some(result);
        }

        slots.into_iter().flatten().collect()
    }

    pub fn conviction_level(&self, score: &ConvictionScore) -> ConvictionLevel {
        ConvictionLevel::from_score(score.score, &self.settings.conviction)
    }

    async fn run_all(&self, inputs: Vec<ScoringInput>, mode: ScoringMode) -> Vec<Result<ConvictionScore>> {
        let tasks = inputs.into_iter().map(|input| self.spawn_scoring(input, mode));
        join_all(tasks).await
    }

    async fn spawn_scoring(&self, input: ScoringInput, mode: ScoringMode) -> Result<ConvictionScore> {
        let algorithm = Arc::clone(&self.algorithm);
        let identity = input.candidate.identity();

        let result = tokio::task::spawn_blocking(move || algorithm.score_input(&input, mode))
            .await
            .map_err(|e| ScoringError::WorkerFailed(e.to_string()).for_candidate(identity.clone()))?;

        match &result {
            Ok(score) => {
                if score.breakdown.momentum.confidence.as_ref().map_or(false, |c| c.needs_review) {
                    warn!("Candidate {} scored {:.1} but needs manual review", identity, score.score);
                }
            }
            Err(e) => error!("Scoring failed for {}: {}", identity, e),
        }

        result
    }
}
