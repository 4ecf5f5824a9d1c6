pub mod models;
pub mod config;
pub mod scoring;

pub use models::{
    Candidate, ConvictionLevel, ConvictionScore, ScoreBreakdown, ScoringError, ScoringInput, ScoringMode,
    SupplementaryAnalyses, Result,
};
pub use config::{Settings, ScoringConfig};
pub use scoring::{ScoreCalculator, ScoringAlgorithm};
