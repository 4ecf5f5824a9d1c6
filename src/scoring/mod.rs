pub mod algorithm;
pub mod calculator;
pub mod confidence;
pub mod cross_platform;
pub mod momentum;
pub mod platform;
pub mod safety;
pub mod weights;

pub use algorithm::ScoringAlgorithm;
pub use calculator::ScoreCalculator;
pub use confidence::ConfidenceAssessor;
pub use cross_platform::CrossPlatformScorer;
pub use momentum::{Horizon, MomentumAnalyzer};
pub use platform::PlatformScorer;
pub use safety::SafetyValidator;
pub use weights::{StageCaps, StageWeights};
