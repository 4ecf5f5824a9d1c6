pub mod ladder;
pub mod scoring;
pub mod settings;

pub use ladder::{Band, BandLadder, Ladder, Rung, Step};
pub use scoring::*;
pub use settings::{AppSettings, ConvictionThresholds, Environment, Settings};
pub use crate::scoring::weights::{StageCaps, StageWeights};
