use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Stage {stage} produced a non-finite value")]
    NonFiniteStage { stage: &'static str },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Scoring failed for candidate {candidate}: {source}")]
    Candidate {
        candidate: String,
        #[source]
        source: Box<ScoringError>,
    },

    #[error("Scoring worker failed: {0}")]
    WorkerFailed(String),
}

impl ScoringError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attach the candidate identity so failures stay traceable upstream.
    pub fn for_candidate(self, candidate: impl Into<String>) -> Self {
        match self {
            already @ ScoringError::Candidate { .. } => already,
            other => ScoringError::Candidate {
                candidate: candidate.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping candidate annotations.
    pub fn root(&self) -> &ScoringError {
        match self {
            ScoringError::Candidate { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
