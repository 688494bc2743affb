use thiserror::Error;

/// Why a decision source could not produce a decision.
///
/// The simulation answers every one of these with the heuristic fallback.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecisionError {
    #[error("decision source unavailable: {0}")]
    Unavailable(String),

    #[error("decision source rate limited")]
    RateLimited,

    #[error("malformed decision: {0}")]
    Malformed(String),
}

pub type DecisionResult<T> = Result<T, DecisionError>;
