use thiserror::Error;

/// Inputs the models refuse to compute with
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("monthly solar series must hold 12 non-negative values (got {len})")]
    MalformedSeries { len: usize },
}
