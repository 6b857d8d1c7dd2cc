//! Crate-level error type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MechanicsError {
    /// Forces were requested from a potential that only tracks an energy estimate.
    #[error("cannot estimate forces from an approximated potential")]
    UnsupportedGradient,

    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f64),

    #[error("elapsed time must be finite, got {0}")]
    InvalidElapsed(f64),

    #[error("expected {expected} coordinate values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("unknown scene id '{0}'")]
    UnknownScene(String),

    #[error("invalid runner config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MechanicsError>;
