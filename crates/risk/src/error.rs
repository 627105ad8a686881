use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Dimension mismatch in {context}: expected {expected} values, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No observations at or below the VaR cutoff ({cutoff})")]
    EmptyTail { cutoff: f64 },
}

impl From<CoreError> for RiskError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientData { .. } | CoreError::NonPositivePrice { .. } => {
                RiskError::InsufficientData(err.to_string())
            }
            CoreError::InvalidConfidence(_)
            | CoreError::InvalidInput(..)
            | CoreError::UnorderedDates { .. } => RiskError::InvalidParameter(err.to_string()),
        }
    }
}
