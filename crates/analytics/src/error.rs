use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Invalid histogram configuration: {0}")]
    InvalidBins(String),

    #[error("Risk calculation failed: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Invalid input: {0}")]
    Input(#[from] core_types::CoreError),
}
