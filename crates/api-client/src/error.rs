use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API request returned an error: {0}")]
    ApiError(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from source: {0}")]
    InvalidData(String),

    #[error("No price data found for {0}")]
    NoData(String),

    #[error("Failed to read price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse price file: {0}")]
    Csv(#[from] csv::Error),

    #[error("No valid symbols found, every requested symbol failed: {0}")]
    NoValidSymbols(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::InvalidData(err.to_string())
    }
}
