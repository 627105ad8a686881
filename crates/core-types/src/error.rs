use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Price for {symbol} on {date} must be positive and finite, got {price}")]
    NonPositivePrice {
        symbol: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("Dates for {symbol} must be strictly increasing, {date} is out of order")]
    UnorderedDates { symbol: String, date: NaiveDate },

    #[error("At least {required} aligned observations are required, found {found}")]
    InsufficientData { required: usize, found: usize },

    #[error("Confidence level must lie in (0, 1), got {0}")]
    InvalidConfidence(f64),
}
