//! # varlens Price Loader
//!
//! Supplies daily closing prices for a list of symbols. A provider implements
//! [`PriceSource`]; [`load_prices`] drives it over a whole portfolio, skipping
//! symbols without data instead of failing the batch.

use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{AssetSymbol, PriceSeries};

pub mod csv_source;
pub mod error;
pub mod loader;
pub mod responses;
pub mod yahoo;

// --- Public API ---
pub use csv_source::CsvPriceSource;
pub use loader::{LoadedPrices, SkippedSymbol, SymbolFetch, fetch_symbol, load_prices};
pub use yahoo::YahooClient;

/// The generic, abstract interface for a source of historical prices.
/// The loader only talks to this trait, so providers (live or mock) can be
/// swapped out.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches the daily closes of `symbol` from `start` (inclusive) to
    /// `end` (exclusive).
    async fn fetch_closes(
        &self,
        symbol: &AssetSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError>;
}
