use crate::PriceSource;
use crate::error::ApiError;
use chrono::NaiveDate;
use core_types::{AssetSymbol, CoreError, PriceMatrix, PriceSeries};

/// The outcome of fetching one symbol.
#[derive(Debug, Clone)]
pub enum SymbolFetch {
    Loaded(PriceSeries),
    Skipped(SkippedSymbol),
}

/// A symbol left out of the batch, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: AssetSymbol,
    pub reason: String,
}

/// The symbols that yielded data, in request order, plus the ones that did not.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub loaded: Vec<PriceSeries>,
    pub skipped: Vec<SkippedSymbol>,
}

impl LoadedPrices {
    /// Aggregates per-symbol outcomes. Fails only when nothing was loaded.
    pub fn from_fetches(fetches: Vec<SymbolFetch>) -> Result<Self, ApiError> {
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();
        for fetch in fetches {
            match fetch {
                SymbolFetch::Loaded(series) => loaded.push(series),
                SymbolFetch::Skipped(skip) => skipped.push(skip),
            }
        }

        if loaded.is_empty() {
            let requested = skipped
                .iter()
                .map(|s| s.symbol.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ApiError::NoValidSymbols(requested));
        }
        Ok(Self { loaded, skipped })
    }

    pub fn symbols(&self) -> Vec<&AssetSymbol> {
        self.loaded.iter().map(PriceSeries::symbol).collect()
    }

    /// Aligns the loaded series on their common dates.
    pub fn into_matrix(self) -> Result<PriceMatrix, CoreError> {
        PriceMatrix::align(self.loaded)
    }
}

/// Fetches one symbol, turning every failure (including an empty history)
/// into [`SymbolFetch::Skipped`].
pub async fn fetch_symbol<S: PriceSource + ?Sized>(
    source: &S,
    symbol: &AssetSymbol,
    start: NaiveDate,
    end: NaiveDate,
) -> SymbolFetch {
    let reason = match source.fetch_closes(symbol, start, end).await {
        Ok(series) if !series.is_empty() => return SymbolFetch::Loaded(series),
        Ok(_) => "no data found".to_string(),
        Err(e) => e.to_string(),
    };

    tracing::warn!(symbol = %symbol, %reason, "Skipping symbol");
    SymbolFetch::Skipped(SkippedSymbol {
        symbol: symbol.clone(),
        reason,
    })
}

/// Loads closing prices for every symbol in `[start, end)`, one after another.
///
/// Symbols that fail or return no rows are skipped; repeated symbols are
/// skipped after their first occurrence. Returns [`ApiError::NoValidSymbols`]
/// when no symbol produced data.
pub async fn load_prices<S: PriceSource + ?Sized>(
    source: &S,
    symbols: &[AssetSymbol],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LoadedPrices, ApiError> {
    let mut fetches = Vec::with_capacity(symbols.len());

    for (idx, symbol) in symbols.iter().enumerate() {
        if symbols[..idx].contains(symbol) {
            tracing::warn!(symbol = %symbol, "Skipping repeated symbol");
            fetches.push(SymbolFetch::Skipped(SkippedSymbol {
                symbol: symbol.clone(),
                reason: "symbol requested more than once".to_string(),
            }));
            continue;
        }
        fetches.push(fetch_symbol(source, symbol, start, end).await);
    }

    let prices = LoadedPrices::from_fetches(fetches)?;
    tracing::info!(
        loaded = prices.loaded.len(),
        skipped = prices.skipped.len(),
        %start,
        %end,
        "Price history loaded"
    );
    Ok(prices)
}
