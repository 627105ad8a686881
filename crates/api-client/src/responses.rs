use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use core_types::{AssetSymbol, PriceSeries};
use serde::Deserialize;

// Only the fields we read are modelled; serde ignores the rest of the payload.

/// Top-level body of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Represents an error reported inside the chart envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    /// Bar timestamps in seconds since the epoch. Absent when there are no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: String,
    /// Exchange offset from UTC in seconds, used to date each bar locally.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResult {
    /// Daily closes keyed by exchange-local date.
    ///
    /// Adjusted closes are preferred when present. Bars with a null close are
    /// dropped, and when two bars fall on the same date the later one wins.
    pub fn closes(&self) -> Result<Vec<(NaiveDate, f64)>, ApiError> {
        let closes = self
            .indicators
            .adjclose
            .first()
            .map(|a| &a.adjclose)
            .filter(|adjusted| !adjusted.is_empty())
            .or_else(|| self.indicators.quote.first().map(|q| &q.close))
            .ok_or_else(|| ApiError::InvalidData("chart has no close prices".to_string()))?;

        let mut observations: Vec<(NaiveDate, f64)> = Vec::with_capacity(closes.len());
        for (ts, close) in self.timestamp.iter().zip(closes) {
            let Some(close) = close else { continue };
            let date = DateTime::from_timestamp(ts + self.meta.gmtoffset, 0)
                .ok_or_else(|| ApiError::InvalidData(format!("invalid timestamp: {ts}")))?
                .date_naive();

            match observations.last_mut() {
                Some(last) if last.0 == date => last.1 = *close,
                _ => observations.push((date, *close)),
            }
        }
        Ok(observations)
    }

    pub fn into_series(self, symbol: &AssetSymbol) -> Result<PriceSeries, ApiError> {
        let observations = self.closes()?;
        Ok(PriceSeries::new(symbol.clone(), observations)?)
    }
}
