use crate::PriceSource;
use crate::error::ApiError;
use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{AssetSymbol, PriceSeries};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// A [`PriceSource`] backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidData(format!("invalid base url '{base_url}': {e}")))?;

        // The API rejects requests without a browser-like user agent.
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (varlens)"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn chart_url(&self, symbol: &AssetSymbol) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidData(format!("base url {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol.as_str()]);
        Ok(url)
    }
}

/// Seconds since the epoch at UTC midnight of `date`.
fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn fetch_closes(
        &self,
        symbol: &AssetSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        let url = self.chart_url(symbol)?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", epoch_seconds(start).to_string()),
                ("period2", epoch_seconds(end).to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let body: ChartResponse = serde_json::from_str(&text).map_err(|e| {
            ApiError::Deserialization(format!("{e}. Status: {status}. Original text: {text}"))
        })?;

        if let Some(error) = body.chart.error {
            return Err(ApiError::ApiError(format!("{}: {}", error.code, error.description)));
        }
        if !status.is_success() {
            return Err(ApiError::ApiError(format!("HTTP status {status}")));
        }

        let result = body
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ApiError::NoData(symbol.to_string()))?;

        tracing::debug!(
            symbol = %symbol,
            bars = result.timestamp.len(),
            "Received chart data"
        );
        result.into_series(symbol)
    }
}
