use api_client::error::ApiError;
use api_client::{PriceSource, SymbolFetch, fetch_symbol, load_prices};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{AssetSymbol, PriceSeries};
use std::collections::HashMap;

/// Serves canned histories; unknown symbols fail like a provider would.
struct StaticSource {
    histories: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl StaticSource {
    fn new(entries: &[(&str, &[(u32, f64)])]) -> Self {
        let histories = entries
            .iter()
            .map(|(symbol, rows)| {
                let rows: Vec<(NaiveDate, f64)> = rows.iter().map(|&(d, p)| (day(d), p)).collect();
                (symbol.to_string(), rows)
            })
            .collect();
        Self { histories }
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    async fn fetch_closes(
        &self,
        symbol: &AssetSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        let rows = self
            .histories
            .get(symbol.as_str())
            .ok_or_else(|| ApiError::ApiError(format!("unknown symbol {symbol}")))?;
        let rows: Vec<(NaiveDate, f64)> = rows
            .iter()
            .copied()
            .filter(|(date, _)| *date >= start && *date < end)
            .collect();
        Ok(PriceSeries::new(symbol.clone(), rows)?)
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn symbols(names: &[&str]) -> Vec<AssetSymbol> {
    names.iter().map(|n| AssetSymbol::new(n).unwrap()).collect()
}

#[tokio::test]
async fn failed_and_empty_symbols_are_skipped() {
    let source = StaticSource::new(&[
        ("AAA", &[(1, 10.0), (2, 11.0), (5, 12.0)]),
        ("EMPTY", &[]),
        ("BBB", &[(1, 20.0), (2, 21.0), (3, 22.0), (5, 23.0)]),
    ]);

    let prices = load_prices(&source, &symbols(&["AAA", "MISSING", "EMPTY", "BBB"]), day(1), day(10))
        .await
        .unwrap();

    let loaded: Vec<&str> = prices.symbols().iter().map(|s| s.as_str()).collect();
    assert_eq!(loaded, vec!["AAA", "BBB"]);

    let skipped: Vec<&str> = prices.skipped.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(skipped, vec!["MISSING", "EMPTY"]);
    assert_eq!(prices.skipped[1].reason, "no data found");

    let matrix = prices.into_matrix().unwrap();
    assert_eq!(matrix.dates(), &[day(1), day(2), day(5)]);
    assert_eq!(matrix.column(1).unwrap(), &[20.0, 21.0, 23.0]);
}

#[tokio::test]
async fn no_valid_symbols_aborts_the_batch() {
    let source = StaticSource::new(&[("EMPTY", &[])]);

    let err = load_prices(&source, &symbols(&["EMPTY", "GONE"]), day(1), day(10))
        .await
        .unwrap_err();

    match err {
        ApiError::NoValidSymbols(requested) => assert_eq!(requested, "EMPTY, GONE"),
        other => panic!("expected NoValidSymbols, got {other:?}"),
    }
}

#[tokio::test]
async fn repeated_symbols_are_loaded_once() {
    let source = StaticSource::new(&[("AAA", &[(1, 10.0), (2, 11.0)])]);

    let prices = load_prices(&source, &symbols(&["AAA", "AAA"]), day(1), day(10))
        .await
        .unwrap();

    assert_eq!(prices.loaded.len(), 1);
    assert_eq!(prices.skipped.len(), 1);
}

#[tokio::test]
async fn end_date_is_exclusive() {
    let source = StaticSource::new(&[("AAA", &[(1, 10.0), (2, 11.0), (3, 12.0)])]);

    let fetch = fetch_symbol(&source, &AssetSymbol::new("AAA").unwrap(), day(1), day(3)).await;
    match fetch {
        SymbolFetch::Loaded(series) => assert_eq!(series.dates(), &[day(1), day(2)]),
        SymbolFetch::Skipped(skip) => panic!("unexpected skip: {}", skip.reason),
    }
}
