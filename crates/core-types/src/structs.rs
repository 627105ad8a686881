use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An opaque identifier for a tradable instrument (e.g. "INFY.NS").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Creates a symbol from user-supplied text.
    ///
    /// Surrounding whitespace and quote characters are stripped, so `" 'AAPL' "`
    /// and `AAPL` name the same asset.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let cleaned: String = raw.trim().replace(['\'', '"'], "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                format!("'{raw}' is empty after trimming"),
            ));
        }
        Ok(Self(cleaned.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetSymbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AssetSymbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<AssetSymbol> for String {
    fn from(value: AssetSymbol) -> Self {
        value.0
    }
}

/// Closing prices of a single asset, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: AssetSymbol,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Builds a series from `(date, price)` observations.
    ///
    /// The observations must already be sorted with strictly increasing dates,
    /// and every price must be positive and finite.
    pub fn new(
        symbol: AssetSymbol,
        observations: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, CoreError> {
        let mut dates = Vec::with_capacity(observations.len());
        let mut prices = Vec::with_capacity(observations.len());

        for (date, price) in observations {
            if !price.is_finite() || price <= 0.0 {
                return Err(CoreError::NonPositivePrice {
                    symbol: symbol.to_string(),
                    date,
                    price,
                });
            }
            if dates.last().is_some_and(|prev| *prev >= date) {
                return Err(CoreError::UnorderedDates {
                    symbol: symbol.to_string(),
                    date,
                });
            }
            dates.push(date);
            prices.push(price);
        }

        Ok(Self {
            symbol,
            dates,
            prices,
        })
    }

    pub fn symbol(&self) -> &AssetSymbol {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Looks up the price observed on `date`, if any.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.prices[idx])
    }
}

/// Price series of several assets aligned to one shared set of dates.
///
/// Alignment is an inner join: a date survives only if every asset has a
/// price on it. The asset order is the order in which the series were given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMatrix {
    symbols: Vec<AssetSymbol>,
    dates: Vec<NaiveDate>,
    // One column per asset, each `dates.len()` long.
    prices: Vec<Vec<f64>>,
}

impl PriceMatrix {
    /// Minimum number of aligned observations needed to compute one return.
    pub const MIN_OBSERVATIONS: usize = 2;

    /// Aligns the given series on their common dates.
    pub fn align(series: Vec<PriceSeries>) -> Result<Self, CoreError> {
        if series.is_empty() {
            return Err(CoreError::InvalidInput(
                "series".to_string(),
                "at least one price series is required".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for s in &series {
            if !seen.insert(s.symbol()) {
                return Err(CoreError::InvalidInput(
                    "series".to_string(),
                    format!("symbol {} appears more than once", s.symbol()),
                ));
            }
        }

        let mut common: BTreeSet<NaiveDate> = series[0].dates().iter().copied().collect();
        for s in &series[1..] {
            let dates: BTreeSet<NaiveDate> = s.dates().iter().copied().collect();
            common = common.intersection(&dates).copied().collect();
        }

        if common.len() < Self::MIN_OBSERVATIONS {
            return Err(CoreError::InsufficientData {
                required: Self::MIN_OBSERVATIONS,
                found: common.len(),
            });
        }

        let dates: Vec<NaiveDate> = common.into_iter().collect();
        let mut symbols = Vec::with_capacity(series.len());
        let mut prices = Vec::with_capacity(series.len());

        for s in series {
            // Every common date exists in every series by construction.
            let column = dates
                .iter()
                .filter_map(|date| s.price_on(*date))
                .collect::<Vec<f64>>();
            symbols.push(s.symbol);
            prices.push(column);
        }

        Ok(Self {
            symbols,
            dates,
            prices,
        })
    }

    pub fn symbols(&self) -> &[AssetSymbol] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn asset_count(&self) -> usize {
        self.symbols.len()
    }

    /// Number of aligned dates.
    pub fn observations(&self) -> usize {
        self.dates.len()
    }

    /// Prices of the asset at position `index`, in date order.
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.prices.get(index).map(Vec::as_slice)
    }

    /// Iterates over `(symbol, prices)` pairs in asset order.
    pub fn columns(&self) -> impl Iterator<Item = (&AssetSymbol, &[f64])> {
        self.symbols
            .iter()
            .zip(self.prices.iter().map(Vec::as_slice))
    }
}

/// Per-asset log-returns derived from a [`PriceMatrix`].
///
/// `dates[t]` is the later date of the price pair that produced `returns[_][t]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnMatrix {
    symbols: Vec<AssetSymbol>,
    dates: Vec<NaiveDate>,
    returns: Vec<Vec<f64>>,
}

impl ReturnMatrix {
    /// Assembles a return matrix, checking that every column matches `dates`.
    pub fn from_columns(
        symbols: Vec<AssetSymbol>,
        dates: Vec<NaiveDate>,
        returns: Vec<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        if symbols.len() != returns.len() {
            return Err(CoreError::InvalidInput(
                "returns".to_string(),
                format!(
                    "{} symbols but {} return columns",
                    symbols.len(),
                    returns.len()
                ),
            ));
        }
        if let Some((symbol, column)) = symbols
            .iter()
            .zip(&returns)
            .find(|(_, column)| column.len() != dates.len())
        {
            return Err(CoreError::InvalidInput(
                "returns".to_string(),
                format!(
                    "column {symbol} has {} entries for {} dates",
                    column.len(),
                    dates.len()
                ),
            ));
        }
        Ok(Self {
            symbols,
            dates,
            returns,
        })
    }

    pub fn symbols(&self) -> &[AssetSymbol] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn asset_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn observations(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.returns.get(index).map(Vec::as_slice)
    }

    /// The returns of every asset on observation `t`, in asset order.
    pub fn row(&self, t: usize) -> impl Iterator<Item = f64> + '_ {
        self.returns.iter().map(move |column| column[t])
    }
}

/// Portfolio weights, one per asset, in the asset order of the price matrix.
///
/// Weights are not required to sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(weights: Vec<f64>) -> Result<Self, CoreError> {
        validate_finite("weights", &weights)?;
        Ok(Self(weights))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = CoreError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeightVector> for Vec<f64> {
    fn from(value: WeightVector) -> Self {
        value.0
    }
}

/// A hypothetical shock per asset, e.g. `[-0.05, -0.03]` for -5% and -3%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct StressScenario(Vec<f64>);

impl StressScenario {
    pub fn new(shocks: Vec<f64>) -> Result<Self, CoreError> {
        validate_finite("stress scenario", &shocks)?;
        Ok(Self(shocks))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for StressScenario {
    type Err = CoreError;

    /// Parses comma-separated shocks such as `-0.05, -0.03,-0.02`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let shocks = parse_list("stress scenario", s)?;
        Self::new(shocks)
    }
}

impl TryFrom<Vec<f64>> for StressScenario {
    type Error = CoreError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StressScenario> for Vec<f64> {
    fn from(value: StressScenario) -> Self {
        value.0
    }
}

/// A confidence level strictly between 0 and 1 (0.95 means "95% confidence").
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    pub fn new(value: f64) -> Result<Self, CoreError> {
        // NaN fails both comparisons.
        if value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidConfidence(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Probability mass of the loss tail, `1 - confidence`.
    pub fn tail_probability(&self) -> f64 {
        1.0 - self.0
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(value: ConfidenceLevel) -> Self {
        value.0
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_finite(field: &str, values: &[f64]) -> Result<(), CoreError> {
    if values.is_empty() {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            "at least one value is required".to_string(),
        ));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            format!("{bad} is not a finite number"),
        ));
    }
    Ok(())
}

/// Parses a comma-separated list of numbers, tolerating whitespace.
pub fn parse_list(field: &str, input: &str) -> Result<Vec<f64>, CoreError> {
    input
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>().map_err(|e| {
                CoreError::InvalidInput(field.to_string(), format!("'{part}': {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(symbol: &str, obs: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::new(
            AssetSymbol::new(symbol).unwrap(),
            obs.iter().map(|&(d, p)| (day(d), p)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn symbol_strips_quotes_and_whitespace() {
        let symbol = AssetSymbol::new("  'INFY.NS' ").unwrap();
        assert_eq!(symbol.as_str(), "INFY.NS");
        assert_eq!(AssetSymbol::new("\"AAPL\"").unwrap().as_str(), "AAPL");
        assert!(AssetSymbol::new(" '' ").is_err());
    }

    #[test]
    fn price_series_rejects_non_positive_prices() {
        let err = PriceSeries::new(
            AssetSymbol::new("X").unwrap(),
            vec![(day(1), 10.0), (day(2), 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NonPositivePrice { price, .. } if price == 0.0));
    }

    #[test]
    fn price_series_rejects_duplicate_dates() {
        let err = PriceSeries::new(
            AssetSymbol::new("X").unwrap(),
            vec![(day(1), 10.0), (day(1), 11.0)],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnorderedDates { .. }));
    }

    #[test]
    fn align_keeps_only_common_dates() {
        let a = series("A", &[(1, 10.0), (2, 11.0), (3, 12.0), (5, 13.0)]);
        let b = series("B", &[(2, 20.0), (3, 21.0), (4, 22.0), (5, 23.0)]);

        let matrix = PriceMatrix::align(vec![a, b]).unwrap();

        assert_eq!(matrix.dates(), &[day(2), day(3), day(5)]);
        assert_eq!(matrix.column(0).unwrap(), &[11.0, 12.0, 13.0]);
        assert_eq!(matrix.column(1).unwrap(), &[20.0, 21.0, 23.0]);
        assert_eq!(matrix.symbols()[1].as_str(), "B");
    }

    #[test]
    fn align_requires_two_common_dates() {
        let a = series("A", &[(1, 10.0), (2, 11.0)]);
        let b = series("B", &[(2, 20.0), (3, 21.0)]);

        let err = PriceMatrix::align(vec![a, b]).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientData {
                required: 2,
                found: 1
            }
        );
    }

    #[test]
    fn align_rejects_duplicate_symbols() {
        let a = series("A", &[(1, 10.0), (2, 11.0)]);
        let b = series("A", &[(1, 10.0), (2, 11.0)]);
        assert!(matches!(
            PriceMatrix::align(vec![a, b]),
            Err(CoreError::InvalidInput(..))
        ));
    }

    #[test]
    fn confidence_level_is_open_interval() {
        assert!(ConfidenceLevel::new(0.95).is_ok());
        assert!(ConfidenceLevel::new(0.0).is_err());
        assert!(ConfidenceLevel::new(1.0).is_err());
        assert!(ConfidenceLevel::new(1.5).is_err());
        assert!(ConfidenceLevel::new(f64::NAN).is_err());
    }

    #[test]
    fn stress_scenario_parses_comma_separated_text() {
        let scenario: StressScenario = "-0.05, -0.03,-0.02".parse().unwrap();
        assert_eq!(scenario.as_slice(), &[-0.05, -0.03, -0.02]);
        assert!("-0.05, abc".parse::<StressScenario>().is_err());
    }

    #[test]
    fn weights_sum_is_not_normalised() {
        let weights = WeightVector::new(vec![0.6, 0.6]).unwrap();
        assert_abs_diff_eq!(weights.sum(), 1.2, epsilon = 1e-12);
        assert!(WeightVector::new(vec![]).is_err());
        assert!(WeightVector::new(vec![f64::INFINITY]).is_err());
    }
}
