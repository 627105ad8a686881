use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::{AssetSymbol, ConfidenceLevel, StdDevConvention, WeightVector};
use serde::de::value::{F64Deserializer, I64Deserializer, StrDeserializer, U64Deserializer};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portfolio: PortfolioSettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub data_source: DataSourceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// The portfolio under analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioSettings {
    /// Symbols to load, in the order the weights refer to them (e.g., "INFY.NS").
    #[serde(deserialize_with = "one_or_many")]
    pub symbols: Vec<AssetSymbol>,
    /// First day of the price history.
    pub start_date: NaiveDate,
    /// Day after the last day of the price history (exclusive).
    pub end_date: NaiveDate,
    /// One weight per symbol. They are not required to sum to 1.
    #[serde(deserialize_with = "one_or_many")]
    pub weights: Vec<f64>,
}

/// Accepts a list or a single bare value.
///
/// An environment override such as `VARLENS__PORTFOLIO__WEIGHTS=1.0` has no
/// comma to split on and arrives as a scalar. Numeric scalars that do not
/// deserialize as `T` directly are retried as text, so a symbol like `500325`
/// still loads.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OneOrMany<T>(PhantomData<T>);

    fn single<'de, T: Deserialize<'de>, E: de::Error>(text: &str) -> Result<Vec<T>, E> {
        T::deserialize(StrDeserializer::<E>::new(text)).map(|value| vec![value])
    }

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrMany<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a value or a list of values")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(value) = seq.next_element()? {
                values.push(value);
            }
            Ok(values)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            single(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            T::deserialize(I64Deserializer::<E>::new(v))
                .map(|value| vec![value])
                .or_else(|_| single(&v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            T::deserialize(U64Deserializer::<E>::new(v))
                .map(|value| vec![value])
                .or_else(|_| single(&v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            T::deserialize(F64Deserializer::<E>::new(v))
                .map(|value| vec![value])
                .or_else(|_| single(&v.to_string()))
        }
    }

    deserializer.deserialize_any(OneOrMany(PhantomData))
}

/// Parameters for the risk calculations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// Confidence level used by the report and the chart markers (e.g., 0.95).
    pub confidence_level: f64,
    /// Standard deviation convention for parametric VaR.
    pub std_dev: StdDevConvention,
    /// Number of bins in the return distribution chart.
    pub histogram_bins: usize,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            std_dev: StdDevConvention::Sample,
            histogram_bins: 50,
        }
    }
}

/// Which market-data provider supplies closing prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Daily closes from the Yahoo Finance chart API.
    #[default]
    Yahoo,
    /// `<SYMBOL>.csv` files with `date,close` columns in a local directory.
    Csv,
}

/// Settings for the price loader.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSourceSettings {
    pub provider: Provider,
    pub base_url: String,
    pub csv_dir: PathBuf,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Yahoo,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            csv_dir: PathBuf::from("data"),
            timeout_secs: 30,
        }
    }
}

/// Settings for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "varlens.log".to_string(),
        }
    }
}

impl Config {
    /// Checks the cross-field rules serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let portfolio = &self.portfolio;

        if portfolio.symbols.is_empty() {
            return Err(ConfigError::ValidationError(
                "portfolio.symbols must contain at least one symbol".to_string(),
            ));
        }
        if portfolio.start_date >= portfolio.end_date {
            return Err(ConfigError::ValidationError(format!(
                "portfolio.start_date ({}) must be before portfolio.end_date ({})",
                portfolio.start_date, portfolio.end_date
            )));
        }
        if portfolio.weights.len() != portfolio.symbols.len() {
            return Err(ConfigError::ValidationError(format!(
                "portfolio.weights has {} entries but {} symbols were given",
                portfolio.weights.len(),
                portfolio.symbols.len()
            )));
        }
        self.portfolio.weight_vector()?;
        self.risk.confidence()?;

        if self.risk.histogram_bins == 0 {
            return Err(ConfigError::ValidationError(
                "risk.histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.data_source.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "data_source.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl PortfolioSettings {
    pub fn weight_vector(&self) -> Result<WeightVector, ConfigError> {
        WeightVector::new(self.weights.clone())
            .map_err(|e| ConfigError::ValidationError(format!("portfolio.weights: {e}")))
    }
}

impl RiskSettings {
    pub fn confidence(&self) -> Result<ConfidenceLevel, ConfigError> {
        ConfidenceLevel::new(self.confidence_level)
            .map_err(|e| ConfigError::ValidationError(format!("risk.confidence_level: {e}")))
    }
}
