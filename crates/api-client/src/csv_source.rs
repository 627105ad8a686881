use crate::PriceSource;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{AssetSymbol, PriceSeries};
use serde::Deserialize;
use std::path::PathBuf;

/// A [`PriceSource`] reading `<dir>/<SYMBOL>.csv` files.
///
/// Each file needs a `date` column (ISO `YYYY-MM-DD`) and a `close` column,
/// spelled lowercase, capitalised or uppercase. Other columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "DATE")]
    date: NaiveDate,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: f64,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &AssetSymbol) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_closes(
        &self,
        symbol: &AssetSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        let path = self.path_for(symbol);
        let bytes = tokio::fs::read(&path).await?;

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut observations = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            if row.date >= start && row.date < end {
                observations.push((row.date, row.close));
            }
        }
        observations.sort_by_key(|(date, _)| *date);

        tracing::debug!(
            symbol = %symbol,
            path = %path.display(),
            rows = observations.len(),
            "Read CSV prices"
        );
        Ok(PriceSeries::new(symbol.clone(), observations)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[tokio::test]
    async fn reads_rows_inside_the_half_open_range() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ACME.csv"),
            "Date,Open,Close\n2024-01-03,1,12.5\n2024-01-02,1,12.0\n2024-01-04,1,13.0\n2024-01-05,1,14.0\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path());
        let series = source
            .fetch_closes(&AssetSymbol::new("ACME").unwrap(), date(1, 2), date(1, 5))
            .await
            .unwrap();

        assert_eq!(series.dates(), &[date(1, 2), date(1, 3), date(1, 4)]);
        assert_eq!(series.prices(), &[12.0, 12.5, 13.0]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvPriceSource::new(dir.path());

        let err = source
            .fetch_closes(&AssetSymbol::new("NOPE").unwrap(), date(1, 1), date(2, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[tokio::test]
    async fn non_positive_price_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BAD.csv"), "date,close\n2024-01-02,0\n").unwrap();
        let source = CsvPriceSource::new(dir.path());

        let err = source
            .fetch_closes(&AssetSymbol::new("BAD").unwrap(), date(1, 1), date(2, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidData(_)));
    }
}
