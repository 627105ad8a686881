use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// One equal-width bucket, `[lower, upper)` except for the last, which also
/// holds `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Frequency distribution of a return series over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<Bin>,
    min: f64,
    max: f64,
    total: usize,
}

impl Histogram {
    /// Bins `series` into `bins` equal-width buckets spanning its range.
    ///
    /// A constant series has no range to split and produces one bucket
    /// holding every observation.
    pub fn from_series(series: &[f64], bins: usize) -> Result<Self, AnalyticsError> {
        if bins == 0 {
            return Err(AnalyticsError::InvalidBins(
                "at least one bin is required".to_string(),
            ));
        }
        if series.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "cannot bin an empty series".to_string(),
            ));
        }
        if series.iter().any(|r| !r.is_finite()) {
            return Err(AnalyticsError::NotEnoughData(
                "series contains non-finite values".to_string(),
            ));
        }

        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return Ok(Self {
                bins: vec![Bin {
                    lower: min,
                    upper: max,
                    count: series.len(),
                }],
                min,
                max,
                total: series.len(),
            });
        }

        let width = (max - min) / bins as f64;
        let mut buckets: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        let mut histogram = Self {
            bins: Vec::new(),
            min,
            max,
            total: series.len(),
        };
        for value in series {
            let idx = histogram.index_in(value, bins);
            buckets[idx].count += 1;
        }
        histogram.bins = buckets;

        Ok(histogram)
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of observations binned.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Count of the fullest bin.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// The bin a marker value falls into, or `None` outside `[min, max]`.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if !(value >= self.min && value <= self.max) {
            return None;
        }
        Some(self.index_in(&value, self.bins.len()))
    }

    fn index_in(&self, value: &f64, bins: usize) -> usize {
        if self.max == self.min {
            return 0;
        }
        let width = (self.max - self.min) / bins as f64;
        let idx = ((value - self.min) / width).floor() as usize;
        idx.min(bins - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_observation_once() {
        let series = [-2.0, -1.0, 0.0, 0.0, 1.0, 2.0];
        let histogram = Histogram::from_series(&series, 4).unwrap();

        let counts: Vec<usize> = histogram.bins().iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 2, 2]);
        assert_eq!(histogram.total(), 6);
        assert_eq!(histogram.max_count(), 2);
    }

    #[test]
    fn maximum_lands_in_the_last_bin() {
        let histogram = Histogram::from_series(&[0.0, 1.0], 10).unwrap();
        assert_eq!(histogram.bins()[9].count, 1);
        assert_eq!(histogram.bins()[9].upper, 1.0);
        assert_eq!(histogram.bin_index(1.0), Some(9));
    }

    #[test]
    fn constant_series_is_a_single_bin() {
        let histogram = Histogram::from_series(&[0.0; 5], 50).unwrap();
        assert_eq!(histogram.bins().len(), 1);
        assert_eq!(histogram.bins()[0].count, 5);
        assert_eq!(histogram.bin_index(0.0), Some(0));
    }

    #[test]
    fn markers_outside_the_range_have_no_bin() {
        let histogram = Histogram::from_series(&[-1.0, 1.0], 4).unwrap();
        assert_eq!(histogram.bin_index(-1.5), None);
        assert_eq!(histogram.bin_index(f64::NAN), None);
        assert_eq!(histogram.bin_index(-0.6), Some(0));
        assert_eq!(histogram.bin_index(0.1), Some(2));
    }

    #[test]
    fn zero_bins_is_rejected() {
        assert!(matches!(
            Histogram::from_series(&[0.1], 0),
            Err(AnalyticsError::InvalidBins(_))
        ));
        assert!(matches!(
            Histogram::from_series(&[], 5),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }
}
