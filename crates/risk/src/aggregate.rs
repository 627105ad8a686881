use crate::error::RiskError;
use core_types::{ReturnMatrix, WeightVector};

/// Combines per-asset returns into one weighted portfolio return per date.
///
/// `output[t] = sum(weight[a] * return[a][t])`. The weights are used as given;
/// they are not normalised to sum to one.
pub fn aggregate(returns: &ReturnMatrix, weights: &WeightVector) -> Result<Vec<f64>, RiskError> {
    if weights.len() != returns.asset_count() {
        return Err(RiskError::DimensionMismatch {
            context: "portfolio weights".to_string(),
            expected: returns.asset_count(),
            actual: weights.len(),
        });
    }

    let series = (0..returns.observations())
        .map(|t| {
            returns
                .row(t)
                .zip(weights.as_slice())
                .map(|(r, w)| r * w)
                .sum()
        })
        .collect();

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use core_types::AssetSymbol;

    fn returns(columns: Vec<Vec<f64>>) -> ReturnMatrix {
        let n = columns[0].len();
        let symbols = (0..columns.len())
            .map(|i| AssetSymbol::new(&format!("S{i}")).unwrap())
            .collect();
        let dates = (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 2 + i as u32).unwrap())
            .collect();
        ReturnMatrix::from_columns(symbols, dates, columns).unwrap()
    }

    #[test]
    fn weighted_sum_per_date() {
        let matrix = returns(vec![vec![0.01, -0.02, 0.03], vec![0.02, 0.00, -0.01]]);
        let weights = WeightVector::new(vec![0.25, 0.75]).unwrap();

        let series = aggregate(&matrix, &weights).unwrap();

        assert_eq!(series.len(), 3);
        assert_abs_diff_eq!(series[0], 0.0175, epsilon = 1e-15);
        assert_abs_diff_eq!(series[1], -0.005, epsilon = 1e-15);
        assert_abs_diff_eq!(series[2], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn weights_are_not_normalised() {
        let matrix = returns(vec![vec![0.01, 0.02]]);
        let weights = WeightVector::new(vec![2.0]).unwrap();

        let series = aggregate(&matrix, &weights).unwrap();
        assert_abs_diff_eq!(series[0], 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(series[1], 0.04, epsilon = 1e-15);
    }

    #[test]
    fn mismatched_weight_count_is_rejected() {
        let matrix = returns(vec![vec![0.01], vec![0.02]]);
        let weights = WeightVector::new(vec![1.0]).unwrap();

        let err = aggregate(&matrix, &weights).unwrap_err();
        assert_eq!(
            err,
            RiskError::DimensionMismatch {
                context: "portfolio weights".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }
}
