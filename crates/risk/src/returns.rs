use crate::error::RiskError;
use core_types::{PriceMatrix, ReturnMatrix};

/// Converts aligned prices into per-asset log-returns.
///
/// Each output column is one entry shorter than its price column; entry `t`
/// is `ln(price[t + 1] / price[t])` and is dated on the later observation.
pub fn compute_log_returns(prices: &PriceMatrix) -> Result<ReturnMatrix, RiskError> {
    if prices.observations() < PriceMatrix::MIN_OBSERVATIONS {
        return Err(RiskError::InsufficientData(format!(
            "{} aligned observations, at least {} are needed for one return",
            prices.observations(),
            PriceMatrix::MIN_OBSERVATIONS
        )));
    }

    let mut columns = Vec::with_capacity(prices.asset_count());
    for (symbol, column) in prices.columns() {
        if let Some(bad) = column.iter().find(|p| !p.is_finite() || **p <= 0.0) {
            return Err(RiskError::InsufficientData(format!(
                "{symbol} has a non-positive price ({bad}), log-return is undefined"
            )));
        }
        columns.push(
            column
                .windows(2)
                .map(|pair| (pair[1] / pair[0]).ln())
                .collect::<Vec<f64>>(),
        );
    }

    let dates = prices.dates()[1..].to_vec();
    Ok(ReturnMatrix::from_columns(
        prices.symbols().to_vec(),
        dates,
        columns,
    )?)
}
