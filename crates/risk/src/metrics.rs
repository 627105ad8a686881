use crate::error::RiskError;
use core_types::{ConfidenceLevel, StdDevConvention, StressScenario, WeightVector};
use statrs::distribution::{ContinuousCDF, Normal};

/// Historical Value-at-Risk: the empirical `(1 - confidence) * 100` percentile.
///
/// Percentiles are linearly interpolated between the two closest ranks of the
/// sorted series. The result is a signed return, so a loss is negative.
/// Short series still produce a value, interpolated between one or two points.
pub fn var_historical(series: &[f64], confidence: f64) -> Result<f64, RiskError> {
    let confidence = ConfidenceLevel::new(confidence)?;
    let sorted = sorted_copy(series)?;

    Ok(percentile(&sorted, confidence.tail_probability() * 100.0))
}

/// Parametric (normal) Value-at-Risk: `mean - std * z`, with `z = Φ⁻¹(confidence)`.
pub fn var_parametric(
    series: &[f64],
    confidence: f64,
    convention: StdDevConvention,
) -> Result<f64, RiskError> {
    let confidence = ConfidenceLevel::new(confidence)?;
    let mu = mean(series)?;
    let sigma = std_dev(series, convention)?;

    Ok(mu - sigma * normal_quantile(confidence.value())?)
}

/// Conditional VaR (expected shortfall): the mean of every observation at or
/// below the historical VaR cutoff.
pub fn cvar(series: &[f64], confidence: f64) -> Result<f64, RiskError> {
    let cutoff = var_historical(series, confidence)?;

    let (sum, count) = series
        .iter()
        .filter(|r| **r <= cutoff)
        .fold((0.0, 0usize), |(sum, count), r| (sum + r, count + 1));

    if count == 0 {
        return Err(RiskError::EmptyTail { cutoff });
    }
    Ok(sum / count as f64)
}

/// Portfolio impact of a shock per asset: `sum(weight[a] * shock[a])`.
pub fn stress_impact(weights: &WeightVector, scenario: &StressScenario) -> Result<f64, RiskError> {
    if scenario.len() != weights.len() {
        return Err(RiskError::DimensionMismatch {
            context: "stress scenario".to_string(),
            expected: weights.len(),
            actual: scenario.len(),
        });
    }

    Ok(weights
        .as_slice()
        .iter()
        .zip(scenario.as_slice())
        .map(|(w, s)| w * s)
        .sum())
}

/// Arithmetic mean of a non-empty, finite series.
pub fn mean(series: &[f64]) -> Result<f64, RiskError> {
    check_series(series)?;
    Ok(series.iter().sum::<f64>() / series.len() as f64)
}

/// Standard deviation under the given degrees-of-freedom convention.
pub fn std_dev(series: &[f64], convention: StdDevConvention) -> Result<f64, RiskError> {
    let mu = mean(series)?;
    let ddof = convention.ddof();
    if series.len() <= ddof {
        return Err(RiskError::InsufficientData(format!(
            "{:?} standard deviation needs more than {ddof} observations, got {}",
            convention,
            series.len()
        )));
    }

    let sum_sq: f64 = series.iter().map(|r| (r - mu) * (r - mu)).sum();
    Ok((sum_sq / (series.len() - ddof) as f64).sqrt())
}

/// Linear-interpolation percentile of a non-empty ascending slice, `rank` in
/// `[0, 100]`. Callers go through `sorted_copy` and `ConfidenceLevel` first.
///
/// With `h = (n - 1) * rank / 100`, the result is
/// `x[⌊h⌋] + (h - ⌊h⌋) * (x[⌊h⌋ + 1] - x[⌊h⌋])`.
fn percentile(sorted: &[f64], rank: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=100.0).contains(&rank));
    let last = sorted.len() - 1;
    let h = last as f64 * (rank / 100.0);
    let lower = h.floor() as usize;
    if lower >= last {
        return sorted[last];
    }
    let fraction = h - lower as f64;
    sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower])
}

fn normal_quantile(p: f64) -> Result<f64, RiskError> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| {
        RiskError::InvalidParameter(format!("failed to construct standard normal: {e}"))
    })?;
    Ok(normal.inverse_cdf(p))
}

fn sorted_copy(series: &[f64]) -> Result<Vec<f64>, RiskError> {
    check_series(series)?;
    let mut sorted = series.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn check_series(series: &[f64]) -> Result<(), RiskError> {
    if series.is_empty() {
        return Err(RiskError::InsufficientData(
            "the portfolio return series is empty".to_string(),
        ));
    }
    if let Some(bad) = series.iter().find(|r| !r.is_finite()) {
        return Err(RiskError::InvalidParameter(format!(
            "return series contains a non-finite value ({bad})"
        )));
    }
    Ok(())
}
