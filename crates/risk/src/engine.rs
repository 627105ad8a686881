use crate::aggregate::aggregate;
use crate::error::RiskError;
use crate::metrics;
use crate::returns::compute_log_returns;
use core_types::{AssetSymbol, PriceMatrix, StdDevConvention, StressScenario, WeightVector};

/// A portfolio bound to its price history.
///
/// The weighted portfolio log-return series is derived once in
/// [`RiskEngine::new`]; the inputs never change afterwards, so every metric is
/// a pure function of the same cached series.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    prices: PriceMatrix,
    weights: WeightVector,
    convention: StdDevConvention,
    portfolio_returns: Vec<f64>,
}

impl RiskEngine {
    /// Creates an engine for `prices` held with `weights`.
    ///
    /// Fails with [`RiskError::DimensionMismatch`] when the weight count differs
    /// from the number of loaded assets, before any metric is computed.
    pub fn new(
        prices: PriceMatrix,
        weights: WeightVector,
        convention: StdDevConvention,
    ) -> Result<Self, RiskError> {
        if weights.len() != prices.asset_count() {
            return Err(RiskError::DimensionMismatch {
                context: "portfolio weights".to_string(),
                expected: prices.asset_count(),
                actual: weights.len(),
            });
        }

        let returns = compute_log_returns(&prices)?;
        let portfolio_returns = aggregate(&returns, &weights)?;

        Ok(Self {
            prices,
            weights,
            convention,
            portfolio_returns,
        })
    }

    pub fn symbols(&self) -> &[AssetSymbol] {
        self.prices.symbols()
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// The weighted portfolio log-return for every return date.
    pub fn portfolio_returns(&self) -> &[f64] {
        &self.portfolio_returns
    }

    /// Number of portfolio return observations.
    pub fn observations(&self) -> usize {
        self.portfolio_returns.len()
    }

    pub fn mean_return(&self) -> Result<f64, RiskError> {
        metrics::mean(&self.portfolio_returns)
    }

    pub fn std_dev(&self) -> Result<f64, RiskError> {
        metrics::std_dev(&self.portfolio_returns, self.convention)
    }

    pub fn var_historical(&self, confidence: f64) -> Result<f64, RiskError> {
        metrics::var_historical(&self.portfolio_returns, confidence)
    }

    pub fn var_parametric(&self, confidence: f64) -> Result<f64, RiskError> {
        metrics::var_parametric(&self.portfolio_returns, confidence, self.convention)
    }

    pub fn cvar(&self, confidence: f64) -> Result<f64, RiskError> {
        metrics::cvar(&self.portfolio_returns, confidence)
    }

    /// Applies `scenario` to the weights. Independent of the price history.
    pub fn stress_impact(&self, scenario: &StressScenario) -> Result<f64, RiskError> {
        metrics::stress_impact(&self.weights, scenario)
    }
}
