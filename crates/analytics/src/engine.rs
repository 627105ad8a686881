use crate::error::AnalyticsError;
use crate::histogram::Histogram;
use crate::report::RiskReport;
use core_types::{ConfidenceLevel, StressScenario};
use risk::RiskEngine;

/// A stateless calculator that turns a `RiskEngine` into presentable results.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates every metric at `confidence`.
    ///
    /// # Arguments
    ///
    /// * `engine` - The portfolio bound to its price history.
    /// * `confidence` - Confidence level in (0, 1), e.g. 0.95.
    /// * `scenario` - Optional shock per asset for the stress impact.
    pub fn report(
        &self,
        engine: &RiskEngine,
        confidence: f64,
        scenario: Option<&StressScenario>,
    ) -> Result<RiskReport, AnalyticsError> {
        let confidence = ConfidenceLevel::new(confidence)?;
        let c = confidence.value();

        let report = RiskReport {
            symbols: engine.symbols().iter().map(|s| s.to_string()).collect(),
            weights: engine.weights().as_slice().to_vec(),
            confidence_level: c,
            observations: engine.observations(),
            mean_return: engine.mean_return()?,
            std_dev: engine.std_dev()?,
            var_historical: engine.var_historical(c)?,
            var_parametric: engine.var_parametric(c)?,
            cvar: engine.cvar(c)?,
            stress_impact: scenario.map(|s| engine.stress_impact(s)).transpose()?,
        };

        tracing::debug!(
            confidence = c,
            observations = report.observations,
            var_historical = report.var_historical,
            cvar = report.cvar,
            "Risk report calculated"
        );
        Ok(report)
    }

    /// Bins the portfolio return series for charting.
    pub fn histogram(&self, engine: &RiskEngine, bins: usize) -> Result<Histogram, AnalyticsError> {
        Histogram::from_series(engine.portfolio_returns(), bins)
    }
}
