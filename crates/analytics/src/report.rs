use serde::{Deserialize, Serialize};

/// Every risk figure of a portfolio at one confidence level.
///
/// All values are return fractions (`-0.0231` is a 2.31% loss); converting to
/// percentages is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
    pub confidence_level: f64,
    /// Number of portfolio returns the figures are based on.
    pub observations: usize,
    pub mean_return: f64,
    pub std_dev: f64,
    pub var_historical: f64,
    pub var_parametric: f64,
    pub cvar: f64,
    /// Present only when a stress scenario was supplied.
    pub stress_impact: Option<f64>,
}
