//! # varlens Analytics
//!
//! Packages the output of the risk engine for presentation.
//!
//! - `AnalyticsEngine`: evaluates every metric of a `RiskEngine` at one
//!   confidence level and returns a `RiskReport`.
//! - `RiskReport`: the serialisable bundle of those numbers.
//! - `Histogram`: equal-width bins of the portfolio return distribution, used
//!   to draw the chart with its VaR and CVaR markers.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod histogram;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use histogram::{Bin, Histogram};
pub use report::RiskReport;
