//! # varlens Risk Engine
//!
//! Turns aligned closing prices into portfolio risk figures.
//!
//! ## Pipeline
//!
//! 1. [`compute_log_returns`]: `PriceMatrix` -> `ReturnMatrix` (`ln(p[t] / p[t-1])`).
//! 2. [`aggregate`]: `ReturnMatrix` x `WeightVector` -> portfolio return series.
//! 3. [`metrics`]: historical VaR, parametric VaR, CVaR on that series, and the
//!    linear stress impact on the weights.
//!
//! Every function here is pure. [`RiskEngine`] binds one price matrix and one
//! weight vector together so callers do not have to thread the intermediate
//! series through by hand. Nothing in this crate prints or logs; errors are
//! returned to the caller as [`RiskError`].
//!
//! All results are signed return fractions: `-0.0231` is a 2.31% loss.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::aggregate;
pub use engine::RiskEngine;
pub use error::RiskError;
pub use metrics::{cvar, stress_impact, var_historical, var_parametric};
pub use returns::compute_log_returns;
