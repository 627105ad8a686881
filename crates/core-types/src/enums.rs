use serde::{Deserialize, Serialize};

/// Degrees-of-freedom convention used for the standard deviation of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdDevConvention {
    /// ddof = 1, divides by `n - 1`.
    #[default]
    Sample,
    /// ddof = 0, divides by `n`.
    Population,
}

impl StdDevConvention {
    /// Returns the delta degrees of freedom subtracted from the sample size.
    pub fn ddof(&self) -> usize {
        match self {
            StdDevConvention::Sample => 1,
            StdDevConvention::Population => 0,
        }
    }
}
