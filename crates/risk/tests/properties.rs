use core_types::{StressScenario, WeightVector};
use proptest::prelude::*;
use risk::{cvar, stress_impact, var_historical};

const TOLERANCE: f64 = 1e-12;

fn return_series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.2f64..0.2f64, 1..250)
}

fn confidence() -> impl Strategy<Value = f64> {
    0.01f64..0.99f64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn historical_var_is_non_increasing_in_confidence(
        series in return_series(),
        a in confidence(),
        b in confidence(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let var_low = var_historical(&series, low).unwrap();
        let var_high = var_historical(&series, high).unwrap();
        prop_assert!(
            var_high <= var_low + TOLERANCE,
            "VaR({}) = {} exceeds VaR({}) = {}", high, var_high, low, var_low
        );
    }

    #[test]
    fn cvar_is_at_least_as_extreme_as_var(
        series in return_series(),
        c in confidence(),
    ) {
        let var = var_historical(&series, c).unwrap();
        let shortfall = cvar(&series, c).unwrap();
        prop_assert!(shortfall <= var + TOLERANCE);
    }

    #[test]
    fn historical_var_stays_within_the_observed_range(
        series in return_series(),
        c in confidence(),
    ) {
        let var = var_historical(&series, c).unwrap();
        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(var >= min - TOLERANCE && var <= max + TOLERANCE);
    }

    #[test]
    fn stress_impact_is_linear_in_the_scenario(
        (weights, first, second) in (1usize..10).prop_flat_map(|n| (
            prop::collection::vec(-1.0f64..1.0, n),
            prop::collection::vec(-0.5f64..0.5, n),
            prop::collection::vec(-0.5f64..0.5, n),
        )),
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
    ) {
        let weights = WeightVector::new(weights).unwrap();
        let combined: Vec<f64> = first
            .iter()
            .zip(&second)
            .map(|(x, y)| a * x + b * y)
            .collect();

        let lhs = stress_impact(&weights, &StressScenario::new(combined).unwrap()).unwrap();
        let rhs = a * stress_impact(&weights, &StressScenario::new(first).unwrap()).unwrap()
            + b * stress_impact(&weights, &StressScenario::new(second).unwrap()).unwrap();

        prop_assert!((lhs - rhs).abs() <= 1e-9, "{} != {}", lhs, rhs);
    }
}
