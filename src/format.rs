use analytics::RiskReport;
use comfy_table::Table;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Formats a return fraction as a percentage rounded to two decimals,
/// e.g. `-0.021209` -> `-2.12 %`.
pub fn percent(value: f64) -> String {
    match Decimal::from_f64(value * 100.0) {
        Some(pct) => format!("{:.2} %", pct.round_dp(2)),
        None => "n/a".to_string(),
    }
}

/// Renders a report as a two-column table.
pub fn report_table(report: &RiskReport) -> Table {
    let confidence = percent(report.confidence_level);
    let weights = report
        .weights
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Symbols".to_string(), report.symbols.join(", ")]);
    table.add_row(vec!["Weights".to_string(), weights]);
    table.add_row(vec!["Confidence level".to_string(), confidence]);
    table.add_row(vec![
        "Observations".to_string(),
        report.observations.to_string(),
    ]);
    table.add_row(vec!["Mean return".to_string(), percent(report.mean_return)]);
    table.add_row(vec!["Std deviation".to_string(), percent(report.std_dev)]);
    table.add_row(vec![
        "VaR Historic".to_string(),
        percent(report.var_historical),
    ]);
    table.add_row(vec![
        "VaR Parametric".to_string(),
        percent(report.var_parametric),
    ]);
    table.add_row(vec!["CVaR".to_string(), percent(report.cvar)]);
    if let Some(impact) = report.stress_impact {
        table.add_row(vec!["Stress Testing".to_string(), percent(impact)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(percent(-0.021209766768984), "-2.12 %");
        assert_eq!(percent(-0.04), "-4.00 %");
        assert_eq!(percent(0.0), "0.00 %");
        assert_eq!(percent(0.95), "95.00 %");
    }

    #[test]
    fn non_finite_values_are_not_formatted() {
        assert_eq!(percent(f64::NAN), "n/a");
    }

    #[test]
    fn stress_row_only_when_present() {
        let mut report = RiskReport {
            symbols: vec!["AAA".to_string()],
            weights: vec![1.0],
            confidence_level: 0.95,
            observations: 3,
            mean_return: 0.01,
            std_dev: 0.02,
            var_historical: -0.03,
            var_parametric: -0.02,
            cvar: -0.04,
            stress_impact: None,
        };
        assert!(!report_table(&report).to_string().contains("Stress Testing"));

        report.stress_impact = Some(-0.05);
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("Stress Testing"));
        assert!(rendered.contains("-5.00 %"));
    }
}
