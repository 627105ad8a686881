use analytics::{AnalyticsEngine, AnalyticsError, Histogram};
use risk::RiskEngine;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

/// A labelled vertical line drawn on the distribution chart.
#[derive(Debug, Clone)]
pub struct Marker {
    pub label: String,
    pub value: f64,
}

/// Draws the portfolio return distribution with VaR and CVaR markers at
/// `confidence`.
pub fn distribution_chart(
    engine: &RiskEngine,
    bins: usize,
    confidence: f64,
) -> Result<String, AnalyticsError> {
    let histogram = AnalyticsEngine::new().histogram(engine, bins)?;
    let markers = [
        Marker {
            label: format!("VaR ({})", confidence_label(confidence)),
            value: engine.var_historical(confidence)?,
        },
        Marker {
            label: format!("CVaR ({})", confidence_label(confidence)),
            value: engine.cvar(confidence)?,
        },
    ];
    Ok(render(&histogram, &markers))
}

/// `0.95` -> `95%`, `0.975` -> `97.5%`.
fn confidence_label(confidence: f64) -> String {
    let pct = format!("{:.2}", confidence * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{pct}%")
}

/// Renders one row per bin: its range, a bar scaled to the fullest bin, the
/// count, and the labels of any markers that fall inside it.
pub fn render(histogram: &Histogram, markers: &[Marker]) -> String {
    let mut out = String::from("Portfolio Return Distribution\n");
    let max_count = histogram.max_count().max(1);

    for (idx, bin) in histogram.bins().iter().enumerate() {
        let len = (bin.count * BAR_WIDTH).div_ceil(max_count);
        let labels = markers
            .iter()
            .filter(|m| histogram.bin_index(m.value) == Some(idx))
            .map(|m| format!("{} = {:.4}", m.label, m.value))
            .collect::<Vec<_>>();

        let _ = write!(
            out,
            "{:>9.4} .. {:>9.4} | {:<width$} {:>4}",
            bin.lower,
            bin.upper,
            "#".repeat(len),
            bin.count,
            width = BAR_WIDTH
        );
        if !labels.is_empty() {
            let _ = write!(out, "  <-- {}", labels.join(", "));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_attached_to_their_bins() {
        let histogram = Histogram::from_series(&[-2.0, -1.0, 0.0, 0.0, 1.0, 2.0], 4).unwrap();
        let markers = [Marker {
            label: "VaR (95%)".to_string(),
            value: -1.8,
        }];

        let chart = render(&histogram, &markers);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "Portfolio Return Distribution");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("<-- VaR (95%) = -1.8000"));
        assert!(!lines[2].contains("<--"));
    }

    #[test]
    fn confidence_labels_have_no_float_noise() {
        assert_eq!(confidence_label(0.07), "7%");
        assert_eq!(confidence_label(0.1), "10%");
        assert_eq!(confidence_label(0.95), "95%");
        assert_eq!(confidence_label(0.975), "97.5%");
    }

    #[test]
    fn fullest_bin_gets_the_full_bar() {
        let histogram = Histogram::from_series(&[0.0, 1.0, 1.0], 2).unwrap();
        let chart = render(&histogram, &[]);

        assert!(chart.contains(&"#".repeat(BAR_WIDTH)));
        assert!(chart.contains(&format!("| {:<w$}", "#".repeat(BAR_WIDTH / 2), w = BAR_WIDTH)));
    }
}
