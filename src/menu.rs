use crate::chart::distribution_chart;
use crate::format::percent;
use core_types::StressScenario;
use risk::{RiskEngine, RiskError};
use std::io::{self, BufRead, Write};

/// One entry of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    VarHistoric,
    VarParametric,
    Cvar,
    StressTesting,
    Exit,
}

/// Why a line typed at the menu prompt was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange(i64),
}

impl MenuChoice {
    pub fn parse(input: &str) -> Result<Self, ChoiceError> {
        let number: i64 = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
        match number {
            1 => Ok(MenuChoice::VarHistoric),
            2 => Ok(MenuChoice::VarParametric),
            3 => Ok(MenuChoice::Cvar),
            4 => Ok(MenuChoice::StressTesting),
            5 => Ok(MenuChoice::Exit),
            other => Err(ChoiceError::OutOfRange(other)),
        }
    }
}

/// The interactive command loop over a loaded portfolio.
pub struct Menu<'a> {
    engine: &'a RiskEngine,
    bins: usize,
    chart_confidence: f64,
}

impl<'a> Menu<'a> {
    /// `chart_confidence` places the VaR/CVaR lines on the chart drawn after
    /// every result.
    pub fn new(engine: &'a RiskEngine, bins: usize, chart_confidence: f64) -> Self {
        Self {
            engine,
            bins,
            chart_confidence,
        }
    }

    /// Runs until the user picks Exit or the input ends.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "\nWelcome to the varlens portfolio risk tool")?;

        loop {
            writeln!(out, "\nSelect an option:")?;
            writeln!(out, "1. VaR Historic")?;
            writeln!(out, "2. VaR Parametric")?;
            writeln!(out, "3. CVaR")?;
            writeln!(out, "4. Stress Testing")?;
            writeln!(out, "5. Exit")?;

            let Some(line) = prompt(&mut input, &mut out, "Enter your choice: ")? else {
                break;
            };

            let choice = match MenuChoice::parse(&line) {
                Ok(choice) => choice,
                Err(ChoiceError::NotANumber) => {
                    writeln!(out, "Invalid input. Please enter a number (1-5).")?;
                    continue;
                }
                Err(ChoiceError::OutOfRange(_)) => {
                    writeln!(out, "Invalid choice. Please select a valid option.")?;
                    continue;
                }
            };

            tracing::debug!(?choice, "Menu selection");
            match choice {
                MenuChoice::Exit => {
                    writeln!(out, "Thank you for using varlens.")?;
                    break;
                }
                MenuChoice::StressTesting => {
                    let Some(line) = prompt(
                        &mut input,
                        &mut out,
                        "Enter stress scenario (comma-separated, e.g. -0.05,-0.03,-0.02): ",
                    )?
                    else {
                        break;
                    };
                    match line.parse::<StressScenario>() {
                        Ok(scenario) => {
                            let result = self.engine.stress_impact(&scenario);
                            self.show(&mut out, "Stress Testing", result)?;
                        }
                        Err(e) => writeln!(out, "Invalid stress scenario: {e}")?,
                    }
                }
                metric => {
                    let Some(line) =
                        prompt(&mut input, &mut out, "Enter confidence level (e.g. 0.95): ")?
                    else {
                        break;
                    };
                    let Ok(confidence) = line.trim().parse::<f64>() else {
                        writeln!(out, "Invalid confidence level '{}'.", line.trim())?;
                        continue;
                    };
                    let (label, result) = match metric {
                        MenuChoice::VarHistoric => {
                            ("VaR Historic", self.engine.var_historical(confidence))
                        }
                        MenuChoice::VarParametric => {
                            ("VaR Parametric", self.engine.var_parametric(confidence))
                        }
                        _ => ("CVaR", self.engine.cvar(confidence)),
                    };
                    self.show(&mut out, label, result)?;
                }
            }
        }
        Ok(())
    }

    /// Prints a metric followed by the distribution chart, or the error.
    fn show<W: Write>(
        &self,
        out: &mut W,
        label: &str,
        result: Result<f64, RiskError>,
    ) -> io::Result<()> {
        match result {
            Ok(value) => {
                writeln!(out, "{label} = {}", percent(value))?;
                match distribution_chart(self.engine, self.bins, self.chart_confidence) {
                    Ok(chart) => write!(out, "\n{chart}")?,
                    Err(e) => tracing::warn!(error = %e, "Could not draw the distribution chart"),
                }
            }
            Err(e) => writeln!(out, "Error: {e}")?,
        }
        Ok(())
    }
}

/// Writes `message` and reads one line. Returns `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
