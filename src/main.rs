use analytics::AnalyticsEngine;
use anyhow::{Context, Result, bail};
use api_client::{CsvPriceSource, PriceSource, YahooClient, load_prices};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::{Config, Provider, init_tracing, load_config};
use core_types::{AssetSymbol, StressScenario};
use indicatif::{ProgressBar, ProgressStyle};
use risk::RiskEngine;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

mod chart;
mod format;
mod menu;

use menu::Menu;

/// The main entry point for the varlens risk tool.
#[tokio::main]
async fn main() {
    // A .env file is optional; it may carry RUST_LOG or VARLENS__* overrides.
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Portfolio risk analysis: historical and parametric VaR, CVaR and stress tests.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(flatten)]
    overrides: PortfolioOverrides,

    /// Defaults to the interactive menu.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Command-line values that replace the ones from the configuration file.
#[derive(Args)]
struct PortfolioOverrides {
    /// Comma-separated symbols (e.g., "INFY.NS,RELIANCE.NS").
    #[arg(long, value_delimiter = ',', global = true)]
    symbols: Option<Vec<String>>,

    /// Comma-separated weights, one per symbol (e.g., "0.5,0.5").
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, global = true)]
    weights: Option<Vec<f64>>,

    /// The start date of the price history (format: YYYY-MM-DD).
    #[arg(long, global = true)]
    from: Option<NaiveDate>,

    /// The end date of the price history, exclusive (format: YYYY-MM-DD).
    #[arg(long, global = true)]
    to: Option<NaiveDate>,

    /// Where closing prices come from.
    #[arg(long, value_enum, global = true)]
    provider: Option<Provider>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu: pick a metric, enter its inputs, see the result and chart.
    Menu,
    /// Compute every metric once and print them.
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Confidence level in (0, 1); defaults to risk.confidence_level.
    #[arg(long)]
    confidence: Option<f64>,

    /// Comma-separated shock per asset (e.g., "-0.05,-0.03").
    #[arg(long, allow_hyphen_values = true)]
    stress: Option<StressScenario>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Also draw the return distribution chart.
    #[arg(long)]
    chart: bool,
}

impl PortfolioOverrides {
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(symbols) = self.symbols {
            config.portfolio.symbols = symbols
                .iter()
                .map(|s| AssetSymbol::new(s))
                .collect::<Result<_, _>>()
                .context("Invalid --symbols")?;
        }
        if let Some(weights) = self.weights {
            config.portfolio.weights = weights;
        }
        if let Some(from) = self.from {
            config.portfolio.start_date = from;
        }
        if let Some(to) = self.to {
            config.portfolio.end_date = to;
        }
        if let Some(provider) = self.provider {
            config.data_source.provider = provider;
        }
        Ok(())
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    cli.overrides.apply(&mut config)?;
    config.validate()?;

    // Held until exit so the file writer flushes.
    let _log_guard = init_tracing(&config.logging)?;

    let engine = build_engine(&config).await?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let menu = Menu::new(&engine, config.risk.histogram_bins, config.risk.confidence_level);
            menu.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::Report(args) => handle_report(&engine, &config, args)?,
    }
    Ok(())
}

/// Loads the configured portfolio and binds it to a risk engine.
async fn build_engine(config: &Config) -> Result<RiskEngine> {
    let portfolio = &config.portfolio;
    let source: Box<dyn PriceSource> = match config.data_source.provider {
        Provider::Yahoo => Box::new(YahooClient::new(
            &config.data_source.base_url,
            Duration::from_secs(config.data_source.timeout_secs),
        )?),
        Provider::Csv => Box::new(CsvPriceSource::new(&config.data_source.csv_dir)),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!(
        "Loading prices for {} symbols from {} to {}...",
        portfolio.symbols.len(),
        portfolio.start_date,
        portfolio.end_date
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let loaded = load_prices(
        source.as_ref(),
        &portfolio.symbols,
        portfolio.start_date,
        portfolio.end_date,
    )
    .await;
    spinner.finish_and_clear();
    let loaded = loaded?;

    if !loaded.skipped.is_empty() {
        let skipped = loaded
            .skipped
            .iter()
            .map(|s| format!("{} ({})", s.symbol, s.reason))
            .collect::<Vec<_>>()
            .join(", ");
        bail!(
            "{} weights were configured but only {} of {} symbols loaded; skipped: {}. \
             Adjust portfolio.symbols and portfolio.weights to the available symbols.",
            portfolio.weights.len(),
            loaded.loaded.len(),
            portfolio.symbols.len(),
            skipped
        );
    }

    let weights = portfolio.weight_vector()?;
    let total = weights.sum();
    if (total - 1.0).abs() > 1e-6 {
        tracing::warn!(sum = total, "Portfolio weights do not sum to 1");
    }

    let prices = loaded
        .into_matrix()
        .context("Failed to align the loaded price histories")?;
    let engine = RiskEngine::new(prices, weights, config.risk.std_dev)
        .context("Failed to build the risk engine")?;

    tracing::info!(
        assets = engine.symbols().len(),
        observations = engine.observations(),
        "Risk engine ready"
    );
    Ok(engine)
}

/// Handles the non-interactive report.
fn handle_report(engine: &RiskEngine, config: &Config, args: ReportArgs) -> Result<()> {
    let confidence = args.confidence.unwrap_or(config.risk.confidence_level);
    let report = AnalyticsEngine::new().report(engine, confidence, args.stress.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format::report_table(&report));
    }

    if args.chart {
        let chart = chart::distribution_chart(engine, config.risk.histogram_bins, confidence)?;
        println!("\n{chart}");
    }
    Ok(())
}
