use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    Config, DataSourceSettings, LoggingSettings, PortfolioSettings, Provider, RiskSettings,
};

/// Prefix of environment variables that override file values,
/// e.g. `VARLENS__RISK__CONFIDENCE_LEVEL=0.99`.
pub const ENV_PREFIX: &str = "VARLENS";

/// Loads the application configuration from the given TOML file.
///
/// Environment variables prefixed with [`ENV_PREFIX`] are layered on top of the
/// file. List values (`symbols`, `weights`) are comma-separated in the
/// environment; a single-asset portfolio passes a bare value. The result is
/// not validated, so that command-line overrides can be applied first; call
/// [`Config::validate`] afterwards.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("portfolio.symbols")
                .with_list_parse_key("portfolio.weights"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}

/// Parses configuration from TOML text. Environment variables are not consulted.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(builder.try_deserialize::<Config>()?)
}
