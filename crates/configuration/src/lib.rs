use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AnalyticsSettings, BenchmarkSettings, Config, InputColumns, Paths, ReportFormat,
    ReportSettings,
};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "weekly-analytics";

/// Prefix of environment variables that override file settings,
/// e.g. `WEEKLY__ANALYTICS__RISK_FREE_RATE=3.0`.
pub const ENV_PREFIX: &str = "WEEKLY";

/// Loads the application configuration.
///
/// Built-in defaults are layered under the TOML file, which is layered under
/// `WEEKLY__*` environment variables. An explicit `path` must exist; the default
/// `weekly-analytics.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .set_default("paths.raw_data_dir", "Strategy Testing/Unadjusted Historical Data")?
        .set_default("paths.adjusted_data_dir", "Strategy Testing/Adjusted Historical Data")?
        .set_default("paths.results_dir", "Strategy Testing/Results")?
        .set_default("paths.file_extension", "csv")?
        .set_default("input.timestamp_column", "timestamp")?
        .set_default("input.open_column", "open")?
        .set_default("input.close_column", "close_with_splits")?
        .set_default("analytics.risk_free_rate", 2.0)?
        .set_default("report.format", "json")?
        .set_default("report.chart", true)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
