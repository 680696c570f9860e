use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings (defaults, TOML file, WEEKLY__* variables): {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Benchmark year '{0}' is not a calendar year")]
    BenchmarkYear(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
