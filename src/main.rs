use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, ReportFormat, load_config};
use pipeline::{Phase, Pipeline, ProcessOutcome};
use reporter::console;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the plain-text log written into the results directory.
const LOG_FILE: &str = "weekly-analytics.log";

/// The main entry point for the weekly analytics application.
fn main() -> anyhow::Result<()> {
    // A .env file is optional; it only feeds RUST_LOG and WEEKLY__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.settings()?;
    let pipeline = Pipeline::new(&config)?;
    // before logging creates the results directory
    pipeline.check_input(cli.command.first_phase())?;
    let _log_guard = init_tracing(&config)?;

    match cli.command {
        Commands::Adjust => {
            let outcome = pipeline.adjust()?;
            println!(
                "Adjusted {} files ({} skipped) in {:.2?}",
                outcome.files.processed, outcome.files.skipped, outcome.elapsed
            );
        }
        Commands::Process => print_results(&pipeline.process()?),
        Commands::Run => {
            let outcome = pipeline.run()?;
            println!(
                "Adjusted {} files ({} skipped)",
                outcome.adjust.files.processed, outcome.adjust.files.skipped
            );
            print_results(&outcome.process);
            println!("Total run time: {:.2?}", outcome.elapsed);
        }
    }
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Weekly risk and profit analytics for a basket of instruments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file (defaults to ./weekly-analytics.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the directory of raw price-history files.
    #[arg(long, global = true)]
    raw_data_dir: Option<PathBuf>,

    /// Overrides the directory of derived weekly histories.
    #[arg(long, global = true)]
    adjusted_data_dir: Option<PathBuf>,

    /// Overrides the directory results are written to.
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,

    /// Overrides the format of the risk-adjusted metrics report.
    #[arg(long, global = true, value_enum)]
    format: Option<ReportFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive weekly risk and profit for every raw price-history file.
    Adjust,
    /// Aggregate the derived histories and write the results.
    Process,
    /// Adjust, then process.
    Run,
}

impl Commands {
    fn first_phase(&self) -> Phase {
        match self {
            Commands::Adjust | Commands::Run => Phase::Adjust,
            Commands::Process => Phase::Process,
        }
    }
}

impl Cli {
    /// Loads the configuration and applies the command-line overrides on top.
    fn settings(&self) -> anyhow::Result<Config> {
        let mut config = load_config(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(dir) = &self.raw_data_dir {
            config.paths.raw_data_dir = dir.clone();
        }
        if let Some(dir) = &self.adjusted_data_dir {
            config.paths.adjusted_data_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.paths.results_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        Ok(config)
    }
}

// ==============================================================================
// Logging and Output
// ==============================================================================

/// Installs console logging (sharing the terminal with progress bars) and a
/// log file in the results directory.
fn init_tracing(config: &Config) -> anyhow::Result<WorkerGuard> {
    let results_dir = &config.paths.results_dir;
    std::fs::create_dir_all(results_dir)
        .with_context(|| format!("Failed to create {}", results_dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(results_dir, LOG_FILE));

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(indicatif_layer)
        .init();
    Ok(guard)
}

fn print_results(outcome: &ProcessOutcome) {
    println!(
        "Processed {} files ({} skipped) in {:.2?}",
        outcome.files.processed, outcome.files.skipped, outcome.elapsed
    );
    println!("\nYearly Risk and Profit\n{}", console::yearly_table(&outcome.rollup.years));
    println!("\nAdjusted Summary\n{}", console::summary_table(&outcome.rollup.summary));
    println!("\nInstrument Profit Odds\n{}", console::win_loss_table(&outcome.win_loss));
    println!(
        "\nRisk Adjusted Metrics ({} {})\n{}",
        outcome.metrics.benchmark_name,
        outcome.metrics.benchmark_version,
        console::metrics_table(&outcome.metrics)
    );
    for path in &outcome.artifacts {
        println!("  wrote {}", path.display());
    }
}
