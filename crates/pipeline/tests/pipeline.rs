use configuration::{BenchmarkSettings, Config, ConfigError, load_config};
use std::collections::BTreeMap;
use pipeline::{Phase, Pipeline, PipelineError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// 2020-01-10: risk 10, profit 1
// 2020-01-24: risk 5, profit 0.1
const AAA: &str = "timestamp,open,close_with_splits
2020-01-03,100,90
2020-01-10,100,110
2020-01-17,100,95
2020-01-24,100,102
";

// 2020-01-17: risk 10, profit 1
// 2021-01-15: risk 20, profit -1
// 2021-01-22: risk 5, profit 0.5
const BBB: &str = "timestamp,open,close_with_splits
2020-01-03,50,55
2020-01-10,50,45
2020-01-17,50,55
2021-01-08,100,80
2021-01-15,100,95
2021-01-22,100,110
";

const WITHOUT_ADJUSTED_CLOSE: &str = "timestamp,open,close
2020-01-03,100,90
2020-01-10,100,110
";

fn config_for(root: &Path, format: &str, chart: bool) -> Config {
    let toml = format!(
        "[paths]
raw_data_dir = '{raw}'
adjusted_data_dir = '{adjusted}'
results_dir = '{results}'

[report]
format = '{format}'
chart = {chart}
",
        raw = root.join("raw").display(),
        adjusted = root.join("adjusted").display(),
        results = root.join("results").display(),
    );
    let path = root.join("weekly-analytics.toml");
    fs::write(&path, toml).unwrap();
    load_config(Some(&path)).unwrap()
}

fn seeded_workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("aaa.csv"), AAA).unwrap();
    fs::write(raw.join("bbb.csv"), BBB).unwrap();
    fs::write(raw.join("ccc.csv"), WITHOUT_ADJUSTED_CLOSE).unwrap();
    fs::write(raw.join("notes.txt"), "not an instrument").unwrap();
    dir
}

#[test]
fn full_run_writes_every_artifact() {
    let dir = seeded_workspace();
    let config = config_for(dir.path(), "json", true);
    let outcome = Pipeline::new(&config).unwrap().run().unwrap();

    assert_eq!(outcome.adjust.files.processed, 2);
    assert_eq!(outcome.adjust.files.skipped, 1);
    assert_eq!(outcome.process.files.processed, 2);
    assert_eq!(outcome.process.files.skipped, 0);
    assert!(!dir.path().join("adjusted/ccc.csv").exists());

    let results = dir.path().join("results");
    for name in [
        "Yearly Risk and Profit.csv",
        "Adjusted Summary.csv",
        "Instrument Profit Odds.csv",
        "Risk Adjusted Metrics.json",
        "Yearly Return Graph.svg",
    ] {
        assert!(results.join(name).exists(), "{name} was not written");
    }
    assert_eq!(outcome.process.artifacts.len(), 5);

    assert_eq!(
        fs::read_to_string(results.join("Yearly Risk and Profit.csv")).unwrap(),
        "year,yearly_risk,yearly_profit,yearly_return_pct,cumulative_return_pct\n\
         2020,10.00,2.10,21.00,21.00\n\
         2021,20.00,-0.50,-2.50,17.98\n"
    );
    assert_eq!(
        fs::read_to_string(results.join("Adjusted Summary.csv")).unwrap(),
        "average_yearly_risk,average_yearly_profit,percent_return\n15.00,0.80,5.33\n"
    );
    assert_eq!(
        fs::read_to_string(results.join("Instrument Profit Odds.csv")).unwrap(),
        "instrument,total_weeks,positive_weeks,negative_weeks,percent_positive,percent_negative\n\
         Combined Totals,5,4,1,80.00,20.00\n\
         aaa,2,2,0,100.00,0.00\n\
         bbb,3,2,1,66.67,33.33\n"
    );

    let metrics: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(results.join("Risk Adjusted Metrics.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metrics["benchmark_name"], "S&P 500");
    // the risk-weighted return overrides the plain mean of the yearly returns
    assert_eq!(metrics["strategy"]["average_return"], "5.33");
    assert_eq!(metrics["strategy"]["max_drawdown"], "-2.50");
    assert_eq!(metrics["benchmark"]["max_drawdown"], "18.40");
}

#[test]
fn derived_files_carry_undefined_first_week() {
    let dir = seeded_workspace();
    let config = config_for(dir.path(), "json", false);
    Pipeline::new(&config).unwrap().adjust().unwrap();

    let derived = fs::read_to_string(dir.path().join("adjusted/aaa.csv")).unwrap();
    let mut lines = derived.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,open,close,week_ended,pct_change,risk_on_open,abs_risk_on_open,profit_or_loss")
    );
    assert_eq!(
        lines.next(),
        Some("2020-01-03,100,90,2020-01-03T00:00:00,-10.00,,,")
    );
    assert_eq!(
        lines.next(),
        Some("2020-01-10,100,110,2020-01-10T00:00:00,10.00,10.00,10.00,1.00")
    );
}

#[test]
fn csv_report_format_without_chart() {
    let dir = seeded_workspace();
    let config = config_for(dir.path(), "csv", false);
    let outcome = Pipeline::new(&config).unwrap().run().unwrap();

    let results = dir.path().join("results");
    assert!(results.join("Risk Adjusted Metrics.csv").exists());
    assert!(!results.join("Risk Adjusted Metrics.json").exists());
    assert!(!results.join("Yearly Return Graph.svg").exists());
    assert_eq!(outcome.process.artifacts.len(), 4);
}

#[test]
fn missing_raw_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), "json", true);
    let err = Pipeline::new(&config).unwrap().run().unwrap_err();

    assert!(matches!(err, PipelineError::MissingInputDirectory(_)));
    assert!(!dir.path().join("results").exists());
}

#[test]
fn process_without_adjusted_directory_is_fatal() {
    let dir = seeded_workspace();
    let config = config_for(dir.path(), "json", true);
    let err = Pipeline::new(&config).unwrap().process().unwrap_err();

    assert!(matches!(err, PipelineError::MissingInputDirectory(_)));
}

#[test]
fn empty_raw_directory_produces_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("raw")).unwrap();
    let config = config_for(dir.path(), "json", true);
    let outcome = Pipeline::new(&config).unwrap().run().unwrap();

    assert_eq!(outcome.adjust.files.processed, 0);
    assert!(outcome.process.rollup.years.is_empty());
    assert_eq!(outcome.process.win_loss.len(), 1);
    // nothing to plot, so the chart is left out
    assert_eq!(outcome.process.artifacts.len(), 4);
    assert_eq!(
        fs::read_to_string(dir.path().join("results/Yearly Risk and Profit.csv")).unwrap(),
        "year,yearly_risk,yearly_profit,yearly_return_pct,cumulative_return_pct\n"
    );
}

#[test]
fn rerun_drops_instrument_that_became_malformed() {
    let dir = seeded_workspace();
    let raw = dir.path().join("raw");
    fs::write(raw.join("ccc.csv"), AAA).unwrap();
    let config = config_for(dir.path(), "json", false);

    let first = Pipeline::new(&config).unwrap().run().unwrap();
    assert_eq!(first.process.files.processed, 3);
    assert!(first.process.win_loss.iter().any(|row| row.instrument == "ccc"));

    fs::write(raw.join("ccc.csv"), WITHOUT_ADJUSTED_CLOSE).unwrap();
    let second = Pipeline::new(&config).unwrap().run().unwrap();

    assert_eq!(second.adjust.files.processed, 2);
    assert_eq!(second.adjust.files.skipped, 1);
    assert!(!dir.path().join("adjusted/ccc.csv").exists());
    assert_eq!(second.process.files.processed, 2);
    assert!(second.process.win_loss.iter().all(|row| row.instrument != "ccc"));
    assert_eq!(second.process.win_loss[0].total_weeks, 5);
}

#[test]
fn input_check_reports_missing_directory_without_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), "json", true);
    let pipeline = Pipeline::new(&config).unwrap();

    let err = pipeline.check_input(Phase::Adjust).unwrap_err();
    assert!(matches!(err, PipelineError::MissingInputDirectory(p) if p == dir.path().join("raw")));
    assert!(matches!(
        pipeline.check_input(Phase::Process),
        Err(PipelineError::MissingInputDirectory(_))
    ));
    assert!(!dir.path().join("results").exists());
    assert!(!dir.path().join("adjusted").exists());

    fs::create_dir_all(dir.path().join("raw")).unwrap();
    assert!(pipeline.check_input(Phase::Adjust).is_ok());
}

#[test]
fn empty_benchmark_table_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), "json", true);
    config.benchmark = Some(BenchmarkSettings {
        name: "Empty".to_string(),
        version: "v0".to_string(),
        returns: BTreeMap::new(),
    });

    let err = Pipeline::new(&config).err().unwrap();
    assert!(matches!(err, PipelineError::Config(ConfigError::ValidationError(_))));
}
