use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input directory does not exist: {}", .0.display())]
    MissingInputDirectory(PathBuf),

    #[error("Data access error: {0}")]
    Data(#[from] datastore::DataError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] configuration::ConfigError),

    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Report writing error: {0}")]
    Report(#[from] reporter::ReportError),

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),
}

impl From<indicatif::style::TemplateError> for PipelineError {
    fn from(error: indicatif::style::TemplateError) -> Self {
        PipelineError::ProgressBarTemplate(error.to_string())
    }
}
