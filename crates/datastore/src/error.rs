use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Input directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("{} is missing required columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("{} does not name a file", .0.display())]
    NotAFile(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl DataError {
    /// True for errors that only disqualify a single instrument file.
    pub fn is_file_local(&self) -> bool {
        !matches!(self, DataError::MissingDirectory(_))
    }
}
