use crate::error::DataError;
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the files in `dir` whose extension matches `extension`
/// (case-insensitive), sorted by file name.
pub fn list_instrument_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::MissingDirectory(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| DataError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Creates `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), DataError> {
    fs::create_dir_all(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// The instrument identifier of a source file: its file stem.
pub fn instrument_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
