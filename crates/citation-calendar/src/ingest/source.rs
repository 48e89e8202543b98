use crate::jurisdiction::Jurisdiction;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SourceFileError {
    #[error("failed to list source directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("source file {0} is not named <state>_<city>_*.csv")]
    InvalidFileName(PathBuf),
}

/// A raw event log and the jurisdiction encoded in its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub jurisdiction: Jurisdiction,
}

impl SourceFile {
    /// `tx_austin_2020_04_01.csv` belongs to Austin, TX.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceFileError> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| SourceFileError::InvalidFileName(path.to_path_buf()))?;

        let mut segments = stem.split('_').map(str::trim);
        match (segments.next(), segments.next()) {
            (Some(state), Some(city)) if !state.is_empty() && !city.is_empty() => Ok(Self {
                path: path.to_path_buf(),
                jurisdiction: Jurisdiction::new(city, state),
            }),
            _ => Err(SourceFileError::InvalidFileName(path.to_path_buf())),
        }
    }
}

/// Every `*.csv` directly under `dir`, sorted by path.
pub fn discover_sources<P: AsRef<Path>>(dir: P) -> Result<Vec<SourceFile>, SourceFileError> {
    let dir = dir.as_ref();
    let io_error = |source| SourceFileError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();

    paths.into_iter().map(SourceFile::from_path).collect()
}
