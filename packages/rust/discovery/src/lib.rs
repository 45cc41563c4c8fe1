//! Record discovery for the AutoML catalog.
//!
//! Walks a data directory recursively, picks up every `.yml`/`.yaml` file,
//! and decodes each one into a [`RawRecord`]. Files are returned in
//! lexicographic path order so that every run sees the same sequence.
//!
//! Nothing here knows about the record schema or the authoring template;
//! both are the loader's business.

mod parser;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use automl_catalog_shared::{CatalogError, RawRecord, RecordSource, Result};

/// File extensions treated as record files.
pub const RECORD_EXTENSIONS: &[&str] = &["yml", "yaml"];

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// A [`RecordSource`] backed by a directory tree of YAML files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RecordSource for DirectorySource {
    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn records(&self) -> Result<Vec<RawRecord>> {
        if !self.root.is_dir() {
            return Err(CatalogError::io(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found"),
            ));
        }

        let paths = record_paths(&self.root)?;

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let content =
                std::fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
            let value = parser::parse_record(&content, &path)?;
            debug!(path = %path.display(), "decoded record file");
            records.push(RawRecord::from_origin(path, value));
        }

        info!(count = records.len(), "record files discovered");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every record file below `root`, sorted by path.
///
/// An entry that cannot be read fails the whole walk.
fn record_paths(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_file() && is_record_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}

fn walk_error(root: &Path, err: walkdir::Error) -> CatalogError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop while walking records"));
    CatalogError::io(path, source)
}

fn is_record_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RECORD_EXTENSIONS.contains(&ext))
}
