//! Seam between the catalog loader and wherever raw records come from.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::Result;

/// An undecoded-by-schema record: structured data plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Identifying key, the origin file stem.
    pub key: String,
    /// File the record was read from.
    pub origin: PathBuf,
    /// The decoded key-value structure.
    pub value: Value,
}

impl RawRecord {
    /// Build a record whose key is the stem of `origin`.
    pub fn from_origin(origin: impl Into<PathBuf>, value: Value) -> Self {
        let origin = origin.into();
        let key = origin
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { key, origin, value }
    }

    /// File name of the origin, used for the authoring-template exclusion.
    pub fn file_name(&self) -> Option<&str> {
        self.origin.file_name().and_then(|name| name.to_str())
    }
}

/// Anything that can enumerate raw records.
///
/// Failing to enumerate or decode is fatal for a run; per-record schema
/// problems are not this trait's concern.
pub trait RecordSource {
    fn records(&self) -> Result<Vec<RawRecord>>;
}

impl RecordSource for Vec<RawRecord> {
    fn records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.clone())
    }
}
