//! Catalog loader: raw records in, sorted catalog plus failures out.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use automl_catalog_shared::{CatalogEntry, RawRecord, RecordSource, Result};

use crate::validate::{self, FieldError, ValidationError, Violation};

/// File name of the authoring template when none is configured.
pub const DEFAULT_TEMPLATE_FILE: &str = "_template.yml";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Validated entries ordered by display name, then key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, imposing the canonical order.
    ///
    /// Keys must be unique; [`load`] guarantees this for loaded catalogs.
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Options for [`load`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// File name of the authoring template to skip.
    pub template_file: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            template_file: DEFAULT_TEMPLATE_FILE.to_string(),
        }
    }
}

/// Outcome of [`load`]: the records that validated and the ones that did not.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub catalog: Catalog,
    /// In source order.
    pub failures: Vec<ValidationError>,
}

impl LoadResult {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Whether `record` is the authoring template rather than a real entry.
pub fn is_authoring_template(record: &RawRecord, template_file: &str) -> bool {
    record.file_name() == Some(template_file)
}

/// Validate every record from `source` and collect the results.
///
/// A malformed record never stops the others from loading. Only failing to
/// enumerate or decode the source is an error.
#[instrument(skip_all, fields(template = %options.template_file))]
pub fn load(source: &dyn RecordSource, options: &LoadOptions) -> Result<LoadResult> {
    let records = source.records()?;

    let mut entries = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for record in records {
        if is_authoring_template(&record, &options.template_file) {
            debug!(origin = %record.origin.display(), "skipping authoring template");
            continue;
        }

        if let Some(first) = seen.get(&record.key) {
            let violation = Violation::DuplicateKey {
                first: first.display().to_string(),
            };
            failures.push(
                ValidationError::new(&record.key, vec![FieldError::new("key", violation)])
                    .with_origin(&record.origin),
            );
            continue;
        }
        seen.insert(record.key.clone(), record.origin.clone());

        match validate::validate(&record.key, &record.value) {
            Ok(entry) => {
                for field in validate::unknown_fields(&record.value) {
                    debug!(key = %entry.key, field = %field, "ignoring unknown field");
                }
                for field in validate::open_source_advisories(&entry) {
                    warn!(key = %entry.key, field, "open-source system without optional field");
                }
                entries.push(entry);
            }
            Err(err) => failures.push(err.with_origin(&record.origin)),
        }
    }

    let catalog = Catalog::new(entries);

    info!(
        loaded = catalog.len(),
        failed = failures.len(),
        "catalog loaded"
    );

    Ok(LoadResult { catalog, failures })
}
