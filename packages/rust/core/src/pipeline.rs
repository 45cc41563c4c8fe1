//! End-to-end runs: data directory → load → compile → write documents.

use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use automl_catalog_discovery::DirectorySource;
use automl_catalog_shared::{CatalogConfig, Renderer, Result};

use crate::assembler::{self, DocumentMeta};
use crate::compiler;
use crate::loader::{self, LoadOptions, LoadResult};
use crate::validate::ValidationError;

/// Result of [`compile_catalog`].
#[derive(Debug)]
pub struct CompileReport {
    /// Number of entries that made it into the documents.
    pub entries: usize,
    /// Records left out because they failed validation.
    pub failures: Vec<ValidationError>,
    /// Written documents, in name order.
    pub documents: Vec<DocumentMeta>,
    pub elapsed: Duration,
}

/// Result of [`validate_catalog`].
#[derive(Debug)]
pub struct ValidateReport {
    /// Records checked, failures included. The authoring template is not
    /// counted.
    pub checked: usize,
    pub failures: Vec<ValidationError>,
}

impl ValidateReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

fn load_from(config: &CatalogConfig) -> Result<LoadResult> {
    let source = DirectorySource::new(&config.data_dir);
    let options = LoadOptions {
        template_file: config.template_file.clone(),
    };
    loader::load(&source, &options)
}

/// Load every record under `config.data_dir`, compile the valid ones, and
/// write the documents into `config.output_dir`.
///
/// Invalid records are reported and skipped; the run still succeeds.
#[instrument(skip_all, fields(data_dir = %config.data_dir.display(), output_dir = %config.output_dir.display()))]
pub fn compile_catalog(config: &CatalogConfig, renderer: &dyn Renderer) -> Result<CompileReport> {
    let start = Instant::now();

    let LoadResult { catalog, failures } = load_from(config)?;
    for failure in &failures {
        for error in &failure.errors {
            warn!(
                key = %failure.key,
                path = %error.path,
                violation = %error.violation,
                "record left out of the catalog"
            );
        }
    }

    let documents = compiler::compile(&catalog, renderer)?;
    let documents = assembler::write_documents(&config.output_dir, &documents)?;

    let elapsed = start.elapsed();
    info!(
        entries = catalog.len(),
        failed = failures.len(),
        documents = documents.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "catalog compiled"
    );

    Ok(CompileReport {
        entries: catalog.len(),
        failures,
        documents,
        elapsed,
    })
}

/// Validate every record under `config.data_dir` without writing anything.
#[instrument(skip_all, fields(data_dir = %config.data_dir.display()))]
pub fn validate_catalog(config: &CatalogConfig) -> Result<ValidateReport> {
    let LoadResult { catalog, failures } = load_from(config)?;
    let checked = catalog.len() + failures.len();

    info!(checked, failed = failures.len(), "catalog validated");

    Ok(ValidateReport { checked, failures })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
