//! Output directory assembler.
//!
//! Takes compiled documents and writes them as `<name>.md` files into the
//! output directory.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use automl_catalog_shared::{CatalogError, Result};

use crate::compiler::Documents;

/// Extension given to every written document.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Metadata for a single written document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write every document into `output_dir`, creating it if needed.
///
/// Each file is written atomically (write to temp, then rename), so an
/// interrupted run never leaves a half-written document behind. Existing
/// files with the same name are replaced; other files are left alone.
#[instrument(skip_all, fields(output_dir = %output_dir.display(), count = documents.len()))]
pub fn write_documents(output_dir: &Path, documents: &Documents) -> Result<Vec<DocumentMeta>> {
    std::fs::create_dir_all(output_dir).map_err(|e| CatalogError::io(output_dir, e))?;

    let mut metas = Vec::with_capacity(documents.len());

    for (name, content) in documents {
        let filename = format!("{name}.{DOCUMENT_EXTENSION}");
        let target = output_dir.join(&filename);
        let temp = output_dir.join(format!(".{filename}.tmp"));

        write_atomically(&temp, &target, content)?;

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        debug!(file = %filename, size = content.len(), sha256 = %hash, "wrote document");

        metas.push(DocumentMeta {
            filename,
            sha256: hash,
            size_bytes: content.len(),
        });
    }

    info!(count = metas.len(), "documents written");

    Ok(metas)
}

/// Write `content` to `temp`, then move it over `target`. The temp file is
/// removed again when either step fails.
fn write_atomically(temp: &Path, target: &Path, content: &str) -> Result<()> {
    let written = std::fs::write(temp, content)
        .map_err(|e| CatalogError::io(temp, e))
        .and_then(|()| std::fs::rename(temp, target).map_err(|e| CatalogError::io(target, e)));

    if written.is_err() && temp.exists() {
        if let Err(e) = std::fs::remove_file(temp) {
            warn!(path = %temp.display(), error = %e, "could not remove temp file");
        }
    }
    written
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
