//! YAML record decoding.
//!
//! Turns the text of one record file into an untyped JSON-style value. This
//! is the only place that knows records are YAML; everything downstream sees
//! `serde_json::Value`.

use std::path::Path;

use serde_json::Value;

use automl_catalog_shared::{CatalogError, Result};

/// Decode one record file's contents.
///
/// An empty file decodes to `Value::Null`, which the validation engine
/// reports as a non-mapping record rather than failing the run.
pub(crate) fn parse_record(content: &str, path: &Path) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_yaml::from_str::<Value>(content).map_err(|e| {
        let message = match e.location() {
            Some(location) => format!(
                "YAML syntax error at line {}, column {}: {e}",
                location.line(),
                location.column()
            ),
            None => format!("YAML parsing error: {e}"),
        };
        CatalogError::decode(path, message)
    })
}
