//! Record validation engine.
//!
//! [`validate`] checks one decoded record against the catalog schema and
//! either builds a [`CatalogEntry`] or reports *every* offending field in a
//! single [`ValidationError`]. It is a pure function: no I/O, no logging.

use std::path::PathBuf;

use serde_json::{Map, Value};

use automl_catalog_shared::{
    CatalogEntry, Category, ComputationalResources, SearchSpace, UrlError, WebUrl,
};

/// Path reported when the record itself is not a mapping.
pub const ROOT_PATH: &str = "__root__";

/// Top-level record keys, in schema order.
pub const RECORD_FIELDS: &[&str] = &[
    "name",
    "description",
    "website",
    "open_source",
    "institutions",
    "repository",
    "license",
    "references",
    "cli",
    "gui",
    "http",
    "library",
    "programming_languages",
    "domains",
    "multi_domain",
    "techniques",
    "ml_libraries",
    "multi_task",
    "tasks",
    "distillation",
    "search_strategies",
    "search_space",
    "meta_learning",
    "extensible",
    "accessible",
    "portable",
    "computational_resources",
];

/// Keys of the `search_space` mapping.
pub const SEARCH_SPACE_FIELDS: &[&str] = &[
    "hierarchical",
    "probabilistic",
    "differentiable",
    "automatic",
    "robust",
    "hyperparameters",
    "pipelines",
];

/// Keys of the `computational_resources` mapping.
pub const RESOURCE_FIELDS: &[&str] = &["gpu", "tpu", "cluster"];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A single broken constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("field required")]
    Missing,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{value}` is not a valid {category} (allowed: {allowed})")]
    UnknownVariant {
        category: &'static str,
        value: String,
        allowed: String,
    },

    #[error("invalid URL `{value}`: {reason}")]
    MalformedUrl { value: String, reason: UrlError },

    #[error("duplicate key, already defined by {first}")]
    DuplicateKey { first: String },
}

/// A violation at a specific field path (`search_space.pipelines[1]`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {violation}")]
pub struct FieldError {
    pub path: String,
    pub violation: Violation,
}

impl FieldError {
    pub fn new(path: impl Into<String>, violation: Violation) -> Self {
        Self {
            path: path.into(),
            violation,
        }
    }
}

/// Every violation found in one record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{key}: {} validation error(s)", .errors.len())]
pub struct ValidationError {
    /// Key of the failing record.
    pub key: String,
    /// File the record came from, when known.
    pub origin: Option<PathBuf>,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            key: key.into(),
            origin: None,
            errors,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Whether any violation was reported at exactly `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// Multi-line listing: one `path` line followed by an indented reason.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for error in &self.errors {
            out.push_str(&format!("  {}\n    {}\n", error.path, error.violation));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Validate one decoded record whose key is `key`.
pub fn validate(key: &str, raw: &Value) -> Result<CatalogEntry, ValidationError> {
    let Some(map) = raw.as_object() else {
        let violation = Violation::WrongType {
            expected: "mapping",
            found: type_name(raw),
        };
        return Err(ValidationError::new(
            key,
            vec![FieldError::new(ROOT_PATH, violation)],
        ));
    };

    let mut errors = Vec::new();
    let mut fields = Fields {
        map,
        prefix: String::new(),
        errors: &mut errors,
    };

    let entry = CatalogEntry {
        key: key.to_string(),
        name: fields.string("name"),
        description: fields.optional_string("description"),
        website: fields.optional_url("website"),
        open_source: fields.bool("open_source"),
        institutions: fields.strings("institutions"),
        repository: fields.optional_url("repository"),
        license: fields.optional_string("license"),
        references: fields.urls("references"),
        cli: fields.bool("cli"),
        gui: fields.bool("gui"),
        http: fields.bool("http"),
        library: fields.bool("library"),
        programming_languages: fields.strings("programming_languages"),
        domains: fields.tags("domains"),
        multi_domain: fields.bool("multi_domain"),
        techniques: fields.tags("techniques"),
        ml_libraries: fields.strings("ml_libraries"),
        multi_task: fields.bool("multi_task"),
        tasks: fields.tags("tasks"),
        distillation: fields.bool("distillation"),
        search_strategies: fields.tags("search_strategies"),
        search_space: fields.nested("search_space", |space| SearchSpace {
            hierarchical: space.bool("hierarchical"),
            probabilistic: space.bool("probabilistic"),
            differentiable: space.bool("differentiable"),
            automatic: space.bool("automatic"),
            robust: space.bool("robust"),
            hyperparameters: space.tags("hyperparameters"),
            pipelines: space.tags("pipelines"),
        }),
        meta_learning: fields.tags("meta_learning"),
        extensible: fields.bool("extensible"),
        accessible: fields.bool("accessible"),
        portable: fields.bool("portable"),
        computational_resources: fields.nested("computational_resources", |res| {
            ComputationalResources {
                gpu: res.bool("gpu"),
                tpu: res.bool("tpu"),
                cluster: res.bool("cluster"),
            }
        }),
    };

    if errors.is_empty() {
        Ok(entry)
    } else {
        Err(ValidationError::new(key, errors))
    }
}

/// Keys present in the record that the schema does not know, as field paths.
///
/// These are ignored by [`validate`]; callers may want to log them.
pub fn unknown_fields(raw: &Value) -> Vec<String> {
    let Some(map) = raw.as_object() else {
        return Vec::new();
    };

    let mut unknown: Vec<String> = map
        .keys()
        .filter(|k| !RECORD_FIELDS.contains(&k.as_str()))
        .cloned()
        .collect();

    for (nested, known) in [
        ("search_space", SEARCH_SPACE_FIELDS),
        ("computational_resources", RESOURCE_FIELDS),
    ] {
        if let Some(inner) = map.get(nested).and_then(Value::as_object) {
            unknown.extend(
                inner
                    .keys()
                    .filter(|k| !known.contains(&k.as_str()))
                    .map(|k| format!("{nested}.{k}")),
            );
        }
    }

    unknown
}

/// Fields an open-source entry would normally carry but does not.
///
/// `license` and `repository` are optional at the schema level whatever the
/// value of `open_source`; this only feeds warnings.
pub fn open_source_advisories(entry: &CatalogEntry) -> Vec<&'static str> {
    if !entry.open_source {
        return Vec::new();
    }

    let mut missing = Vec::new();
    if entry.repository.is_none() {
        missing.push("repository");
    }
    if entry.license.is_none() {
        missing.push("license");
    }
    missing
}

// ---------------------------------------------------------------------------
// Field reader
// ---------------------------------------------------------------------------

/// Reads typed values out of one mapping, recording every violation.
///
/// Readers never stop early: on failure they record the problem and return a
/// placeholder, so the caller sees all violations in one pass. The
/// placeholder is never observable because any recorded error turns the
/// whole record into a [`ValidationError`].
struct Fields<'a, 'e> {
    map: &'a Map<String, Value>,
    prefix: String,
    errors: &'e mut Vec<FieldError>,
}

impl<'a> Fields<'a, '_> {
    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    fn fail(&mut self, path: String, violation: Violation) {
        self.errors.push(FieldError::new(path, violation));
    }

    fn wrong_type(&mut self, path: String, expected: &'static str, found: &Value) {
        self.fail(
            path,
            Violation::WrongType {
                expected,
                found: type_name(found),
            },
        );
    }

    /// A present, non-null value.
    fn required(&mut self, field: &str, expected: &'static str) -> Option<&'a Value> {
        match self.map.get(field) {
            None => {
                let path = self.path(field);
                self.fail(path, Violation::Missing);
                None
            }
            Some(Value::Null) => {
                let path = self.path(field);
                self.wrong_type(path, expected, &Value::Null);
                None
            }
            Some(value) => Some(value),
        }
    }

    /// A value that may be absent or null.
    fn optional(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|value| !value.is_null())
    }

    fn bool(&mut self, field: &str) -> bool {
        let Some(value) = self.required(field, "bool") else {
            return false;
        };
        match value.as_bool() {
            Some(flag) => flag,
            None => {
                let path = self.path(field);
                self.wrong_type(path, "bool", value);
                false
            }
        }
    }

    fn string(&mut self, field: &str) -> String {
        let Some(value) = self.required(field, "string") else {
            return String::new();
        };
        match value.as_str() {
            Some(text) => text.to_string(),
            None => {
                let path = self.path(field);
                self.wrong_type(path, "string", value);
                String::new()
            }
        }
    }

    fn optional_string(&mut self, field: &str) -> Option<String> {
        let value = self.optional(field)?;
        match value.as_str() {
            Some(text) => Some(text.to_string()),
            None => {
                let path = self.path(field);
                self.wrong_type(path, "string", value);
                None
            }
        }
    }

    fn optional_url(&mut self, field: &str) -> Option<WebUrl> {
        let value = self.optional(field)?;
        let path = self.path(field);
        self.url_at(path, value)
    }

    fn url_at(&mut self, path: String, value: &Value) -> Option<WebUrl> {
        let Some(text) = value.as_str() else {
            self.wrong_type(path, "URL string", value);
            return None;
        };
        match WebUrl::parse(text) {
            Ok(url) => Some(url),
            Err(reason) => {
                self.fail(
                    path,
                    Violation::MalformedUrl {
                        value: text.to_string(),
                        reason,
                    },
                );
                None
            }
        }
    }

    /// A required sequence.
    fn list(&mut self, field: &str) -> &'a [Value] {
        let Some(value) = self.required(field, "sequence") else {
            return &[];
        };
        match value.as_array() {
            Some(items) => items.as_slice(),
            None => {
                let path = self.path(field);
                self.wrong_type(path, "sequence", value);
                &[]
            }
        }
    }

    fn strings(&mut self, field: &str) -> Vec<String> {
        let items = self.list(field);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(text) => out.push(text.to_string()),
                None => {
                    let path = format!("{}[{i}]", self.path(field));
                    self.wrong_type(path, "string", item);
                }
            }
        }
        out
    }

    fn urls(&mut self, field: &str) -> Vec<WebUrl> {
        let items = self.list(field);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{}[{i}]", self.path(field));
            if let Some(url) = self.url_at(path, item) {
                out.push(url);
            }
        }
        out
    }

    /// A required sequence of tags from one registry family.
    fn tags<C: Category>(&mut self, field: &str) -> Vec<C> {
        let items = self.list(field);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{}[{i}]", self.path(field));
            let Some(text) = item.as_str() else {
                self.wrong_type(path, "string", item);
                continue;
            };
            match C::parse(text) {
                Some(tag) => out.push(tag),
                None => self.fail(
                    path,
                    Violation::UnknownVariant {
                        category: C::NAME,
                        value: text.to_string(),
                        allowed: C::names().join(", "),
                    },
                ),
            }
        }
        out
    }

    /// A required nested mapping, read with its own prefix.
    fn nested<T: Default>(&mut self, field: &str, read: impl FnOnce(&mut Fields<'a, '_>) -> T) -> T {
        let Some(value) = self.required(field, "mapping") else {
            return T::default();
        };
        let Some(inner) = value.as_object() else {
            let path = self.path(field);
            self.wrong_type(path, "mapping", value);
            return T::default();
        };

        let mut child = Fields {
            map: inner,
            prefix: self.path(field),
            errors: &mut *self.errors,
        };
        read(&mut child)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
