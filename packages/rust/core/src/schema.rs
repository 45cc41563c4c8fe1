//! JSON Schema for catalog records.
//!
//! Lets editors and external tooling check a record file without running the
//! validation engine. Enumerations come straight from the tag registry.

use serde_json::{Map, Value, json};

use automl_catalog_shared::{
    Category, Domain, HyperparameterKind, MAX_URL_LEN, MetaLearningKind, PipelineShape,
    SearchStrategy, Task, Technique,
};

use crate::validate::{RECORD_FIELDS, RESOURCE_FIELDS, SEARCH_SPACE_FIELDS};

/// Fields that may be absent or null.
const OPTIONAL_FIELDS: &[&str] = &["description", "website", "repository", "license"];

/// Draft-07 JSON Schema describing one record file.
pub fn record_schema() -> Value {
    let mut properties = Map::new();
    for &field in RECORD_FIELDS {
        properties.insert(field.to_string(), property(field));
    }

    let required: Vec<&str> = RECORD_FIELDS
        .iter()
        .copied()
        .filter(|field| !OPTIONAL_FIELDS.contains(field))
        .collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "AutoMLSystem",
        "type": "object",
        "properties": properties,
        "required": required,
        "definitions": {
            "SearchSpace": {
                "title": "SearchSpace",
                "type": "object",
                "properties": {
                    "hierarchical": {"type": "boolean"},
                    "probabilistic": {"type": "boolean"},
                    "differentiable": {"type": "boolean"},
                    "automatic": {"type": "boolean"},
                    "robust": {"type": "boolean"},
                    "hyperparameters": tag_list::<HyperparameterKind>(),
                    "pipelines": tag_list::<PipelineShape>(),
                },
                "required": SEARCH_SPACE_FIELDS,
            },
            "ComputationalResources": {
                "title": "ComputationalResources",
                "type": "object",
                "properties": {
                    "gpu": {"type": "boolean"},
                    "tpu": {"type": "boolean"},
                    "cluster": {"type": "boolean"},
                },
                "required": RESOURCE_FIELDS,
            },
        },
    })
}

fn property(field: &str) -> Value {
    match field {
        "name" => json!({"type": "string"}),
        "description" | "license" => json!({"type": ["string", "null"]}),
        "website" | "repository" => json!({"anyOf": [web_url(), {"type": "null"}]}),
        "references" => json!({"type": "array", "items": web_url()}),
        "institutions" | "programming_languages" | "ml_libraries" => {
            json!({"type": "array", "items": {"type": "string"}})
        }
        "domains" => tag_list::<Domain>(),
        "techniques" => tag_list::<Technique>(),
        "tasks" => tag_list::<Task>(),
        "search_strategies" => tag_list::<SearchStrategy>(),
        "meta_learning" => tag_list::<MetaLearningKind>(),
        "search_space" => json!({"$ref": "#/definitions/SearchSpace"}),
        "computational_resources" => json!({"$ref": "#/definitions/ComputationalResources"}),
        _ => json!({"type": "boolean"}),
    }
}

fn web_url() -> Value {
    json!({
        "type": "string",
        "format": "uri",
        "pattern": "^https?://",
        "minLength": 1,
        "maxLength": MAX_URL_LEN,
    })
}

fn tag_list<C: Category>() -> Value {
    json!({
        "type": "array",
        "items": {"type": "string", "enum": C::names()},
    })
}
