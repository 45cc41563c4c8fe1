//! Record builders shared by the unit tests.

use proptest::prelude::*;
use proptest::sample::subsequence;
use serde_json::{Value, json};

use automl_catalog_shared::{
    Category, Domain, HyperparameterKind, MetaLearningKind, PipelineShape, RawRecord,
    SearchStrategy, Task, Technique,
};

/// A record with every schema field set to a valid, non-null value.
pub(crate) fn full_record(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "website": "https://automl.github.io/auto-sklearn",
        "open_source": true,
        "institutions": ["University of Freiburg"],
        "repository": "https://github.com/automl/auto-sklearn",
        "license": "BSD-3-Clause",
        "references": [
            "https://papers.nips.cc/paper/5872",
            "https://arxiv.org/abs/2007.04074"
        ],
        "cli": true,
        "gui": false,
        "http": false,
        "library": true,
        "programming_languages": ["python"],
        "domains": ["tabular"],
        "multi_domain": false,
        "techniques": ["trees", "ensembles"],
        "ml_libraries": ["scikit-learn"],
        "multi_task": false,
        "tasks": ["classification", "regression"],
        "distillation": false,
        "search_strategies": ["bayesian"],
        "search_space": {
            "hierarchical": true,
            "probabilistic": false,
            "differentiable": false,
            "automatic": false,
            "robust": true,
            "hyperparameters": ["continuous", "conditional"],
            "pipelines": ["fixed"]
        },
        "meta_learning": ["warm_start"],
        "extensible": true,
        "accessible": true,
        "portable": false,
        "computational_resources": {
            "gpu": false,
            "tpu": false,
            "cluster": true
        }
    })
}

/// [`full_record`] with some top-level fields replaced.
pub(crate) fn record_with(overrides: &[(&str, Value)]) -> Value {
    let mut record = full_record("Example");
    if let Some(map) = record.as_object_mut() {
        for (field, value) in overrides {
            map.insert((*field).to_string(), value.clone());
        }
    }
    record
}

/// A raw record named `name` using the given strategies, stored at
/// `<key>.yml`.
pub(crate) fn raw_with_strategies(key: &str, name: &str, strategies: &[&str]) -> RawRecord {
    let mut value = full_record(name);
    value["search_strategies"] = json!(strategies);
    RawRecord::from_origin(format!("{key}.yml"), value)
}

/// Boolean fields of a record, as JSON pointers.
const FLAG_POINTERS: &[&str] = &[
    "/open_source",
    "/cli",
    "/gui",
    "/http",
    "/library",
    "/multi_domain",
    "/multi_task",
    "/distillation",
    "/extensible",
    "/accessible",
    "/portable",
    "/search_space/hierarchical",
    "/search_space/probabilistic",
    "/search_space/differentiable",
    "/search_space/automatic",
    "/search_space/robust",
    "/computational_resources/gpu",
    "/computational_resources/tpu",
    "/computational_resources/cluster",
];

/// Any subset of family `C`, in declaration order, as record spellings.
pub(crate) fn tag_subset<C: Category>() -> impl Strategy<Value = Value> {
    let names = C::names();
    let len = names.len();
    subsequence(names, 0..=len).prop_map(|tags| json!(tags))
}

/// Valid records with arbitrary names, tag lists, and flags.
pub(crate) fn arb_record() -> impl Strategy<Value = Value> {
    let tags = (
        tag_subset::<Domain>(),
        tag_subset::<Technique>(),
        tag_subset::<Task>(),
        tag_subset::<SearchStrategy>(),
        tag_subset::<MetaLearningKind>(),
        tag_subset::<HyperparameterKind>(),
        tag_subset::<PipelineShape>(),
    );
    let flags = proptest::collection::vec(any::<bool>(), FLAG_POINTERS.len());

    ("[A-Za-z][A-Za-z0-9 .-]{0,15}", tags, flags).prop_map(
        |(name, (domains, techniques, tasks, strategies, meta, hyperparameters, pipelines), flags)| {
            let mut record = full_record(&name);
            record["domains"] = domains;
            record["techniques"] = techniques;
            record["tasks"] = tasks;
            record["search_strategies"] = strategies;
            record["meta_learning"] = meta;
            record["search_space"]["hyperparameters"] = hyperparameters;
            record["search_space"]["pipelines"] = pipelines;
            for (pointer, flag) in FLAG_POINTERS.iter().zip(flags) {
                if let Some(slot) = record.pointer_mut(pointer) {
                    *slot = json!(flag);
                }
            }
            record
        },
    )
}

/// Raw records keyed `k0`, `k1`, ... in generation order.
pub(crate) fn arb_source(max: usize) -> impl Strategy<Value = Vec<RawRecord>> {
    proptest::collection::vec(arb_record(), 0..=max).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| RawRecord::from_origin(format!("k{i}.yml"), value))
            .collect()
    })
}
