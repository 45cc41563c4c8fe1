//! Shared types, error model, and configuration for the AutoML catalog.
//!
//! This crate is the foundation depended on by all other catalog crates.
//! It provides:
//! - The unified error type [`CatalogError`]
//! - The tag registry ([`Domain`], [`SearchStrategy`], [`PipelineShape`], ...)
//! - Record types ([`CatalogEntry`], [`SearchSpace`], [`WebUrl`])
//! - The [`RecordSource`] and [`Renderer`] seams
//! - Configuration ([`AppConfig`], [`CatalogConfig`], config loading)

pub mod config;
pub mod error;
pub mod registry;
pub mod render;
pub mod source;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, CatalogConfig, PathsConfig, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{CatalogError, Result};
pub use registry::{
    Category, Domain, HyperparameterKind, MetaLearningKind, PipelineShape, SearchStrategy, Task,
    Technique,
};
pub use render::{EntryView, GithubRepo, Renderer, Template};
pub use source::{RawRecord, RecordSource};
pub use types::{CatalogEntry, ComputationalResources, MAX_URL_LEN, SearchSpace, UrlError, WebUrl};
