//! Validation engine and document compiler for the AutoML catalog.
//!
//! Ties together record discovery, validation, partitioning, and document
//! writing into end-to-end runs (e.g., `compile_catalog`).

pub mod assembler;
pub mod compiler;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod validate;

#[cfg(test)]
mod testing;
