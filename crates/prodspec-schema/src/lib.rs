//! Declarative schema for the deployment layout graph.
//!
//! The schema is a static table: one [`EntityModel`](node::EntityModel) per
//! [`EntityKind`](types::EntityKind), each listing its scalar fields and its
//! relation slots together with their cardinality and inverse slot. Everything
//! the runtime does per kind (factories, linking, encoding) is driven by this
//! table instead of per-kind code.

pub mod build;
pub mod entities;
pub mod error;
pub mod node;
pub mod types;
pub mod validate;

/// Maximum length for field and relation identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Persisted top-level key holding the generator name.
pub const META_GENERATOR: &str = "Generator";

/// Persisted top-level key holding the generator version.
pub const META_GENERATOR_VERSION: &str = "GeneratorVersion";

/// Persisted top-level key holding the generator build chain.
pub const META_GENERATOR_BUILD_CHAIN: &str = "GeneratorBuildChain";

use crate::build::BuildError;
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),
}
