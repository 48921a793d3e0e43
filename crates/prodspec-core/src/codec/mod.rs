//! Persisted layout form.
//!
//! A layout file is one TOML table per kind, one sub-table per entity id.
//! Scalars are stored under their field name, singular relations as the
//! target id and plural relations as an ordered array of target ids.
//!
//! ```toml
//! Generator = "prodspec"
//!
//! [AS.110]
//! ISD = ["1"]
//! MTU = 1472
//!
//! [ISD.1]
//! AS = ["110"]
//! ```

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

use crate::graph::{RelationError, StoreError};
use thiserror::Error as ThisError;

///
/// Generator
/// Identity of the tool that wrote a layout file.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Generator {
    pub name: String,
    pub version: String,
    pub build_chain: String,
}

impl Generator {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        build_chain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            build_chain: build_chain.into(),
        }
    }
}

///
/// CodecError
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("layout is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("layout could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unrecognized key '{path}'")]
    UnrecognizedField { path: String },

    #[error("'{path}' expects {expected}, got {found}")]
    InvalidValue {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Schema(#[from] prodspec_schema::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Relation(#[from] RelationError),
}
