//! Layout builder: reads organization and ISD documents and assembles a
//! [`Layout`](prodspec_core::graph::Layout) through the core's factory and
//! linker operations.

mod builder;
pub mod input;

pub use builder::Builder;

use prodspec_core::{
    ErrorKind,
    graph::{RelationError, StoreError},
};
use serde::de::DeserializeOwned;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("AS '{as_id}' references unknown ISD {isd}")]
    UnknownIsd { as_id: String, isd: u16 },

    #[error("AS '{as_id}' lists no ISD")]
    MissingIsd { as_id: String },

    #[error("Interface '{interface}': unknown attribute '{attribute}'")]
    UnknownAttribute { interface: String, attribute: String },

    #[error("Interface '{interface}': attribute '{attribute}' must be a scalar")]
    InvalidAttribute { interface: String, attribute: String },

    #[error(transparent)]
    Core(#[from] prodspec_core::Error),
}

impl BuildError {
    /// Core taxonomy of a wrapped core error.
    #[must_use]
    pub const fn core_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Core(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<StoreError> for BuildError {
    fn from(e: StoreError) -> Self {
        Self::Core(e.into())
    }
}

impl From<RelationError> for BuildError {
    fn from(e: RelationError) -> Self {
        Self::Core(e.into())
    }
}

/// Read an `isd.yml` document.
pub fn load_isds(path: impl AsRef<Path>) -> Result<input::Isds, BuildError> {
    load(path.as_ref())
}

/// Read an organization document.
pub fn load_organization(path: impl AsRef<Path>) -> Result<input::OrganizationInput, BuildError> {
    load(path.as_ref())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, BuildError> {
    let text = fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "read build input");

    serde_yaml::from_str(&text).map_err(|source| BuildError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
