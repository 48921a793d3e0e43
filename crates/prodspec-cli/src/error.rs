use prodspec_build::BuildError;
use prodspec_config::ConfigError;
use prodspec_core::{ErrorKind, gate::GateError, graph::RelationError};
use prodspec_topology::TopologyError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("{what} is not configured; pass {flag} or set it in {}", config.display())]
    NotConfigured {
        what: &'static str,
        flag: &'static str,
        config: PathBuf,
    },

    #[error("no {kind} with id '{id}'")]
    NotFound { kind: String, id: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Core(#[from] prodspec_core::Error),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl CliError {
    /// Core taxonomy of the underlying failure, if it came from the core.
    #[must_use]
    pub const fn core_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Core(e) => Some(e.kind()),
            Self::Build(e) => e.core_kind(),
            Self::Topology(TopologyError::Core(e)) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<GateError> for CliError {
    fn from(e: GateError) -> Self {
        Self::Core(e.into())
    }
}

impl From<RelationError> for CliError {
    fn from(e: RelationError) -> Self {
        Self::Core(e.into())
    }
}

pub type CliResult<T> = Result<T, CliError>;
