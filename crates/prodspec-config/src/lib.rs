//! Workspace configuration for the prodspec tools.
//!
//! Read from `prodspec-config.toml`. Every key is optional and unknown keys
//! are rejected. Relative paths are taken as given; callers resolve them
//! against their working directory.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Conventional configuration file name.
pub const CONFIG_FILE: &str = "prodspec-config.toml";

/// Layout file used when none is configured.
pub const DEFAULT_LAYOUT: &str = "prodspec.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
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
        source: toml::de::Error,
    },
}

///
/// Config
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Persisted layout file.
    pub layout: PathBuf,

    /// Validation marker; a sibling of the layout file when unset.
    pub marker: Option<PathBuf>,

    pub input: InputConfig,
    pub topology: TopologyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: PathBuf::from(DEFAULT_LAYOUT),
            marker: None,
            input: InputConfig::default(),
            topology: TopologyConfig::default(),
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

///
/// InputConfig
/// Builder inputs.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub isd: Option<PathBuf>,
    pub organization: Option<PathBuf>,
    pub host_domain: Option<String>,
}

///
/// TopologyConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TopologyConfig {
    pub out_dir: PathBuf,
    pub overlay: Option<String>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            overlay: None,
        }
    }
}

///
/// TESTS
///
