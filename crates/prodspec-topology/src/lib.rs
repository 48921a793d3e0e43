//! Per-AS topology projection.
//!
//! Every AS of a validated layout becomes one `topology.json` under
//! `ISD<isd>/AS<as>/`, where `<isd>` is the first ISD the AS belongs to and
//! `:` in the AS id is replaced by `_`.

use prodspec_core::{
    gate::ValidatedLayout,
    graph::{EntityKey, EntityView, Layout, RelationError},
};
use prodspec_schema::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Overlay written when none is configured.
pub const DEFAULT_OVERLAY: &str = "UDP/IPv4";

/// File name of each projected topology.
pub const TOPOLOGY_FILE: &str = "topology.json";

///
/// TopologyError
///

#[derive(Debug, ThisError)]
pub enum TopologyError {
    #[error("AS '{as_id}' belongs to no ISD")]
    NoIsd { as_id: String },

    #[error("{key} has no Name")]
    UnnamedService { key: EntityKey },

    #[error("AS '{as_id}': {kind} Name '{name}' is used more than once")]
    DuplicateService {
        as_id: String,
        kind: EntityKind,
        name: String,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("topology could not be serialized: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] prodspec_core::Error),
}

impl From<RelationError> for TopologyError {
    fn from(e: RelationError) -> Self {
        Self::Core(e.into())
    }
}

///
/// ServiceInfo
/// Placeholder entry; addresses are filled in by later deployment stages.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ServiceInfo {}

///
/// Topology
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Topology {
    #[serde(rename = "Core")]
    pub core: bool,

    #[serde(rename = "Overlay")]
    pub overlay: String,

    #[serde(rename = "ISD_AS")]
    pub isd_as: String,

    #[serde(rename = "MTU")]
    pub mtu: i64,

    #[serde(rename = "BorderRouters")]
    pub border_routers: BTreeMap<String, ServiceInfo>,

    #[serde(rename = "BeaconService")]
    pub beacon_service: BTreeMap<String, ServiceInfo>,

    #[serde(rename = "CertificateService")]
    pub certificate_service: BTreeMap<String, ServiceInfo>,

    #[serde(rename = "PathService")]
    pub path_service: BTreeMap<String, ServiceInfo>,

    #[serde(rename = "SIG")]
    pub sig: BTreeMap<String, ServiceInfo>,
}

///
/// AsTopology
/// One projected AS with its directory relative to the output root.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AsTopology {
    pub dir: PathBuf,
    pub topology: Topology,
}

///
/// Options
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    pub overlay: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            overlay: DEFAULT_OVERLAY.to_string(),
        }
    }
}

/// Project every AS, in layout order. Pure; nothing is written.
///
/// Service names become map keys, so an empty or repeated `Name` within one
/// AS is an error rather than a silently merged entry.
pub fn project(layout: &Layout, options: &Options) -> Result<Vec<AsTopology>, TopologyError> {
    layout
        .views(EntityKind::As)
        .map(|asys| project_as(asys, options))
        .collect()
}

/// Write one `topology.json` per AS below `out_dir` and return the paths.
pub fn generate(
    layout: &ValidatedLayout,
    out_dir: &Path,
    options: &Options,
) -> Result<Vec<PathBuf>, TopologyError> {
    let mut written = Vec::new();

    for entry in project(layout, options)? {
        let dir = out_dir.join(&entry.dir);
        fs::create_dir_all(&dir).map_err(|source| TopologyError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(TOPOLOGY_FILE);
        let json = serde_json::to_string_pretty(&entry.topology)?;
        fs::write(&path, json).map_err(|source| TopologyError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "wrote topology");
        written.push(path);
    }

    tracing::info!(
        out_dir = %out_dir.display(),
        files = written.len(),
        fingerprint = %layout.fingerprint(),
        "generated topologies"
    );

    Ok(written)
}

fn project_as(asys: EntityView<'_>, options: &Options) -> Result<AsTopology, TopologyError> {
    // the first ISD is authoritative when an AS sits in several
    let isd = asys.many("ISD")?.next().ok_or_else(|| TopologyError::NoIsd {
        as_id: asys.id().to_string(),
    })?;

    let dir = Path::new(&format!("ISD{}", isd.id()))
        .join(format!("AS{}", asys.id().replace(':', "_")));

    let topology = Topology {
        core: asys.flag("Core"),
        overlay: options.overlay.clone(),
        isd_as: format!("{}-{}", isd.id(), asys.id()),
        mtu: asys.int("MTU"),
        border_routers: services(asys, EntityKind::Br)?,
        beacon_service: services(asys, EntityKind::Bs)?,
        certificate_service: services(asys, EntityKind::Cs)?,
        path_service: services(asys, EntityKind::Ps)?,
        sig: services(asys, EntityKind::Sig)?,
    };

    Ok(AsTopology { dir, topology })
}

// Service entries keyed by their `Name`; names must be present and unique.
fn services(
    asys: EntityView<'_>,
    kind: EntityKind,
) -> Result<BTreeMap<String, ServiceInfo>, TopologyError> {
    let mut entries = BTreeMap::new();

    for service in asys.many(kind.as_str())? {
        let name = service.text("Name");
        if name.is_empty() {
            return Err(TopologyError::UnnamedService { key: service.key() });
        }
        if entries.insert(name.to_string(), ServiceInfo::default()).is_some() {
            return Err(TopologyError::DuplicateService {
                as_id: asys.id().to_string(),
                kind,
                name: name.to_string(),
            });
        }
    }

    Ok(entries)
}

///
/// TESTS
///
