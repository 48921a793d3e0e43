//! Input documents for the builder.
//!
//! Keys are lower case, as written by operators for the original generator.
//! Maps are ordered, so iteration (and therefore the build) is deterministic.

use serde::{Deserialize, de::IgnoredAny};
use std::collections::BTreeMap;

/// ISD number to ISD description, as read from `isd.yml`.
pub type Isds = BTreeMap<u16, IsdInput>;

///
/// IsdInput
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct IsdInput {
    pub name: String,
}

///
/// OrganizationInput
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationInput {
    pub name: String,
    pub shortname: String,
    pub sites: BTreeMap<String, SiteInput>,
    pub ases: BTreeMap<String, AsInput>,
}

///
/// SiteInput
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteInput {
    pub location: String,
    pub hosts: BTreeMap<String, HostInput>,
}

///
/// HostInput
///
/// Interface attributes stay loosely typed here; they are matched against
/// the schema while building.
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HostInput {
    pub machinetype: i64,
    pub serialnumber: String,
    pub interfaces: BTreeMap<String, BTreeMap<String, serde_yaml::Value>>,
}

///
/// AsInput
/// Service roles are keyed by name; their bodies carry nothing the layout keeps.
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AsInput {
    pub isds: Vec<u16>,
    pub core: bool,
    pub mtu: i64,
    pub br: BTreeMap<String, IgnoredAny>,
    pub bs: BTreeMap<String, IgnoredAny>,
    pub cs: BTreeMap<String, IgnoredAny>,
    pub ps: BTreeMap<String, IgnoredAny>,
    pub sig: BTreeMap<String, IgnoredAny>,
}

///
/// TESTS
///
