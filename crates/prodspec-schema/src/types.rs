use crate::{entities::ENTITIES, node::EntityModel};
use derive_more::Display;
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Cardinality {
    One,
    Many,
}

impl Cardinality {
    #[must_use]
    pub const fn is_many(self) -> bool {
        matches!(self, Self::Many)
    }
}

///
/// Primitive
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum Primitive {
    Bool,
    Int,
    Text,
}

///
/// ParseKindError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown entity kind '{0}'")]
pub struct ParseKindError(pub String);

///
/// EntityKind
///
/// The closed set of record kinds in a layout. The persisted name of each
/// kind is the top-level table name in the layout file.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[remain::sorted]
pub enum EntityKind {
    As,
    Br,
    Bs,
    Cs,
    Host,
    Interface,
    Isd,
    Organization,
    Ps,
    Sig,
    Site,
}

impl EntityKind {
    /// Every kind, in schema-table order.
    pub const ALL: [Self; 11] = [
        Self::As,
        Self::Br,
        Self::Bs,
        Self::Cs,
        Self::Host,
        Self::Interface,
        Self::Isd,
        Self::Organization,
        Self::Ps,
        Self::Sig,
        Self::Site,
    ];

    /// Service roles hosted inside an AS.
    pub const SERVICES: [Self; 5] = [Self::Br, Self::Bs, Self::Cs, Self::Ps, Self::Sig];

    /// Persisted name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::As => "AS",
            Self::Br => "BR",
            Self::Bs => "BS",
            Self::Cs => "CS",
            Self::Host => "Host",
            Self::Interface => "Interface",
            Self::Isd => "ISD",
            Self::Organization => "Organization",
            Self::Ps => "PS",
            Self::Sig => "SIG",
            Self::Site => "Site",
        }
    }

    /// Position of this kind in [`Self::ALL`] and in the schema table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Schema entry describing this kind.
    #[must_use]
    pub fn model(self) -> &'static EntityModel {
        &ENTITIES[self.index()]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

///
/// TESTS
///
