use crate::{graph::EntityRef, value::Value};
use prodspec_schema::{node::RelationModel, types::EntityKind};
use std::{collections::BTreeMap, fmt};

///
/// EntityKey
/// Stable `(kind, id)` identity used in diagnostics and the persisted form.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.id)
    }
}

///
/// Slot
/// Storage for one relation slot; the variant follows the slot's cardinality.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Slot {
    One(Option<EntityRef>),
    Many(Vec<EntityRef>),
}

impl Slot {
    pub(crate) const fn for_relation(rel: &RelationModel) -> Self {
        if rel.is_many() {
            Self::Many(Vec::new())
        } else {
            Self::One(None)
        }
    }

    pub(crate) fn refs(&self) -> &[EntityRef] {
        match self {
            Self::One(r) => r.as_slice(),
            Self::Many(refs) => refs,
        }
    }

    pub(crate) fn contains(&self, target: EntityRef) -> bool {
        self.refs().contains(&target)
    }
}

///
/// Entity
///
/// One record of the layout graph. Entities are owned by their
/// [`Layout`](crate::graph::Layout); relation slots hold handles into the
/// same layout.
///

#[derive(Clone, Debug)]
pub struct Entity {
    kind: EntityKind,
    id: String,
    attrs: BTreeMap<&'static str, Value>,
    slots: Vec<Slot>,
}

impl Entity {
    pub(crate) fn new(kind: EntityKind, id: String) -> Self {
        let slots = kind
            .model()
            .relations
            .iter()
            .map(Slot::for_relation)
            .collect();

        Self {
            kind,
            id,
            attrs: BTreeMap::new(),
            slots,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind, self.id.clone())
    }

    /// Attributes holding a non-default value, in key order.
    pub fn attrs(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.attrs.iter().map(|(k, v)| (*k, v))
    }

    /// Raw attribute lookup; `None` means unset (default).
    #[must_use]
    pub fn attr(&self, field: &str) -> Option<&Value> {
        self.attrs.get(field)
    }

    pub(crate) fn put_attr(&mut self, field: &'static str, value: Value) {
        if value.is_default() {
            self.attrs.remove(field);
        } else {
            self.attrs.insert(field, value);
        }
    }

    pub(crate) fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }

    /// Relation models paired with their slot contents, in schema order.
    pub(crate) fn relations(&self) -> impl Iterator<Item = (&'static RelationModel, &[EntityRef])> {
        self.kind
            .model()
            .relations
            .iter()
            .zip(&self.slots)
            .map(|(rel, slot)| (rel, slot.refs()))
    }
}
