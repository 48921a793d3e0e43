//! In-memory layout graph.
//!
//! The [`Layout`] is an arena: it owns every entity, grouped per kind, and
//! relations are stored as [`EntityRef`] handles into the same arena. This
//! keeps bidirectional relations free of ownership cycles and makes the
//! persisted form a plain id projection.

mod entity;
pub mod relation;
mod view;

pub use entity::{Entity, EntityKey};
pub use relation::RelationError;
pub use view::EntityView;

use crate::{codec::Generator, value::Value};
use prodspec_schema::types::{EntityKind, Primitive};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU32, Ordering},
};
use thiserror::Error as ThisError;

pub(crate) use entity::Slot;

static NEXT_STORE: AtomicU32 = AtomicU32::new(1);

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("{key} already exists")]
    DuplicateId { key: EntityKey },

    #[error("{kind} id must not be empty")]
    InvalidId { kind: EntityKind },

    #[error("{key} not found")]
    NotFound { key: EntityKey },

    #[error("{kind} has no field '{field}'")]
    UnknownField { kind: EntityKind, field: String },

    #[error("{key}: field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        key: EntityKey,
        field: String,
        expected: Primitive,
        found: Primitive,
    },

    #[error("{kind} handle does not belong to this layout")]
    ForeignHandle { kind: EntityKind },
}

///
/// EntityRef
///
/// Copyable handle to an entity. Handles carry the identity of the layout
/// that issued them and are only accepted by that layout.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityRef {
    store: u32,
    kind: EntityKind,
    index: u32,
}

impl EntityRef {
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        self.kind
    }

    const fn slot(self) -> usize {
        self.index as usize
    }
}

///
/// KindStore
/// Entities of one kind, in insertion order, plus an id index.
///

#[derive(Debug, Default)]
struct KindStore {
    entities: Vec<Entity>,
    index: HashMap<String, u32>,
}

///
/// Layout
///

#[derive(Debug)]
pub struct Layout {
    store: u32,
    kinds: [KindStore; EntityKind::ALL.len()],
    generator: Option<Generator>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: NEXT_STORE.fetch_add(1, Ordering::Relaxed),
            kinds: std::array::from_fn(|_| KindStore::default()),
            generator: None,
        }
    }

    /// Create and register a new entity.
    ///
    /// Fails without touching the layout if `(kind, id)` already exists.
    pub fn create(
        &mut self,
        kind: EntityKind,
        id: impl Into<String>,
    ) -> Result<EntityRef, StoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(StoreError::InvalidId { kind });
        }

        let store = &mut self.kinds[kind.index()];
        if store.index.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                key: EntityKey::new(kind, id),
            });
        }

        let index =
            u32::try_from(store.entities.len()).map_err(|_| StoreError::InvalidId { kind })?;
        store.index.insert(id.clone(), index);
        store.entities.push(Entity::new(kind, id));

        Ok(EntityRef {
            store: self.store,
            kind,
            index,
        })
    }

    /// Look up an entity handle by `(kind, id)`.
    #[must_use]
    pub fn find(&self, kind: EntityKind, id: &str) -> Option<EntityRef> {
        self.kinds[kind.index()]
            .index
            .get(id)
            .map(|&index| EntityRef {
                store: self.store,
                kind,
                index,
            })
    }

    /// Like [`Self::find`], failing with `NotFound`.
    pub fn get(&self, kind: EntityKind, id: &str) -> Result<EntityRef, StoreError> {
        self.find(kind, id).ok_or_else(|| StoreError::NotFound {
            key: EntityKey::new(kind, id),
        })
    }

    /// Handles of every entity of `kind`, in insertion order.
    pub fn all(&self, kind: EntityKind) -> impl ExactSizeIterator<Item = EntityRef> + '_ {
        let store = self.store;
        // `create` keeps every index within u32
        let len = u32::try_from(self.len(kind)).unwrap_or(u32::MAX);
        (0..len).map(move |index| EntityRef { store, kind, index })
    }

    /// Read-only views of every entity of `kind`, in insertion order.
    pub fn views(&self, kind: EntityKind) -> impl Iterator<Item = EntityView<'_>> {
        self.all(kind).map(|handle| self.view_unchecked(handle))
    }

    /// Number of entities of `kind`.
    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.kinds[kind.index()].entities.len()
    }

    /// Total number of entities across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.kinds.iter().map(|k| k.entities.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Borrow an entity; `None` for handles issued by another layout.
    #[must_use]
    pub fn entity(&self, handle: EntityRef) -> Option<&Entity> {
        if handle.store != self.store {
            return None;
        }

        self.kinds[handle.kind.index()].entities.get(handle.slot())
    }

    /// Read-only view of an entity; `None` for handles issued by another layout.
    #[must_use]
    pub fn view(&self, handle: EntityRef) -> Option<EntityView<'_>> {
        self.entity(handle)
            .map(|entity| EntityView::new(self, handle, entity))
    }

    /// Set a scalar attribute. Setting a field's default value clears it.
    pub fn set_attr(
        &mut self,
        handle: EntityRef,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), StoreError> {
        let value = value.into();
        self.check(handle)?;

        let (_, model) = handle
            .kind
            .model()
            .field(field)
            .ok_or_else(|| StoreError::UnknownField {
                kind: handle.kind,
                field: field.to_string(),
            })?;

        let entity = self.entity_mut(handle);
        if value.primitive() != model.primitive {
            return Err(StoreError::TypeMismatch {
                key: entity.key(),
                field: field.to_string(),
                expected: model.primitive,
                found: value.primitive(),
            });
        }

        entity.put_attr(model.name, value);

        Ok(())
    }

    /// Read a scalar attribute, returning the field default when unset.
    pub fn attr(&self, handle: EntityRef, field: &str) -> Result<Value, StoreError> {
        let entity = self
            .entity(handle)
            .ok_or(StoreError::ForeignHandle { kind: handle.kind })?;

        entity_attr(entity, field)
    }

    /// Generator identity read from the persisted form, if any.
    #[must_use]
    pub const fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
    }

    pub(crate) fn set_generator(&mut self, generator: Generator) {
        self.generator = Some(generator);
    }

    // Reject handles from other layouts before any mutation.
    pub(crate) fn check(&self, handle: EntityRef) -> Result<(), StoreError> {
        if self.entity(handle).is_some() {
            Ok(())
        } else {
            Err(StoreError::ForeignHandle { kind: handle.kind })
        }
    }

    // Callers must have passed the handle through `check`, or obtained it
    // from this layout's own slots.
    pub(crate) fn entity_unchecked(&self, handle: EntityRef) -> &Entity {
        &self.kinds[handle.kind.index()].entities[handle.slot()]
    }

    pub(crate) fn entity_mut(&mut self, handle: EntityRef) -> &mut Entity {
        &mut self.kinds[handle.kind.index()].entities[handle.slot()]
    }

    pub(crate) fn view_unchecked(&self, handle: EntityRef) -> EntityView<'_> {
        EntityView::new(self, handle, self.entity_unchecked(handle))
    }
}

// Shared attribute read for layouts and views.
pub(crate) fn entity_attr(entity: &Entity, field: &str) -> Result<Value, StoreError> {
    let (_, model) = entity
        .kind()
        .model()
        .field(field)
        .ok_or_else(|| StoreError::UnknownField {
            kind: entity.kind(),
            field: field.to_string(),
        })?;

    Ok(entity
        .attr(model.name)
        .cloned()
        .unwrap_or_else(|| Value::default_for(model.primitive)))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_ids_in_insertion_order() {
        let mut layout = Layout::new();
        layout.create(EntityKind::As, "112").unwrap();
        layout.create(EntityKind::As, "110").unwrap();
        layout.create(EntityKind::Isd, "1").unwrap();

        let ids: Vec<_> = layout
            .views(EntityKind::As)
            .map(|v| v.id().to_string())
            .collect();
        assert_eq!(ids, ["112", "110"]);
        assert_eq!(layout.len(EntityKind::Isd), 1);
        assert_eq!(layout.total(), 3);
    }

    #[test]
    fn duplicate_create_fails_and_leaves_store_unchanged() {
        let mut layout = Layout::new();
        let first = layout.create(EntityKind::Br, "110/br1").unwrap();
        layout.set_attr(first, "Name", "br1-110-br1").unwrap();

        let err = layout.create(EntityKind::Br, "110/br1").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));
        assert_eq!(err.to_string(), "BR '110/br1' already exists");

        assert_eq!(layout.len(EntityKind::Br), 1);
        assert_eq!(
            layout.attr(first, "Name").unwrap(),
            Value::from("br1-110-br1")
        );
    }

    #[test]
    fn same_id_is_allowed_across_kinds() {
        let mut layout = Layout::new();
        layout.create(EntityKind::As, "1").unwrap();
        layout.create(EntityKind::Isd, "1").unwrap();
        assert!(layout.find(EntityKind::Isd, "1").is_some());
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut layout = Layout::new();
        assert!(matches!(
            layout.create(EntityKind::Host, ""),
            Err(StoreError::InvalidId { .. })
        ));
    }

    #[test]
    fn get_reports_missing_entities() {
        let layout = Layout::new();
        let err = layout.get(EntityKind::Site, "zrh").unwrap_err();
        assert_eq!(err.to_string(), "Site 'zrh' not found");
    }

    #[test]
    fn attributes_are_typed_and_default_when_unset() {
        let mut layout = Layout::new();
        let asys = layout.create(EntityKind::As, "110").unwrap();

        assert_eq!(layout.attr(asys, "MTU").unwrap(), Value::Int(0));
        layout.set_attr(asys, "MTU", 1472_i64).unwrap();
        layout.set_attr(asys, "Core", true).unwrap();
        assert_eq!(layout.attr(asys, "MTU").unwrap(), Value::Int(1472));

        let err = layout.set_attr(asys, "MTU", "big").unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));

        let err = layout.set_attr(asys, "Colour", "blue").unwrap_err();
        assert!(matches!(err, StoreError::UnknownField { .. }));

        // relations are not scalar fields
        assert!(layout.set_attr(asys, "ISD", "1").is_err());
    }

    #[test]
    fn setting_default_clears_the_attribute() {
        let mut layout = Layout::new();
        let asys = layout.create(EntityKind::As, "110").unwrap();
        layout.set_attr(asys, "Core", true).unwrap();
        layout.set_attr(asys, "Core", false).unwrap();

        let entity = layout.entity(asys).unwrap();
        assert_eq!(entity.attrs().count(), 0);
    }

    #[test]
    fn handles_from_other_layouts_are_rejected() {
        let mut a = Layout::new();
        let mut b = Layout::new();
        let foreign = a.create(EntityKind::As, "110").unwrap();
        b.create(EntityKind::As, "110").unwrap();

        assert!(b.entity(foreign).is_none());
        assert!(matches!(
            b.set_attr(foreign, "MTU", 1472_i64),
            Err(StoreError::ForeignHandle { .. })
        ));
    }
}
