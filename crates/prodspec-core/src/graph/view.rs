use crate::{
    graph::{Entity, EntityKey, EntityRef, Layout, RelationError, StoreError, entity_attr},
    value::Value,
};
use prodspec_schema::types::EntityKind;

///
/// EntityView
///
/// Borrowed, read-only view of one entity. Views can walk relations without
/// going back through the layout, which keeps validators and projections
/// free of handle bookkeeping.
///

#[derive(Clone, Copy)]
pub struct EntityView<'a> {
    layout: &'a Layout,
    handle: EntityRef,
    entity: &'a Entity,
}

impl<'a> EntityView<'a> {
    pub(crate) const fn new(layout: &'a Layout, handle: EntityRef, entity: &'a Entity) -> Self {
        Self {
            layout,
            handle,
            entity,
        }
    }

    #[must_use]
    pub const fn handle(&self) -> EntityRef {
        self.handle
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.entity.kind()
    }

    #[must_use]
    pub fn id(&self) -> &'a str {
        self.entity.id()
    }

    #[must_use]
    pub fn key(&self) -> EntityKey {
        self.entity.key()
    }

    #[must_use]
    pub const fn entity(&self) -> &'a Entity {
        self.entity
    }

    #[must_use]
    pub const fn layout(&self) -> &'a Layout {
        self.layout
    }

    /// Attribute value, or the field default when unset.
    pub fn attr(&self, field: &str) -> Result<Value, StoreError> {
        entity_attr(self.entity, field)
    }

    /// Text attribute; empty when unset or not a text field.
    #[must_use]
    pub fn text(&self, field: &str) -> &'a str {
        self.entity
            .attr(field)
            .and_then(Value::as_text)
            .unwrap_or_default()
    }

    /// Integer attribute; zero when unset or not an integer field.
    #[must_use]
    pub fn int(&self, field: &str) -> i64 {
        self.entity
            .attr(field)
            .and_then(Value::as_int)
            .unwrap_or_default()
    }

    /// Boolean attribute; false when unset or not a boolean field.
    #[must_use]
    pub fn flag(&self, field: &str) -> bool {
        self.entity
            .attr(field)
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }

    /// Target of a relation slot, if linked.
    pub fn one(&self, relation: &str) -> Result<Option<Self>, RelationError> {
        let refs = self.layout.related(self.handle, relation)?;

        Ok(refs.first().map(|r| self.layout.view_unchecked(*r)))
    }

    /// Targets of a relation slot, in slot order.
    pub fn many(
        self,
        relation: &str,
    ) -> Result<impl ExactSizeIterator<Item = Self> + use<'a>, RelationError> {
        let layout = self.layout;
        let refs = layout.related(self.handle, relation)?;

        Ok(refs.iter().map(move |r| layout.view_unchecked(*r)))
    }
}

impl std::fmt::Debug for EntityView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityView")
            .field("kind", &self.kind())
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
