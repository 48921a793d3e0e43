use crate::types::{Cardinality, EntityKind};

///
/// RelationModel
///
/// Relation slot from the declaring kind toward `target`. The slot named
/// `inverse` on the target kind holds the other side of every edge.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationModel {
    /// Persisted key of the slot.
    pub name: &'static str,
    pub target: EntityKind,
    pub cardinality: Cardinality,
    pub inverse: &'static str,
}

impl RelationModel {
    /// Singular slot; at most one linked entity.
    #[must_use]
    pub const fn one(name: &'static str, target: EntityKind, inverse: &'static str) -> Self {
        Self {
            name,
            target,
            cardinality: Cardinality::One,
            inverse,
        }
    }

    /// Plural slot; insertion ordered and duplicate free.
    #[must_use]
    pub const fn many(name: &'static str, target: EntityKind, inverse: &'static str) -> Self {
        Self {
            name,
            target,
            cardinality: Cardinality::Many,
            inverse,
        }
    }

    #[must_use]
    pub const fn is_many(&self) -> bool {
        self.cardinality.is_many()
    }

    /// Resolve the inverse slot on the target kind.
    ///
    /// Returns the slot position together with its model; `None` only for a
    /// schema table that fails validation.
    #[must_use]
    pub fn inverse_slot(&self) -> Option<(usize, &'static Self)> {
        self.target.model().relation(self.inverse)
    }
}
