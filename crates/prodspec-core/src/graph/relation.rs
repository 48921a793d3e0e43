//! Relation linker.
//!
//! Every mutation resolves both sides of the edge from the schema, checks
//! both sides, and only then writes both sides. A failed call leaves the
//! layout exactly as it was.

use crate::graph::{EntityKey, EntityRef, Layout, Slot, StoreError};
use prodspec_schema::{
    node::RelationModel,
    types::{Cardinality, EntityKind},
};
use thiserror::Error as ThisError;

///
/// RelationError
///

#[derive(Debug, ThisError)]
pub enum RelationError {
    #[error("{kind} has no relation '{relation}'")]
    UnknownRelation { kind: EntityKind, relation: String },

    #[error("{key}: relation '{relation}' expects {expected}, got {found}")]
    KindMismatch {
        key: EntityKey,
        relation: &'static str,
        expected: EntityKind,
        found: EntityKey,
    },

    #[error("{kind}: relation '{relation}' is {cardinality}, use {hint}")]
    WrongCardinality {
        kind: EntityKind,
        relation: &'static str,
        cardinality: Cardinality,
        hint: &'static str,
    },

    #[error("{key}: relation '{relation}' is already set to '{current}'")]
    AlreadySet {
        key: EntityKey,
        relation: &'static str,
        current: String,
    },

    #[error("{key}: relation '{relation}' already contains {target}")]
    Duplicate {
        key: EntityKey,
        relation: &'static str,
        target: EntityKey,
    },

    #[error("{key}: relation '{relation}' does not contain {target}")]
    NotLinked {
        key: EntityKey,
        relation: &'static str,
        target: EntityKey,
    },

    #[error("{key}: relation '{relation}' references missing {target}")]
    Dangling {
        key: EntityKey,
        relation: &'static str,
        target: EntityKey,
    },

    #[error("{key}: relation '{relation}' lists {target}, whose '{inverse}' does not list it back")]
    Asymmetric {
        key: EntityKey,
        relation: &'static str,
        target: EntityKey,
        inverse: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

///
/// Side
/// One slot write: `to` goes into slot `slot` of `from`.
///

#[derive(Clone, Copy)]
struct Side {
    from: EntityRef,
    slot: usize,
    relation: &'static RelationModel,
    to: EntityRef,
}

///
/// Edge
/// Both sides of one prospective relation edge, resolved from the schema.
///

#[derive(Clone, Copy)]
struct Edge {
    forward: Side,
    backward: Side,
}

impl Layout {
    /// Set a singular relation and its inverse side.
    pub fn set(
        &mut self,
        from: EntityRef,
        relation: &str,
        to: EntityRef,
    ) -> Result<(), RelationError> {
        let edge = self.resolve_edge(from, relation, to)?;
        if edge.forward.relation.is_many() {
            return Err(wrong_cardinality(edge.forward.relation, from.kind(), "add"));
        }

        self.insert_edge(edge)
    }

    /// Append to a plural relation and update its inverse side.
    pub fn add(
        &mut self,
        from: EntityRef,
        relation: &str,
        to: EntityRef,
    ) -> Result<(), RelationError> {
        let edge = self.resolve_edge(from, relation, to)?;
        if !edge.forward.relation.is_many() {
            return Err(wrong_cardinality(edge.forward.relation, from.kind(), "set"));
        }

        self.insert_edge(edge)
    }

    /// [`Self::set`] or [`Self::add`], depending on the slot's cardinality.
    pub fn link(
        &mut self,
        from: EntityRef,
        relation: &str,
        to: EntityRef,
    ) -> Result<(), RelationError> {
        let edge = self.resolve_edge(from, relation, to)?;

        self.insert_edge(edge)
    }

    /// Remove one edge from both sides.
    pub fn unlink(
        &mut self,
        from: EntityRef,
        relation: &str,
        to: EntityRef,
    ) -> Result<(), RelationError> {
        let edge = self.resolve_edge(from, relation, to)?;
        let forward = edge.forward;
        if !self.entity_unchecked(from).slot(forward.slot).contains(to) {
            return Err(RelationError::NotLinked {
                key: self.entity_unchecked(from).key(),
                relation: forward.relation.name,
                target: self.entity_unchecked(to).key(),
            });
        }

        self.detach(edge.forward);
        self.detach(edge.backward);

        Ok(())
    }

    /// Handles linked through `relation`, in slot order.
    pub fn related(&self, from: EntityRef, relation: &str) -> Result<&[EntityRef], RelationError> {
        let entity = self
            .entity(from)
            .ok_or(StoreError::ForeignHandle { kind: from.kind() })?;
        let (slot, _) = lookup(from.kind(), relation)?;

        Ok(entity.slot(slot).refs())
    }

    /// Verify that every edge in the layout is mirrored by its inverse side.
    pub fn check_integrity(&self) -> Result<(), RelationError> {
        for kind in EntityKind::ALL {
            for handle in self.all(kind) {
                let entity = self.entity_unchecked(handle);
                for (relation, targets) in entity.relations() {
                    let (inverse_slot, inverse) = inverse_of(relation)?;
                    for &target in targets {
                        if !self.entity_unchecked(target).slot(inverse_slot).contains(handle) {
                            return Err(RelationError::Asymmetric {
                                key: entity.key(),
                                relation: relation.name,
                                target: self.entity_unchecked(target).key(),
                                inverse: inverse.name,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    // Write one side of an edge as read from the persisted form. The caller
    // checks symmetry once every side has been attached.
    pub(crate) fn attach_side(
        &mut self,
        from: EntityRef,
        slot: usize,
        to: EntityRef,
    ) -> Result<(), RelationError> {
        let side = Side {
            from,
            slot,
            relation: &from.kind().model().relations[slot],
            to,
        };
        self.check_side(side)?;
        self.attach(side);

        Ok(())
    }

    // Resolve both slots of an edge and the kinds on each end.
    fn resolve_edge(
        &self,
        from: EntityRef,
        relation: &str,
        to: EntityRef,
    ) -> Result<Edge, RelationError> {
        self.check(from)?;
        self.check(to)?;

        let (slot, model) = lookup(from.kind(), relation)?;
        if to.kind() != model.target {
            return Err(RelationError::KindMismatch {
                key: self.entity_unchecked(from).key(),
                relation: model.name,
                expected: model.target,
                found: self.entity_unchecked(to).key(),
            });
        }
        let (inverse_slot, inverse) = inverse_of(model)?;

        Ok(Edge {
            forward: Side {
                from,
                slot,
                relation: model,
                to,
            },
            backward: Side {
                from: to,
                slot: inverse_slot,
                relation: inverse,
                to: from,
            },
        })
    }

    fn insert_edge(&mut self, edge: Edge) -> Result<(), RelationError> {
        // both checks before either write
        self.check_side(edge.forward)?;
        self.check_side(edge.backward)?;

        self.attach(edge.forward);
        self.attach(edge.backward);

        Ok(())
    }

    fn check_side(&self, side: Side) -> Result<(), RelationError> {
        let owner = self.entity_unchecked(side.from);

        match owner.slot(side.slot) {
            Slot::One(Some(current)) => Err(RelationError::AlreadySet {
                key: owner.key(),
                relation: side.relation.name,
                current: self.entity_unchecked(*current).id().to_string(),
            }),
            Slot::Many(refs) if refs.contains(&side.to) => Err(RelationError::Duplicate {
                key: owner.key(),
                relation: side.relation.name,
                target: self.entity_unchecked(side.to).key(),
            }),
            Slot::One(None) | Slot::Many(_) => Ok(()),
        }
    }

    fn attach(&mut self, side: Side) {
        match self.entity_mut(side.from).slot_mut(side.slot) {
            Slot::One(current) => *current = Some(side.to),
            Slot::Many(refs) => refs.push(side.to),
        }
    }

    fn detach(&mut self, side: Side) {
        match self.entity_mut(side.from).slot_mut(side.slot) {
            Slot::One(current) => *current = None,
            Slot::Many(refs) => refs.retain(|r| *r != side.to),
        }
    }
}

fn lookup(
    kind: EntityKind,
    relation: &str,
) -> Result<(usize, &'static RelationModel), RelationError> {
    kind.model()
        .relation(relation)
        .ok_or_else(|| RelationError::UnknownRelation {
            kind,
            relation: relation.to_string(),
        })
}

fn inverse_of(
    relation: &RelationModel,
) -> Result<(usize, &'static RelationModel), RelationError> {
    relation
        .inverse_slot()
        .ok_or_else(|| RelationError::UnknownRelation {
            kind: relation.target,
            relation: relation.inverse.to_string(),
        })
}

const fn wrong_cardinality(
    relation: &'static RelationModel,
    kind: EntityKind,
    hint: &'static str,
) -> RelationError {
    RelationError::WrongCardinality {
        kind,
        relation: relation.name,
        cardinality: relation.cardinality,
        hint,
    }
}

///
/// TESTS
///
