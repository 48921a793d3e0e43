use crate::{
    node::{FieldModel, RelationModel},
    types::EntityKind,
};

///
/// EntityModel
/// Fields and relation slots of one entity kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityModel {
    pub kind: EntityKind,
    /// Scalar attributes, in persisted-key order.
    pub fields: &'static [FieldModel],
    /// Relation slots; slot storage on entities follows this order.
    pub relations: &'static [RelationModel],
}

impl EntityModel {
    /// Look up a scalar field by its persisted key.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &'static FieldModel)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Look up a scalar field ignoring ASCII case, for loosely keyed input.
    #[must_use]
    pub fn field_ignore_case(&self, name: &str) -> Option<&'static FieldModel> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Look up a relation slot by its persisted key.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<(usize, &'static RelationModel)> {
        self.relations
            .iter()
            .enumerate()
            .find(|(_, r)| r.name == name)
    }
}

///
/// TESTS
///
