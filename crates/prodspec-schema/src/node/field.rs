use crate::types::Primitive;

///
/// FieldModel
/// Scalar attribute of an entity kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldModel {
    /// Persisted key of the field.
    pub name: &'static str,
    pub primitive: Primitive,
}

impl FieldModel {
    #[must_use]
    pub const fn new(name: &'static str, primitive: Primitive) -> Self {
        Self { name, primitive }
    }

    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, Primitive::Text)
    }

    #[must_use]
    pub const fn int(name: &'static str) -> Self {
        Self::new(name, Primitive::Int)
    }

    #[must_use]
    pub const fn flag(name: &'static str) -> Self {
        Self::new(name, Primitive::Bool)
    }
}
