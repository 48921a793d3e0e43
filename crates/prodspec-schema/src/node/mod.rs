mod entity;
mod field;
mod relation;

pub use entity::EntityModel;
pub use field::FieldModel;
pub use relation::RelationModel;
