use crate::{
    Error, entities::ENTITIES, error::ErrorTree, node::EntityModel, validate::validate_schema,
};
use std::sync::OnceLock;
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("schema validation failed:\n{0}")]
    Validation(ErrorTree),
}

static SCHEMA_VALIDATED: OnceLock<Result<(), ErrorTree>> = OnceLock::new();

/// Return the schema table, validating it exactly once per process.
pub fn get_schema() -> Result<&'static [EntityModel], Error> {
    SCHEMA_VALIDATED
        .get_or_init(|| validate_schema(&ENTITIES))
        .clone()
        .map_err(BuildError::Validation)?;

    Ok(&ENTITIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_schema_returns_the_full_table() {
        let schema = get_schema().expect("builtin schema is valid");
        assert_eq!(schema.len(), 11);

        // cached result on the second call
        assert!(get_schema().is_ok());
    }
}
