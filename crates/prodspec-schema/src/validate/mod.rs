//! Schema validation orchestration and shared helpers.

pub mod naming;
pub mod relation;

use crate::{error::ErrorTree, node::EntityModel};

/// Run full schema validation in a staged, deterministic order.
pub fn validate_schema(entities: &[EntityModel]) -> Result<(), ErrorTree> {
    // Phase 1: validate each entity model on its own.
    let mut errors = validate_models(entities);

    // Phase 2: enforce schema-wide invariants.
    validate_global(entities, &mut errors);

    errors.result()
}

// Validate each model, routing errors under its kind name.
fn validate_models(entities: &[EntityModel]) -> ErrorTree {
    let mut errors = ErrorTree::new();
    for model in entities {
        let mut errs = ErrorTree::new();
        naming::validate_keys(model, &mut errs);
        errors.merge(model.kind.as_str(), errs);
    }

    errors
}

// Run global validation passes that require a full schema view.
fn validate_global(entities: &[EntityModel], errors: &mut ErrorTree) {
    naming::validate_kind_order(entities, errors);
    relation::validate_inverses(entities, errors);
}
