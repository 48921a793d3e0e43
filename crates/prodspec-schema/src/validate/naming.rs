use crate::{MAX_FIELD_NAME_LEN, err, error::ErrorTree, node::EntityModel, types::EntityKind};
use std::collections::BTreeSet;

/// Field and relation keys must be non-empty ASCII identifiers, unique per kind.
pub fn validate_keys(model: &EntityModel, errs: &mut ErrorTree) {
    let keys = model
        .fields
        .iter()
        .map(|f| f.name)
        .chain(model.relations.iter().map(|r| r.name));

    let mut seen = BTreeSet::new();
    for key in keys {
        if let Err(msg) = validate_key(key) {
            errs.add(msg);
        }
        if !seen.insert(key) {
            err!(errs, "duplicate key '{key}'");
        }
    }
}

/// The table must list every kind exactly once, in [`EntityKind::ALL`] order.
pub fn validate_kind_order(entities: &[EntityModel], errs: &mut ErrorTree) {
    if entities.len() != EntityKind::ALL.len() {
        err!(
            errs,
            "schema lists {} kinds, expected {}",
            entities.len(),
            EntityKind::ALL.len()
        );
    }

    for (i, (model, kind)) in entities.iter().zip(EntityKind::ALL).enumerate() {
        if model.kind != kind {
            err!(errs, "entry {i} is '{}', expected '{kind}'", model.kind);
        }
    }
}

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("key is empty".to_string());
    }
    if key.len() > MAX_FIELD_NAME_LEN {
        return Err(format!(
            "key '{key}' exceeds max length {MAX_FIELD_NAME_LEN}"
        ));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("key '{key}' must be ASCII alphanumeric"));
    }

    Ok(())
}
