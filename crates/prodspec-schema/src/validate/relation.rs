use crate::{err, error::ErrorTree, node::EntityModel, types::EntityKind};

// Every relation needs a matching slot on its target that points straight back.
pub fn validate_inverses(entities: &[EntityModel], errs: &mut ErrorTree) {
    for model in entities {
        for rel in model.relations {
            let Some(target) = find_model(entities, rel.target) else {
                err!(
                    errs,
                    "{}.{} targets kind '{}', which is not in the schema",
                    model.kind,
                    rel.name,
                    rel.target
                );
                continue;
            };

            let Some((_, inverse)) = target.relation(rel.inverse) else {
                err!(
                    errs,
                    "{}.{} declares inverse '{}.{}', which does not exist",
                    model.kind,
                    rel.name,
                    rel.target,
                    rel.inverse
                );
                continue;
            };

            if inverse.target != model.kind || inverse.inverse != rel.name {
                err!(
                    errs,
                    "{}.{} and its inverse {}.{} disagree (inverse points at {}.{})",
                    model.kind,
                    rel.name,
                    rel.target,
                    rel.inverse,
                    inverse.target,
                    inverse.inverse
                );
            }
        }
    }
}

fn find_model(entities: &[EntityModel], kind: EntityKind) -> Option<&EntityModel> {
    entities.iter().find(|m| m.kind == kind)
}

///
/// TESTS
///
