use prodspec_core::{
    graph::{EntityView, Layout, RelationError},
    value::Value,
};
use prodspec_schema::types::EntityKind;
use std::fmt::Write as _;

/// One id per line, in creation order.
pub fn ids(layout: &Layout, kind: EntityKind) -> String {
    layout.views(kind).fold(String::new(), |mut out, view| {
        let _ = writeln!(out, "{}", view.id());
        out
    })
}

/// Set attributes then linked relations, in schema order.
pub fn entity(view: EntityView<'_>) -> Result<String, RelationError> {
    let mut out = format!("[{}.{}]\n", view.kind(), view.id());

    for (field, value) in view.entity().attrs() {
        let _ = match value {
            Value::Text(text) => writeln!(out, "{field} = {text:?}"),
            other => writeln!(out, "{field} = {other}"),
        };
    }

    for relation in view.kind().model().relations {
        let targets: Vec<String> = view
            .many(relation.name)?
            .map(|target| format!("{:?}", target.id()))
            .collect();

        match (relation.is_many(), targets.as_slice()) {
            (_, []) => {}
            (false, [target]) => {
                let _ = writeln!(out, "{} = {target}", relation.name);
            }
            _ => {
                let _ = writeln!(out, "{} = [{}]", relation.name, targets.join(", "));
            }
        }
    }

    Ok(out)
}

///
/// TESTS
///
