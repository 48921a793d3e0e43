use crate::{
    codec::{CodecError, Generator},
    graph::{Entity, Layout},
    value::Value,
};
use prodspec_schema::{
    META_GENERATOR, META_GENERATOR_BUILD_CHAIN, META_GENERATOR_VERSION, build::get_schema,
    types::Cardinality,
};
use toml::{Table, Value as TomlValue};

/// Serialize a layout to its persisted TOML form.
///
/// Tables are key-sorted, so equal graphs encode to identical bytes
/// regardless of insertion order. Kinds without entities are omitted.
pub fn encode(layout: &Layout, generator: Option<&Generator>) -> Result<String, CodecError> {
    let mut root = Table::new();

    if let Some(generator) = generator {
        root.insert(META_GENERATOR.to_string(), text(&generator.name));
        root.insert(META_GENERATOR_VERSION.to_string(), text(&generator.version));
        root.insert(
            META_GENERATOR_BUILD_CHAIN.to_string(),
            text(&generator.build_chain),
        );
    }

    for model in get_schema()? {
        let kind = model.kind;
        if layout.len(kind) == 0 {
            continue;
        }

        let records: Table = layout
            .views(kind)
            .map(|view| {
                let record = record(layout, view.entity());
                (view.id().to_string(), TomlValue::Table(record))
            })
            .collect();

        root.insert(kind.as_str().to_string(), TomlValue::Table(records));
    }

    tracing::debug!(entities = layout.total(), "encoded layout");

    Ok(toml::to_string_pretty(&root)?)
}

// One entity as a flat table of scalars and relation ids.
fn record(layout: &Layout, entity: &Entity) -> Table {
    let mut table = Table::new();

    for (field, value) in entity.attrs() {
        table.insert(field.to_string(), scalar(value));
    }

    for (relation, targets) in entity.relations() {
        let mut ids = targets
            .iter()
            .map(|target| text(layout.entity_unchecked(*target).id()));

        match relation.cardinality {
            Cardinality::One => {
                if let Some(id) = ids.next() {
                    table.insert(relation.name.to_string(), id);
                }
            }
            Cardinality::Many => {
                if !targets.is_empty() {
                    table.insert(relation.name.to_string(), TomlValue::Array(ids.collect()));
                }
            }
        }
    }

    table
}

fn scalar(value: &Value) -> TomlValue {
    match value {
        Value::Bool(b) => TomlValue::Boolean(*b),
        Value::Int(i) => TomlValue::Integer(*i),
        Value::Text(s) => text(s),
    }
}

fn text(s: &str) -> TomlValue {
    TomlValue::String(s.to_string())
}

///
/// TESTS
///
