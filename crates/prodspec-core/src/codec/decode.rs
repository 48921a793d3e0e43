use crate::{
    codec::{CodecError, Generator},
    graph::{EntityKey, EntityRef, Layout, RelationError},
    value::Value,
};
use prodspec_schema::{
    META_GENERATOR, META_GENERATOR_BUILD_CHAIN, META_GENERATOR_VERSION,
    build::get_schema,
    node::RelationModel,
    types::{EntityKind, Primitive},
};
use toml::{Table, Value as TomlValue};

///
/// Pending
/// Relation ids read in the first pass, resolved once every entity exists.
///

struct Pending {
    owner: EntityRef,
    slot: usize,
    relation: &'static RelationModel,
    ids: Vec<String>,
}

/// Rebuild a layout from its persisted TOML form.
///
/// Entities are materialized first, then both sides of every relation are
/// linked verbatim from the file, and finally every edge is checked for its
/// mirror on the inverse side.
pub fn decode(src: &str) -> Result<Layout, CodecError> {
    get_schema()?;
    let root: Table = toml::from_str(src)?;
    let mut layout = Layout::new();
    let mut pending = Vec::new();

    // Phase 1: entities and scalars
    for (key, item) in &root {
        if is_meta(key) {
            continue;
        }

        let kind: EntityKind = key
            .parse()
            .map_err(|_| CodecError::UnrecognizedField { path: key.clone() })?;
        let records = item
            .as_table()
            .ok_or_else(|| CodecError::UnrecognizedField { path: key.clone() })?;

        for (id, record) in records {
            let path = format!("{key}.{id}");
            let record = record
                .as_table()
                .ok_or_else(|| CodecError::UnrecognizedField { path: path.clone() })?;

            let handle = layout.create(kind, id.as_str())?;
            materialize(&mut layout, handle, record, &path, &mut pending)?;
        }
    }
    tracing::debug!(entities = layout.total(), "materialized layout entities");

    // Phase 2: relations, both sides as written
    let mut edges = 0_usize;
    for p in pending {
        for id in p.ids {
            let target = layout.find(p.relation.target, &id).ok_or_else(|| {
                RelationError::Dangling {
                    key: owner_key(&layout, p.owner),
                    relation: p.relation.name,
                    target: EntityKey::new(p.relation.target, id.as_str()),
                }
            })?;
            layout.attach_side(p.owner, p.slot, target)?;
            edges += 1;
        }
    }
    tracing::debug!(edges, "relinked layout relations");

    // Phase 3: every side must be mirrored
    layout.check_integrity()?;

    if let Some(generator) = generator(&root)? {
        layout.set_generator(generator);
    }

    Ok(layout)
}

// Scalars go straight onto the entity; relation ids are queued.
fn materialize(
    layout: &mut Layout,
    handle: EntityRef,
    record: &Table,
    path: &str,
    pending: &mut Vec<Pending>,
) -> Result<(), CodecError> {
    let model = handle.kind().model();

    for (key, raw) in record {
        let path = format!("{path}.{key}");

        if let Some((_, field)) = model.field(key) {
            let value = scalar(raw, field.primitive).ok_or(CodecError::InvalidValue {
                path,
                expected: primitive_name(field.primitive),
                found: raw.type_str(),
            })?;
            layout.set_attr(handle, field.name, value)?;
        } else if let Some((slot, relation)) = model.relation(key) {
            let ids = relation_ids(raw, relation).ok_or(CodecError::InvalidValue {
                path,
                expected: if relation.is_many() {
                    "array of ids"
                } else {
                    "id string"
                },
                found: raw.type_str(),
            })?;
            pending.push(Pending {
                owner: handle,
                slot,
                relation,
                ids,
            });
        } else {
            return Err(CodecError::UnrecognizedField { path });
        }
    }

    Ok(())
}

fn scalar(raw: &TomlValue, primitive: Primitive) -> Option<Value> {
    match (primitive, raw) {
        (Primitive::Bool, TomlValue::Boolean(b)) => Some(Value::Bool(*b)),
        (Primitive::Int, TomlValue::Integer(i)) => Some(Value::Int(*i)),
        (Primitive::Text, TomlValue::String(s)) => Some(Value::Text(s.clone())),
        _ => None,
    }
}

fn relation_ids(raw: &TomlValue, relation: &RelationModel) -> Option<Vec<String>> {
    match (relation.is_many(), raw) {
        (false, TomlValue::String(id)) => Some(vec![id.clone()]),
        (true, TomlValue::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

const fn primitive_name(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Bool => "boolean",
        Primitive::Int => "integer",
        Primitive::Text => "string",
    }
}

fn is_meta(key: &str) -> bool {
    matches!(
        key,
        META_GENERATOR | META_GENERATOR_VERSION | META_GENERATOR_BUILD_CHAIN
    )
}

fn owner_key(layout: &Layout, handle: EntityRef) -> EntityKey {
    layout.entity_unchecked(handle).key()
}

// Metadata keys are optional; a file without `Generator` has no identity.
fn generator(root: &Table) -> Result<Option<Generator>, CodecError> {
    let read = |key: &str| -> Result<Option<String>, CodecError> {
        match root.get(key) {
            None => Ok(None),
            Some(TomlValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(CodecError::InvalidValue {
                path: key.to_string(),
                expected: "string",
                found: other.type_str(),
            }),
        }
    };

    let name = read(META_GENERATOR)?;
    let version = read(META_GENERATOR_VERSION)?;
    let build_chain = read(META_GENERATOR_BUILD_CHAIN)?;

    Ok(name.map(|name| Generator {
        name,
        version: version.unwrap_or_default(),
        build_chain: build_chain.unwrap_or_default(),
    }))
}

///
/// TESTS
///
