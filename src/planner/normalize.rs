//! Entity normalizer.
//!
//! Validated parameters carry repeated blocks as lists. Normalizing keys
//! every list of entries by its identifying fields and turns string lists
//! into sorted sets, so comparison is by key and independent of input
//! order. Duplicate identifiers are rejected, never overwritten.

use tracing::debug;

use crate::config::{DictSchema, EntrySchema, Shape};
use crate::error::InputError;
use crate::tree::{ConfigTree, Entities, EntityKey, Value};

/// Normalizes a validated value according to its shape.
///
/// # Errors
///
/// Returns an error if an entry lacks an identifying field or two entries
/// share an identifier.
pub fn normalize(shape: Shape, value: Value) -> Result<Value, InputError> {
    match (shape, value) {
        (Shape::Entries(schema), Value::List(items)) => {
            normalize_entries(schema, items).map(Value::Keyed)
        }
        (Shape::StrList, Value::List(items)) => Ok(Value::Set(
            items.iter().filter_map(Value::scalar_text).collect(),
        )),
        (Shape::Dict(schema), Value::Tree(tree)) => {
            normalize_dict(schema, tree).map(Value::Tree)
        }
        (_, value) => Ok(value),
    }
}

fn normalize_dict(schema: &DictSchema, tree: ConfigTree) -> Result<ConfigTree, InputError> {
    let mut normalized = ConfigTree::new();
    for (name, value) in tree {
        let value = match schema.param(&name) {
            Some(param) => normalize(param.shape, value)?,
            None => value,
        };
        normalized.insert(name, value);
    }
    Ok(normalized)
}

fn normalize_entries(schema: &EntrySchema, items: Vec<Value>) -> Result<Entities, InputError> {
    let mut entities = Entities::new();
    for item in items {
        let Value::Tree(tree) = item else {
            continue;
        };
        let key = key_of(schema, &tree)?;
        if entities.contains_key(&key) {
            return Err(InputError::DuplicateKey {
                entity: schema.entity.to_string(),
                key: key.to_string(),
            });
        }
        entities.insert(key, normalize_dict(&schema.item, tree)?);
    }
    debug!("Keyed {} {} entries", entities.len(), schema.entity);
    Ok(entities)
}

/// Builds the identifier of an entry.
///
/// # Errors
///
/// Returns an error if an identifying field is absent.
pub fn key_of(schema: &EntrySchema, tree: &ConfigTree) -> Result<EntityKey, InputError> {
    schema
        .key
        .iter()
        .map(|field| {
            tree.field(field)
                .and_then(Value::scalar_text)
                .ok_or_else(|| InputError::MissingIdentifier {
                    entity: schema.entity.to_string(),
                    field: (*field).to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(EntityKey::new)
}

/// Reverses [`normalize`]: keyed entities become lists in key order and
/// sets become sorted lists.
#[must_use]
pub fn denormalize(value: Value) -> Value {
    match value {
        Value::Keyed(entities) => Value::List(
            entities
                .into_values()
                .map(|tree| denormalize(Value::Tree(tree)))
                .collect(),
        ),
        Value::Set(set) => Value::List(set.into_iter().map(Value::Str).collect()),
        Value::Tree(tree) => Value::Tree(
            tree.into_iter()
                .map(|(name, value)| (name, denormalize(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Param;
    use pretty_assertions::assert_eq;

    static PEER: EntrySchema = EntrySchema {
        entity: "ip_peer",
        key: &["address", "vc_id"],
        item: DictSchema::new(&[
            Param::new("address", Shape::Str),
            Param::new("vc_id", Shape::Str),
            Param::new("template", Shape::Str),
        ]),
    };

    static INSTANCE: EntrySchema = EntrySchema {
        entity: "instance",
        key: &["instance"],
        item: DictSchema::new(&[
            Param::new("instance", Shape::Str),
            Param::new("route_target_export", Shape::StrList),
            Param::new("ip_peer", Shape::Entries(&PEER)),
        ]),
    };

    fn raw(json: serde_json::Value) -> Value {
        Value::from_json(&json).unwrap()
    }

    #[test]
    fn test_keys_entries_and_sorts_sets() {
        let value = raw(serde_json::json!([
            {"instance": "124", "route_target_export": ["45:55", "43:45"]},
            {"instance": "9"},
        ]));
        let normalized = normalize(Shape::Entries(&INSTANCE), value).unwrap();
        let entities = normalized.as_entities().unwrap();

        let keys: Vec<String> = entities.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["9", "124"]);

        let rts = entities[&EntityKey::single("124")]
            .field("route_target_export")
            .and_then(Value::as_set)
            .unwrap();
        assert_eq!(
            rts.iter().cloned().collect::<Vec<_>>(),
            vec!["43:45", "45:55"]
        );
    }

    #[test]
    fn test_composite_keys() {
        let value = raw(serde_json::json!([{"instance": "1", "ip_peer": [
            {"address": "4.4.4.4", "vc_id": "423"},
            {"address": "4.4.4.4", "vc_id": "424", "template": "t"},
        ]}]));
        let normalized = normalize(Shape::Entries(&INSTANCE), value).unwrap();
        let instance = &normalized.as_entities().unwrap()[&EntityKey::single("1")];
        let peers = instance.field("ip_peer").and_then(Value::as_entities).unwrap();
        assert!(peers.contains_key(&EntityKey::new(vec!["4.4.4.4".into(), "424".into()])));
        assert_eq!(peers.len(), 2);
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let value = raw(serde_json::json!([{"instance": "7"}, {"instance": "7"}]));
        let err = normalize(Shape::Entries(&INSTANCE), value).unwrap_err();
        assert_eq!(
            err,
            InputError::DuplicateKey {
                entity: String::from("instance"),
                key: String::from("7"),
            }
        );
    }

    #[test]
    fn test_missing_identifier_is_rejected() {
        let value = raw(serde_json::json!([{"instance": "1", "ip_peer": [{"address": "1.1.1.1"}]}]));
        let err = normalize(Shape::Entries(&INSTANCE), value).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingIdentifier {
                entity: String::from("ip_peer"),
                field: String::from("vc_id"),
            }
        );
    }

    #[test]
    fn test_denormalize_restores_lists() {
        let value = raw(serde_json::json!([
            {"instance": "2", "route_target_export": ["b", "a"]},
            {"instance": "1"},
        ]));
        let normalized = normalize(Shape::Entries(&INSTANCE), value).unwrap();
        let json = serde_json::to_value(denormalize(normalized)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"instance": "1"},
                {"instance": "2", "route_target_export": ["a", "b"]},
            ])
        );
    }
}
