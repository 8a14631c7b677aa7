//! Deep merge of want onto have.
//!
//! Want wins on conflicting leaves. String sets are united and keyed
//! collections are merged entity by entity, so everything have holds that
//! want does not override is retained.

use crate::tree::{ConfigTree, Entities, Value};

/// Merges `want` onto `have`.
#[must_use]
pub fn deep_merge(have: &ConfigTree, want: &ConfigTree) -> ConfigTree {
    let mut merged = have.clone();
    for (name, value) in want.iter() {
        let combined = match have.field(name) {
            Some(base) => merge_values(base, value),
            None => value.clone(),
        };
        merged.insert(name, combined);
    }
    merged
}

/// Merges two keyed collections.
#[must_use]
pub fn merge_entities(have: &Entities, want: &Entities) -> Entities {
    let mut merged = have.clone();
    for (key, tree) in want {
        let combined = match have.get(key) {
            Some(base) => deep_merge(base, tree),
            None => tree.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

fn merge_values(have: &Value, want: &Value) -> Value {
    match (have, want) {
        (Value::Tree(h), Value::Tree(w)) => Value::Tree(deep_merge(h, w)),
        (Value::Set(h), Value::Set(w)) => Value::Set(h.union(w).cloned().collect()),
        (Value::Keyed(h), Value::Keyed(w)) => Value::Keyed(merge_entities(h, w)),
        _ => want.clone(),
    }
}
