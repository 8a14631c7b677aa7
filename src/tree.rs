//! Configuration tree data model.
//!
//! Both sides of a reconciliation (`want` and `have`) are carried as
//! [`Value`] trees. Repeated blocks are held as [`Entities`], a map from
//! [`EntityKey`] to [`ConfigTree`], once the normalizer has keyed them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;

/// Keyed collection of configuration entities.
pub type Entities = BTreeMap<EntityKey, ConfigTree>;

/// Statically declared path to a field, relative to the entity it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath(&'static [&'static str]);

impl FieldPath {
    /// Creates a path from its segments.
    #[must_use]
    pub const fn new(segments: &'static [&'static str]) -> Self {
        Self(segments)
    }

    /// Returns the path segments.
    #[must_use]
    pub const fn segments(self) -> &'static [&'static str] {
        self.0
    }

    /// Returns the last segment, or an empty string for the root.
    #[must_use]
    pub fn leaf(self) -> &'static str {
        self.0.last().copied().unwrap_or_default()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean option.
    Bool(bool),
    /// Integer option.
    Int(i64),
    /// String option.
    Str(String),
    /// Ordered sequence, as supplied before normalization.
    List(Vec<Value>),
    /// Unordered string set in canonical (sorted) order.
    Set(BTreeSet<String>),
    /// Nested mapping.
    Tree(ConfigTree),
    /// Repeated blocks keyed by their identifier.
    Keyed(Entities),
}

impl Value {
    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested tree, if this is one.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the string set, if this is one.
    #[must_use]
    pub const fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Returns the keyed entities, if this is a keyed collection.
    #[must_use]
    pub const fn as_entities(&self) -> Option<&Entities> {
        match self {
            Self::Keyed(entities) => Some(entities),
            _ => None,
        }
    }

    /// Renders a scalar as command text.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Returns true for empty containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Set(set) => set.is_empty(),
            Self::Tree(tree) => tree.is_empty(),
            Self::Keyed(entities) => entities.is_empty(),
            Self::Bool(_) | Self::Int(_) | Self::Str(_) => false,
        }
    }

    /// Resolves a relative path; the empty path is the value itself.
    #[must_use]
    pub fn lookup(&self, segments: &[&str]) -> Option<&Self> {
        if segments.is_empty() {
            return Some(self);
        }
        self.as_tree()?.lookup(segments)
    }

    /// Short type name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Tree(_) => "dict",
            Self::Keyed(_) => "keyed collection",
        }
    }

    /// Converts untyped JSON into a raw tree. Nulls vanish.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => Some(
                n.as_i64()
                    .map_or_else(|| Self::Str(n.to_string()), Self::Int),
            ),
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            serde_json::Value::Array(items) => {
                Some(Self::List(items.iter().filter_map(Self::from_json).collect()))
            }
            serde_json::Value::Object(map) => {
                let mut tree = ConfigTree::new();
                for (name, item) in map {
                    if let Some(value) = Self::from_json(item) {
                        tree.insert(name.clone(), value);
                    }
                }
                Some(Self::Tree(tree))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<ConfigTree> for Value {
    fn from(tree: ConfigTree) -> Self {
        Self::Tree(tree)
    }
}

/// An ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    fields: BTreeMap<String, Value>,
}

impl ConfigTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Number of direct fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over direct fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a direct field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Resolves a path of segments below this tree.
    #[must_use]
    pub fn lookup(&self, segments: &[&str]) -> Option<&Value> {
        let (first, rest) = segments.split_first()?;
        let value = self.fields.get(*first)?;
        if rest.is_empty() {
            Some(value)
        } else {
            value.as_tree()?.lookup(rest)
        }
    }

    /// Resolves a declared field path.
    #[must_use]
    pub fn get(&self, path: FieldPath) -> Option<&Value> {
        self.lookup(path.segments())
    }

    /// Resolves a path that must hold a nested tree.
    #[must_use]
    pub fn tree(&self, path: FieldPath) -> Option<&Self> {
        self.get(path).and_then(Value::as_tree)
    }

    /// Resolves a path that must hold keyed entities.
    #[must_use]
    pub fn entities(&self, path: FieldPath) -> Option<&Entities> {
        self.get(path).and_then(Value::as_entities)
    }

    /// Inserts a direct field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Removes a direct field.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Returns the value at `path`, creating intermediate trees and
    /// initializing the leaf with `init` when absent.
    pub fn entry(&mut self, path: FieldPath, init: impl FnOnce() -> Value) -> &mut Value {
        descend(self, path.segments(), init)
    }

    /// Sets the value at `path`, creating intermediate trees.
    pub fn put(&mut self, path: FieldPath, value: Value) {
        *self.entry(path, || Value::Bool(false)) = value;
    }

    /// Keeps only the fields whose values are equal in both trees.
    /// Nested trees are intersected recursively; empty results are dropped.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut common = Self::new();
        for (name, value) in &self.fields {
            let Some(theirs) = other.fields.get(name) else {
                continue;
            };
            match (value, theirs) {
                (Value::Tree(a), Value::Tree(b)) => {
                    let inner = a.intersection(b);
                    if !inner.is_empty() {
                        common.insert(name.clone(), Value::Tree(inner));
                    }
                }
                _ if value == theirs => {
                    common.insert(name.clone(), value.clone());
                }
                _ => {}
            }
        }
        common
    }
}

impl FromIterator<(String, Value)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConfigTree {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Walks `segments` below `tree`, creating intermediate trees. A scalar met
/// on the way is replaced by a tree.
fn descend<'a>(tree: &'a mut ConfigTree, segments: &[&str], init: impl FnOnce() -> Value) -> &'a mut Value {
    match segments {
        [head, rest @ ..] if !rest.is_empty() => {
            let slot = tree
                .fields
                .entry((*head).to_string())
                .or_insert_with(|| Value::Tree(ConfigTree::new()));
            descend_slot(slot, rest, init)
        }
        _ => tree
            .fields
            .entry(segments.first().copied().unwrap_or_default().to_string())
            .or_insert_with(init),
    }
}

fn descend_slot<'a>(slot: &'a mut Value, segments: &[&str], init: impl FnOnce() -> Value) -> &'a mut Value {
    match slot {
        Value::Tree(tree) => descend(tree, segments, init),
        other => {
            *other = Value::Tree(ConfigTree::new());
            descend_slot(other, segments, init)
        }
    }
}

/// Identifier of a repeated block, possibly composite (address + vc-id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey(Vec<String>);

impl EntityKey {
    /// Creates a key from its parts.
    #[must_use]
    pub const fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// Creates a single-part key.
    #[must_use]
    pub fn single(part: impl Into<String>) -> Self {
        Self(vec![part.into()])
    }

    /// Returns the key parts.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

/// Numeric parts sort numerically so instance 9 precedes instance 10.
fn compare_part(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

impl Ord for EntityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| compare_part(a, b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| self.0.len().cmp(&other.0.len()))
    }
}

impl PartialOrd for EntityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Str(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Set(set) => {
                let mut seq = serializer.serialize_seq(Some(set.len()))?;
                for item in set {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Tree(tree) => tree.serialize(serializer),
            Self::Keyed(entities) => {
                let mut seq = serializer.serialize_seq(Some(entities.len()))?;
                for tree in entities.values() {
                    seq.serialize_element(tree)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
