//! Device running-config parser.
//!
//! Turns IOS configuration text into a raw parameter tree using a resource's
//! [`Grammar`]. The walk is a fold over lines threading a [`Cursor`] value
//! (current entity, current nested block); only the draft being built is
//! mutated. The result is raw: callers run it through the validator and the
//! normalizer exactly like desired config.

pub mod grammar;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::planner::Layout;
use crate::tree::{ConfigTree, FieldPath, Value};

pub use grammar::{Capture, CaptureKind, Grammar, LineAction, LineRule, Target};

/// Parser for one resource's configuration section.
#[derive(Debug)]
pub struct DeviceParser {
    /// Resource layout (single block or keyed blocks).
    layout: Layout,
    /// Compiled rules, in match order.
    rules: Vec<CompiledRule>,
}

#[derive(Debug)]
struct CompiledRule {
    rule: &'static LineRule,
    regex: Regex,
}

/// Position of the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the open entity.
    pub entity: Option<usize>,
    /// Open nested block inside the entity.
    pub nested: Option<NestedCursor>,
}

/// Position inside a nested list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedCursor {
    /// Path of the nested list in the entity.
    pub path: &'static [&'static str],
    /// Index of the open entry.
    pub index: usize,
}

impl DeviceParser {
    /// Compiles a grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule pattern is not a valid regular expression.
    pub fn new(grammar: &'static Grammar, layout: Layout) -> Result<Self> {
        let rules = grammar
            .rules
            .iter()
            .map(|rule| {
                Regex::new(rule.pattern)
                    .map(|regex| CompiledRule { rule, regex })
                    .map_err(|e| ParseError::InvalidPattern {
                        rule: rule.name.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Compiled {} line rules", rules.len());
        Ok(Self { layout, rules })
    }

    /// Parses configuration text into a raw tree: a dict for single-block
    /// resources, a list of dicts for keyed ones.
    #[must_use]
    pub fn parse(&self, text: &str) -> Value {
        let mut draft: Vec<ConfigTree> = Vec::new();
        text.lines()
            .fold(Cursor::default(), |cursor, line| self.step(&mut draft, cursor, line));

        match self.layout {
            Layout::Single(_) => Value::Tree(draft.into_iter().next().unwrap_or_default()),
            Layout::Keyed(_) => Value::List(draft.into_iter().map(Value::Tree).collect()),
        }
    }

    fn step(&self, draft: &mut Vec<ConfigTree>, cursor: Cursor, line: &str) -> Cursor {
        let content = line.trim();
        if content.is_empty() || content == "!" {
            return cursor;
        }

        let matched = self
            .rules
            .iter()
            .find_map(|compiled| compiled.regex.captures(line).map(|caps| (compiled.rule, caps)));

        let Some((rule, caps)) = matched else {
            if line.starts_with(char::is_whitespace) {
                return cursor;
            }
            trace!("Leaving block at: {content}");
            return Cursor::default();
        };

        trace!("Line '{content}' matched rule {}", rule.name);
        apply(rule, &caps, draft, cursor)
    }
}

fn apply(rule: &LineRule, caps: &Captures<'_>, draft: &mut Vec<ConfigTree>, cursor: Cursor) -> Cursor {
    match rule.action {
        LineAction::Open { key } => Cursor {
            entity: Some(open_entity(draft, key, caps)),
            nested: None,
        },
        LineAction::OpenNested { path, key } => {
            let Some(entity) = cursor.entity.and_then(|i| draft.get_mut(i)) else {
                return Cursor::default();
            };
            let index = open_nested(entity, path, key, caps);
            Cursor {
                entity: cursor.entity,
                nested: index.map(|index| NestedCursor { path, index }),
            }
        }
        action => {
            let cursor = match rule.target {
                Target::Entity => Cursor {
                    nested: None,
                    ..cursor
                },
                Target::Nested => cursor,
            };
            if let Some(tree) = target_tree(draft, cursor, rule.target) {
                write(tree, action, caps);
            }
            cursor
        }
    }
}

fn open_entity(draft: &mut Vec<ConfigTree>, key: Option<&str>, caps: &Captures<'_>) -> usize {
    let identity = key.and_then(|k| caps.name(k).map(|m| (k, Value::from(m.as_str()))));

    let existing = match &identity {
        Some((field, value)) => draft.iter().position(|e| e.field(field) == Some(value)),
        None => (!draft.is_empty()).then_some(0),
    };
    if let Some(index) = existing {
        return index;
    }

    let mut entity = ConfigTree::new();
    if let Some((field, value)) = identity {
        entity.insert(field, value);
    }
    draft.push(entity);
    draft.len() - 1
}

fn open_nested(
    entity: &mut ConfigTree,
    path: &'static [&'static str],
    key: &str,
    caps: &Captures<'_>,
) -> Option<usize> {
    let value = Value::from(caps.name(key)?.as_str());
    let Value::List(items) = entity.entry(FieldPath::new(path), || Value::List(Vec::new())) else {
        return None;
    };

    if let Some(index) = items
        .iter()
        .position(|item| item.as_tree().and_then(|t| t.field(key)) == Some(&value))
    {
        return Some(index);
    }

    let mut nested = ConfigTree::new();
    nested.insert(key, value);
    items.push(Value::Tree(nested));
    Some(items.len() - 1)
}

fn target_tree(draft: &mut [ConfigTree], cursor: Cursor, target: Target) -> Option<&mut ConfigTree> {
    let entity = draft.get_mut(cursor.entity?)?;
    match target {
        Target::Entity => Some(entity),
        Target::Nested => {
            let nested = cursor.nested?;
            match entity.entry(FieldPath::new(nested.path), || Value::List(Vec::new())) {
                Value::List(items) => match items.get_mut(nested.index)? {
                    Value::Tree(tree) => Some(tree),
                    _ => None,
                },
                _ => None,
            }
        }
    }
}

fn write(tree: &mut ConfigTree, action: LineAction, caps: &Captures<'_>) {
    match action {
        LineAction::Flag(path) => {
            let enabled = caps.name("negated").is_none();
            tree.put(FieldPath::new(path), Value::Bool(enabled));
        }
        LineAction::Text { path, group } => {
            if let Some(m) = caps.name(group) {
                tree.put(FieldPath::new(path), Value::from(m.as_str()));
            }
        }
        LineAction::Append { path, group } => {
            if let Some(m) = caps.name(group) {
                push(tree, path, Value::from(m.as_str()));
            }
        }
        LineAction::Group { path, captures } => {
            tree.put(FieldPath::new(path), Value::Tree(collect(captures, caps)));
        }
        LineAction::Entry { path, captures } => {
            push(tree, path, Value::Tree(collect(captures, caps)));
        }
        LineAction::Open { .. } | LineAction::OpenNested { .. } => {}
    }
}

fn push(tree: &mut ConfigTree, path: &'static [&'static str], value: Value) {
    if let Value::List(items) = tree.entry(FieldPath::new(path), || Value::List(Vec::new())) {
        items.push(value);
    }
}

fn collect(captures: &[Capture], caps: &Captures<'_>) -> ConfigTree {
    let mut tree = ConfigTree::new();
    for capture in captures {
        let Some(m) = caps.name(capture.group) else {
            continue;
        };
        let value = match capture.kind {
            CaptureKind::Text => Value::from(m.as_str()),
            CaptureKind::Present => Value::Bool(true),
        };
        tree.insert(capture.field, value);
    }
    tree
}
