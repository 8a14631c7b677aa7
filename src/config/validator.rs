//! Task document and parameter validation.
//!
//! Parameter validation walks a raw [`Value`] against its declared
//! [`Shape`]: unknown keys are rejected, scalars are coerced, choices and
//! cross-field constraints are enforced, boolean defaults are filled in and
//! null or empty values are pruned. All problems are collected; the first one
//! is returned as the error.

use crate::error::{DocumentError, ReconError, Result, SchemaError};
use tracing::{debug, warn};

use super::document::{Mode, TaskDocument};
use super::schema::{DictSchema, Shape};
use crate::tree::{ConfigTree, Value};

/// Words accepted as `true` for boolean parameters.
const TRUE_WORDS: &[&str] = &["yes", "on", "true", "1", "y"];

/// Words accepted as `false` for boolean parameters.
const FALSE_WORDS: &[&str] = &["no", "off", "false", "0", "n"];

/// Validator for task documents and resource parameters.
#[derive(Debug)]
pub struct ConfigValidator {
    /// Accepted spellings of true.
    true_words: &'static [&'static str],
    /// Accepted spellings of false.
    false_words: &'static [&'static str],
}

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Creates a validator with the standard boolean spellings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            true_words: TRUE_WORDS,
            false_words: FALSE_WORDS,
        }
    }

    /// Validates how a task document combines its fields.
    ///
    /// # Errors
    ///
    /// Returns the first document error found.
    pub fn validate_document(&self, document: &TaskDocument) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();
        let state = document.state;

        if state.requires_config() && !document.has_config() {
            result.error("config", format!("state '{state}' requires a non-empty config"));
        }

        if matches!(state, Mode::Gathered | Mode::Parsed) && document.has_config() {
            result
                .warnings
                .push(format!("config is ignored for state '{state}'"));
        }

        match (&document.running_config, state) {
            (None, Mode::Parsed) => {
                result.error("running_config", "state 'parsed' requires running_config");
            }
            (Some(text), Mode::Parsed) if text.trim().is_empty() => {
                result.error("running_config", "running_config is empty");
            }
            (Some(_), Mode::Parsed) | (None, _) => {}
            (Some(_), _) => result.warnings.push(format!(
                "running_config is only used with state 'parsed', ignored for '{state}'"
            )),
        }

        if let Some(first) = result.errors.first() {
            return Err(ReconError::Document(DocumentError::invalid(
                first.message.clone(),
                first.field.clone(),
            )));
        }

        debug!("Task document validation passed");
        Ok(result)
    }

    /// Validates a raw parameter tree against its shape.
    ///
    /// An absent value validates to the empty value of the shape.
    ///
    /// # Errors
    ///
    /// Returns the first schema error found.
    pub fn validate_params(&self, shape: Shape, raw: Option<&Value>) -> Result<Value> {
        let (value, result) = self.check_params(shape, raw);

        for warning in &result.warnings {
            warn!("{warning}");
        }

        if let Some(first) = result.errors.first() {
            return Err(ReconError::Schema(SchemaError::invalid(
                first.field.clone(),
                first.message.clone(),
            )));
        }

        Ok(value)
    }

    /// Validates a raw parameter tree and reports every problem found.
    #[must_use]
    pub fn check_params(&self, shape: Shape, raw: Option<&Value>) -> (Value, ValidationResult) {
        let mut result = ValidationResult::default();
        let value = raw
            .and_then(|v| self.check_value(shape, v, "config", &mut result))
            .unwrap_or_else(|| empty_of(shape));
        (value, result)
    }

    fn check_value(
        &self,
        shape: Shape,
        value: &Value,
        field: &str,
        result: &mut ValidationResult,
    ) -> Option<Value> {
        match shape {
            Shape::Bool => self.coerce_bool(value, field, result),
            Shape::Int => coerce_int(value, field, result),
            Shape::Str => coerce_str(value, field, result).map(Value::Str),
            Shape::Choice(choices) => {
                let text = coerce_str(value, field, result)?;
                if choices.contains(&text.as_str()) {
                    Some(Value::Str(text))
                } else {
                    result.error(
                        field,
                        format!("value must be one of: {}, got: {text}", choices.join(", ")),
                    );
                    None
                }
            }
            Shape::StrList => {
                let items: Vec<Value> = match value {
                    Value::List(items) => items
                        .iter()
                        .filter_map(|item| coerce_str(item, field, result))
                        .map(Value::Str)
                        .collect(),
                    Value::Str(s) => s
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(Value::from)
                        .collect(),
                    other => {
                        result.error(field, format!("expected a list, got {}", other.kind()));
                        return None;
                    }
                };
                (!items.is_empty()).then_some(Value::List(items))
            }
            Shape::Dict(schema) => {
                let Value::Tree(tree) = value else {
                    result.error(field, format!("expected a dict, got {}", value.kind()));
                    return None;
                };
                let checked = self.check_dict(schema, tree, field, result);
                (!checked.is_empty()).then_some(Value::Tree(checked))
            }
            Shape::Entries(schema) => {
                let Value::List(items) = value else {
                    result.error(field, format!("expected a list, got {}", value.kind()));
                    return None;
                };
                let mut entries = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_field = format!("{field}[{index}]");
                    let Value::Tree(tree) = item else {
                        result.error(
                            &item_field,
                            format!("expected a dict, got {}", item.kind()),
                        );
                        continue;
                    };
                    let checked = self.check_dict(&schema.item, tree, &item_field, result);
                    if !checked.is_empty() {
                        entries.push(Value::Tree(checked));
                    }
                }
                (!entries.is_empty()).then_some(Value::List(entries))
            }
        }
    }

    fn check_dict(
        &self,
        schema: &DictSchema,
        tree: &ConfigTree,
        field: &str,
        result: &mut ValidationResult,
    ) -> ConfigTree {
        for (name, _) in tree.iter() {
            if schema.param(name).is_none() {
                result.error(&join(field, name), "unsupported parameter");
            }
        }

        let mut checked = ConfigTree::new();
        for param in schema.params {
            if let Some(raw) = tree.field(param.name)
                && let Some(value) =
                    self.check_value(param.shape, raw, &join(field, param.name), result)
            {
                checked.insert(param.name, value);
            }
        }

        let present = |name: &str| checked.field(name).is_some();

        for param in schema.params.iter().filter(|p| p.required) {
            if !present(param.name) {
                result.error(&join(field, param.name), "missing required argument");
            }
        }

        for group in schema.mutually_exclusive {
            if group.iter().filter(|name| present(name)).count() > 1 {
                result.error(
                    field,
                    format!("parameters are mutually exclusive: {}", group.join("|")),
                );
            }
        }

        for group in schema.required_together {
            let count = group.iter().filter(|name| present(name)).count();
            if count > 0 && count < group.len() {
                result.error(
                    field,
                    format!("parameters are required together: {}", group.join(", ")),
                );
            }
        }

        for (name, requirement) in schema.required_by {
            if present(name) && !present(requirement) {
                result.error(
                    field,
                    format!("missing parameter(s) required by '{name}': {requirement}"),
                );
            }
        }

        let defaults: Vec<_> = schema
            .params
            .iter()
            .filter(|p| !present(p.name))
            .filter_map(|p| p.default.map(|d| (p.name, d)))
            .collect();
        for (name, default) in defaults {
            checked.insert(name, Value::Bool(default));
        }

        checked
    }

    fn coerce_bool(&self, value: &Value, field: &str, result: &mut ValidationResult) -> Option<Value> {
        let word = match value {
            Value::Bool(b) => return Some(Value::Bool(*b)),
            Value::Int(i) => i.to_string(),
            Value::Str(s) => s.trim().to_ascii_lowercase(),
            other => {
                result.error(field, format!("expected a bool, got {}", other.kind()));
                return None;
            }
        };

        if self.true_words.contains(&word.as_str()) {
            Some(Value::Bool(true))
        } else if self.false_words.contains(&word.as_str()) {
            Some(Value::Bool(false))
        } else {
            result.error(field, format!("'{word}' cannot be converted to a bool"));
            None
        }
    }
}

fn coerce_int(value: &Value, field: &str, result: &mut ValidationResult) -> Option<Value> {
    match value {
        Value::Int(i) => Some(Value::Int(*i)),
        Value::Str(s) => match s.trim().parse::<i64>() {
            Ok(i) => Some(Value::Int(i)),
            Err(_) => {
                result.error(field, format!("'{s}' cannot be converted to an int"));
                None
            }
        },
        other => {
            result.error(field, format!("expected an int, got {}", other.kind()));
            None
        }
    }
}

fn coerce_str(value: &Value, field: &str, result: &mut ValidationResult) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Bool(b) => {
            result
                .warnings
                .push(format!("{field}: bool {b} converted to a string"));
            Some(b.to_string())
        }
        other => {
            result.error(field, format!("expected a string, got {}", other.kind()));
            None
        }
    }
}

fn empty_of(shape: Shape) -> Value {
    match shape {
        Shape::Entries(_) | Shape::StrList => Value::List(Vec::new()),
        _ => Value::Tree(ConfigTree::new()),
    }
}

fn join(parent: &str, name: &str) -> String {
    format!("{parent}.{name}")
}

impl ValidationResult {
    /// Records an error for a field.
    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{EntrySchema, Param, ATTACH_POLICY};
    use crate::resources::ResourceKind;

    static GATEWAY: DictSchema = DictSchema::new(&[
        Param::new("enable", Shape::Bool).required(),
        Param::new("transport", Shape::Choice(&["ipv4", "ipv6", "both"])),
    ]);

    static DUPLICATION: DictSchema = DictSchema::new(&[
        Param::new("limit", Shape::Int),
        Param::new("time", Shape::Int),
    ])
    .together(&[&["limit", "time"]]);

    static MEMBER: DictSchema = DictSchema::new(&[
        Param::new("vfi", Shape::Str),
        Param::new("access_vfi", Shape::Str),
    ])
    .exclusive(&[&["vfi", "access_vfi"]]);

    static INSTANCE: EntrySchema = EntrySchema {
        entity: "instance",
        key: &["instance"],
        item: DictSchema::new(&[
            Param::new("instance", Shape::Str).required(),
            Param::new("rd", Shape::Str),
            Param::new("route_target_import", Shape::StrList),
            Param::new("auto_route_target", Shape::Bool).default_bool(true),
            Param::new("duplication", Shape::Dict(&DUPLICATION)),
        ]),
    };

    fn raw(json: serde_json::Value) -> Value {
        Value::from_json(&json).unwrap()
    }

    fn first_error(shape: Shape, json: serde_json::Value) -> String {
        let (_, result) = ConfigValidator::new().check_params(shape, Some(&raw(json)));
        result.errors.first().map(ToString::to_string).unwrap_or_default()
    }

    #[test]
    fn test_coercions_and_defaults() {
        let value = ConfigValidator::new()
            .validate_params(
                Shape::Entries(&INSTANCE),
                Some(&raw(serde_json::json!([
                    {"instance": 123, "route_target_import": "1:1, 2:2",
                     "duplication": {"limit": "10", "time": 5}}
                ]))),
            )
            .unwrap();

        let Value::List(entries) = value else {
            panic!("expected a list");
        };
        let entry = entries[0].as_tree().unwrap();
        assert_eq!(entry.field("instance"), Some(&Value::from("123")));
        assert_eq!(entry.field("auto_route_target"), Some(&Value::Bool(true)));
        assert_eq!(
            entry.field("route_target_import"),
            Some(&Value::List(vec![Value::from("1:1"), Value::from("2:2")]))
        );
        assert_eq!(
            entry.lookup(&["duplication", "limit"]),
            Some(&Value::Int(10))
        );
    }

    #[test]
    fn test_bool_words() {
        let (value, result) = ConfigValidator::new().check_params(
            Shape::Dict(&GATEWAY),
            Some(&raw(serde_json::json!({"enable": "yes"}))),
        );
        assert!(result.is_valid());
        assert_eq!(
            value.lookup(&["enable"]),
            Some(&Value::Bool(true))
        );
        assert!(first_error(Shape::Dict(&GATEWAY), serde_json::json!({"enable": "maybe"}))
            .contains("cannot be converted to a bool"));
    }

    #[test]
    fn test_rejects_unknown_and_missing() {
        let message = first_error(
            Shape::Dict(&GATEWAY),
            serde_json::json!({"enable": true, "timer": 4}),
        );
        assert_eq!(message, "config.timer: unsupported parameter");

        let message = first_error(Shape::Dict(&GATEWAY), serde_json::json!({"transport": "ipv4"}));
        assert_eq!(message, "config.enable: missing required argument");
    }

    #[test]
    fn test_choices() {
        let message = first_error(
            Shape::Dict(&GATEWAY),
            serde_json::json!({"enable": true, "transport": "udp"}),
        );
        assert!(message.contains("value must be one of: ipv4, ipv6, both"));
    }

    #[test]
    fn test_cross_field_constraints() {
        let message = first_error(
            Shape::Dict(&MEMBER),
            serde_json::json!({"vfi": "a", "access_vfi": "b"}),
        );
        assert!(message.contains("mutually exclusive: vfi|access_vfi"));

        let message = first_error(Shape::Dict(&DUPLICATION), serde_json::json!({"limit": 3}));
        assert!(message.contains("required together: limit, time"));

        let message = first_error(
            Shape::Dict(&ATTACH_POLICY),
            serde_json::json!({"attach_policy": "TEST"}),
        );
        assert!(message.contains("required by 'attach_policy': enable"));
    }

    #[test]
    fn test_prunes_nulls_and_empties() {
        let value = ConfigValidator::new()
            .validate_params(
                Shape::Entries(&INSTANCE),
                Some(&raw(serde_json::json!([
                    {"instance": "9", "rd": null, "route_target_import": [], "duplication": {}}
                ]))),
            )
            .unwrap();
        let Value::List(entries) = value else {
            panic!("expected a list");
        };
        let entry = entries[0].as_tree().unwrap();
        assert!(entry.field("rd").is_none());
        assert!(entry.field("route_target_import").is_none());
        assert!(entry.field("duplication").is_none());
    }

    #[test]
    fn test_absent_params_yield_empty_shape() {
        let value = ConfigValidator::new()
            .validate_params(Shape::Entries(&INSTANCE), None)
            .unwrap();
        assert_eq!(value, Value::List(Vec::new()));
    }

    #[test]
    fn test_document_rules() {
        let validator = ConfigValidator::new();

        let merged = TaskDocument::new(ResourceKind::L2vpn, Mode::Merged);
        assert!(validator.validate_document(&merged).is_err());

        let parsed = TaskDocument::new(ResourceKind::L2vpn, Mode::Parsed);
        let err = validator.validate_document(&parsed).unwrap_err();
        assert!(err.to_string().contains("running_config"));

        let deleted = TaskDocument::new(ResourceKind::L2vpn, Mode::Deleted)
            .with_running_config("l2vpn\n");
        let result = validator.validate_document(&deleted).unwrap();
        assert_eq!(result.warning_count(), 1);
        assert!(result.is_valid());
    }
}
