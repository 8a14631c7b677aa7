//! Reconciler for IOS configuration resources.
//!
//! This module implements the want/have comparison that turns a desired
//! configuration and the device's current one into an ordered command list.
//! It is generic over a resource's field table: per-resource behavior is
//! data, not code. A [`Reconciler`] also drives a whole task: parse the
//! device text, validate and normalize both sides, reconcile.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ConfigValidator, Mode, TaskDocument};
use crate::device::DeviceParser;
use crate::error::{InputError, Result};
use crate::planner::emitter::{self, bracket};
use crate::planner::merge::{deep_merge, merge_entities};
use crate::planner::normalize::{denormalize, normalize};
use crate::planner::{
    BlockSpec, Command, CommandPlan, DeleteMatch, FieldKind, FieldSpec, Layout, Scope, Template,
    decide, decide_exclusive, decide_removal,
};
use crate::resources::{Resource, ResourceKind};
use crate::tree::{ConfigTree, Entities, Value};

static EMPTY_TREE: ConfigTree = ConfigTree::new();
static EMPTY_ENTITIES: Entities = Entities::new();
static EMPTY_SET: BTreeSet<String> = BTreeSet::new();
static ENABLED: Value = Value::Bool(true);

/// Reconciler for one resource.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    /// Resource declaration driving the comparison.
    resource: &'static Resource,
}

/// Result of running a task document.
#[derive(Debug, Serialize)]
pub struct RunOutcome {
    /// Commands produced (empty for gathered and parsed).
    #[serde(flatten)]
    pub plan: CommandPlan,
    /// Whether applying the commands would change the device.
    pub changed: bool,
    /// Device configuration before the change, when it was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Structured configuration for gathered and parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
}

impl Reconciler {
    /// Creates a reconciler for a resource.
    #[must_use]
    pub const fn new(resource: &'static Resource) -> Self {
        Self { resource }
    }

    /// Creates a reconciler for a resource kind.
    #[must_use]
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(kind.resource())
    }

    /// Returns the resource this reconciler works on.
    #[must_use]
    pub const fn resource(&self) -> &'static Resource {
        self.resource
    }

    /// Validates and normalizes raw parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or normalization fails.
    pub fn prepare(&self, raw: Option<&Value>) -> Result<Value> {
        let validated = ConfigValidator::new().validate_params(self.resource.schema, raw)?;
        Ok(normalize(self.resource.schema, validated)?)
    }

    /// Parses device configuration text into a normalized tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar is invalid or the parsed tree does not
    /// validate.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let parser = DeviceParser::new(&self.resource.grammar, self.resource.layout)?;
        let draft = parser.parse(text);
        self.prepare(Some(&draft))
    }

    /// Compares normalized want and have trees under a mode.
    ///
    /// # Errors
    ///
    /// Returns an error if a tree does not have the resource's shape or a
    /// command cannot be rendered.
    pub fn reconcile(&self, want: &Value, have: &Value, mode: Mode) -> Result<Vec<Command>> {
        debug!("Reconciling {} ({mode})", self.resource.kind);

        let commands = match self.resource.layout {
            Layout::Single(block) => {
                let want = self.single(want)?;
                let have = self.single(have)?;
                match mode {
                    Mode::Merged => compare_entity(block, &deep_merge(have, want), have)?,
                    Mode::Replaced => compare_entity(block, want, have)?,
                    Mode::Rendered => compare_entity(block, want, &EMPTY_TREE)?,
                    Mode::Deleted => delete_single(block, want, have)?,
                    Mode::Gathered | Mode::Parsed => Vec::new(),
                }
            }
            Layout::Keyed(block) => {
                let want = self.keyed(want)?;
                let have = self.keyed(have)?;
                match mode {
                    Mode::Merged => compare_entities(block, &merge_entities(have, want), have)?,
                    Mode::Replaced => compare_entities(block, want, have)?,
                    Mode::Rendered => compare_entities(block, want, &EMPTY_ENTITIES)?,
                    Mode::Deleted => delete_entities(block, want, have)?,
                    Mode::Gathered | Mode::Parsed => Vec::new(),
                }
            }
        };

        debug!("Produced {} commands", commands.len());
        Ok(commands)
    }

    /// Runs a task document.
    ///
    /// `running_config` is the device configuration text for states that
    /// read the device; `None` means an empty device.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is invalid or any stage fails.
    pub fn run(&self, document: &TaskDocument, running_config: Option<&str>) -> Result<RunOutcome> {
        ConfigValidator::new().validate_document(document)?;
        let mode = document.state;
        info!("Running {} with state {mode}", self.resource.kind);

        let outcome = match mode {
            Mode::Parsed | Mode::Gathered => {
                let text = if mode == Mode::Parsed {
                    document.running_config.as_deref()
                } else {
                    running_config
                };
                let have = self.parse(text.unwrap_or_default())?;
                RunOutcome {
                    plan: CommandPlan::new(self.resource.kind, mode, Vec::new()),
                    changed: false,
                    before: None,
                    structured: Some(denormalize(have)),
                }
            }
            Mode::Rendered => {
                let want = self.prepare_document(document)?;
                let commands = self.reconcile(&want, &self.empty(), mode)?;
                RunOutcome {
                    plan: CommandPlan::new(self.resource.kind, mode, commands),
                    changed: false,
                    before: None,
                    structured: None,
                }
            }
            Mode::Merged | Mode::Replaced | Mode::Deleted => {
                let want = self.prepare_document(document)?;
                let have = self.parse(running_config.unwrap_or_default())?;
                let commands = self.reconcile(&want, &have, mode)?;
                let plan = CommandPlan::new(self.resource.kind, mode, commands);
                RunOutcome {
                    changed: plan.changes_device(),
                    plan,
                    before: Some(denormalize(have)),
                    structured: None,
                }
            }
        };

        info!(
            "{} {mode}: {} commands",
            self.resource.kind,
            outcome.plan.len()
        );
        Ok(outcome)
    }

    fn prepare_document(&self, document: &TaskDocument) -> Result<Value> {
        let raw = document.config.as_ref().and_then(Value::from_json);
        self.prepare(raw.as_ref())
    }

    fn empty(&self) -> Value {
        match self.resource.layout {
            Layout::Single(_) => Value::Tree(ConfigTree::new()),
            Layout::Keyed(_) => Value::Keyed(Entities::new()),
        }
    }

    fn single<'v>(&self, value: &'v Value) -> Result<&'v ConfigTree> {
        value.as_tree().ok_or_else(|| {
            InputError::ShapeMismatch {
                resource: self.resource.kind.to_string(),
                expected: String::from("a dict"),
            }
            .into()
        })
    }

    fn keyed<'v>(&self, value: &'v Value) -> Result<&'v Entities> {
        value.as_entities().ok_or_else(|| {
            InputError::ShapeMismatch {
                resource: self.resource.kind.to_string(),
                expected: String::from("a keyed list"),
            }
            .into()
        })
    }
}

// ============================================================================
// Comparison (merged, replaced, rendered)
// ============================================================================

fn compare_entities(block: &BlockSpec, want: &Entities, have: &Entities) -> Result<Vec<Command>> {
    let mut out = Vec::new();

    for (key, entity) in have {
        if !want.contains_key(key) {
            debug!("Removing {} {key}", block.name);
            out.push(emitter::removal(block, entity)?);
        }
    }

    for (key, entity) in want {
        let current = have.get(key).unwrap_or(&EMPTY_TREE);
        out.extend(compare_entity(block, entity, current)?);
    }

    Ok(out)
}

fn compare_entity(block: &BlockSpec, want: &ConfigTree, have: &ConfigTree) -> Result<Vec<Command>> {
    let inner = compare_fields(block.fields, want, have)?;
    if inner.is_empty() {
        return Ok(inner);
    }
    let scope = if want.is_empty() { have } else { want };
    Ok(bracket(emitter::enter(block, scope)?, inner))
}

fn compare_fields(fields: &[FieldSpec], want: &ConfigTree, have: &ConfigTree) -> Result<Vec<Command>> {
    let mut out = Vec::new();

    for field in fields {
        let w = want.get(field.path);
        let h = have.get(field.path);

        match field.kind {
            FieldKind::Linear(template) | FieldKind::Paired(template) => {
                out.extend(emitter::emit_values(&template, decide(w, h), w, h)?);
            }
            FieldKind::Exclusive(template) => {
                out.extend(emitter::emit_values(&template, decide_exclusive(w, h), w, h)?);
            }
            FieldKind::DefaultOn(template) => {
                let h = if w.is_some() && h.is_none() { Some(&ENABLED) } else { h };
                out.extend(emitter::emit_values(&template, decide(w, h), w, h)?);
            }
            FieldKind::Set(template) => out.extend(compare_sets(&template, w, h)?),
            FieldKind::Dual(template) => out.extend(compare_dual(&template, w, h)?),
            FieldKind::Entries(template) => out.extend(compare_inline(&template, w, h)?),
            FieldKind::Gated { enable, fields } => {
                out.extend(compare_gated(&enable, fields, tree_of(w), tree_of(h))?);
            }
            FieldKind::Nested(block) => {
                out.extend(compare_entities(block, entities_of(w), entities_of(h))?);
            }
        }
    }

    Ok(out)
}

fn compare_sets(template: &Template, want: Option<&Value>, have: Option<&Value>) -> Result<Vec<Command>> {
    let want = set_of(want);
    let have = set_of(have);
    let mut out = Vec::new();

    for item in have.difference(want) {
        out.push(emitter::negative(template, Scope::Value(&Value::from(item.as_str())))?);
    }
    for item in want.difference(have) {
        out.push(emitter::positive(template, Scope::Value(&Value::from(item.as_str())))?);
    }

    Ok(out)
}

fn compare_dual(template: &Template, want: Option<&Value>, have: Option<&Value>) -> Result<Vec<Command>> {
    fn enable(tree: &ConfigTree) -> Option<&Value> {
        tree.field("enable")
    }

    let want = tree_of(want);
    let have = tree_of(have);
    if want == have {
        return Ok(Vec::new());
    }

    if enable(want) == Some(&ENABLED) {
        return Ok(vec![emitter::positive(template, Scope::Tree(want))?]);
    }

    Ok(emitter::emit(
        template,
        decide(enable(want), enable(have)),
        Some(Scope::Tree(want)),
        Some(Scope::Tree(have)),
    )?)
}

fn compare_inline(template: &Template, want: Option<&Value>, have: Option<&Value>) -> Result<Vec<Command>> {
    let want = entities_of(want);
    let have = entities_of(have);
    let mut out = Vec::new();

    for (key, entry) in have {
        if !want.contains_key(key) {
            out.push(emitter::negative(template, Scope::Tree(entry))?);
        }
    }
    for (key, entry) in want {
        if have.get(key) != Some(entry) {
            out.push(emitter::positive(template, Scope::Tree(entry))?);
        }
    }

    Ok(out)
}

fn compare_gated(
    enable: &Template,
    fields: &[FieldSpec],
    want: &ConfigTree,
    have: &ConfigTree,
) -> Result<Vec<Command>> {
    let w = want.field("enable");
    let h = have.field("enable");
    let enabled = w == Some(&ENABLED);
    let toggle = emitter::emit_values(enable, decide(w, h), w, h)?;

    if toggle.is_empty() {
        if !enabled {
            return Ok(toggle);
        }
        let inner = compare_fields(fields, want, have)?;
        if inner.is_empty() {
            return Ok(inner);
        }
        return Ok(bracket(emitter::positive(enable, Scope::Tree(want))?, inner));
    }

    let mut out = toggle;
    if enabled {
        out.extend(compare_fields(fields, want, have)?);
        out.push(Command::exit());
    }
    Ok(out)
}

// ============================================================================
// Deletion
// ============================================================================

fn delete_single(block: &BlockSpec, want: &ConfigTree, have: &ConfigTree) -> Result<Vec<Command>> {
    let target = if want.is_empty() { have } else { want };
    delete_entity(block, target, have)
}

fn delete_entities(block: &BlockSpec, want: &Entities, have: &Entities) -> Result<Vec<Command>> {
    let mut removals = Vec::new();
    let mut cleared = Vec::new();

    for (key, entity) in have {
        let (target, whole) = if want.is_empty() {
            (entity, block.purge_whole)
        } else {
            let Some(target) = want.get(key) else {
                continue;
            };
            let whole = match block.delete_match {
                DeleteMatch::Exact => target == entity,
                DeleteMatch::Covered => covers(target, entity),
                DeleteMatch::Never => false,
            };
            (target, whole)
        };

        if whole {
            debug!("Removing {} {key}", block.name);
            removals.push(emitter::removal(block, entity)?);
        } else {
            cleared.extend(delete_entity(block, target, entity)?);
        }
    }

    removals.extend(cleared);
    Ok(removals)
}

fn delete_entity(block: &BlockSpec, want: &ConfigTree, have: &ConfigTree) -> Result<Vec<Command>> {
    let inner = delete_fields(block.fields, want, have)?;
    if inner.is_empty() {
        return Ok(inner);
    }
    Ok(bracket(emitter::enter(block, have)?, inner))
}

/// Negates the fields both sides agree on; a field want does not restate
/// identically is left alone.
fn delete_fields(fields: &[FieldSpec], want: &ConfigTree, have: &ConfigTree) -> Result<Vec<Command>> {
    let mut out = Vec::new();

    for field in fields {
        let w = want.get(field.path);
        let h = have.get(field.path);

        match field.kind {
            FieldKind::Linear(template) | FieldKind::Paired(template) | FieldKind::Exclusive(template) => {
                if h.is_some() && w == h {
                    out.extend(emitter::emit_values(&template, decide_removal(h), None, h)?);
                }
            }
            FieldKind::DefaultOn(template) => {
                if h.is_some() && w == h && h != Some(&ENABLED) {
                    out.extend(emitter::emit_values(&template, decide_removal(h), None, h)?);
                }
            }
            FieldKind::Set(template) => {
                for item in set_of(w).intersection(set_of(h)) {
                    out.push(emitter::negative(&template, Scope::Value(&Value::from(item.as_str())))?);
                }
            }
            FieldKind::Dual(template) => {
                if let (Some(wt), Some(ht)) = (w.and_then(Value::as_tree), h.and_then(Value::as_tree))
                    && wt == ht
                {
                    out.extend(emitter::emit(
                        &template,
                        decide_removal(ht.field("enable")),
                        None,
                        Some(Scope::Tree(ht)),
                    )?);
                }
            }
            FieldKind::Entries(template) => {
                let want = entities_of(w);
                for (key, entry) in entities_of(h) {
                    let Some(requested) = want.get(key) else {
                        continue;
                    };
                    let common = requested.intersection(entry);
                    if !common.is_empty() {
                        out.push(emitter::negative(&template, Scope::Tree(&common))?);
                    }
                }
            }
            FieldKind::Gated { enable, fields } => {
                if let (Some(wt), Some(ht)) = (w.and_then(Value::as_tree), h.and_then(Value::as_tree)) {
                    out.extend(delete_gated(&enable, fields, wt, ht)?);
                }
            }
            FieldKind::Nested(block) => {
                if let Some(requested) = w.and_then(Value::as_entities) {
                    out.extend(delete_entities(block, requested, entities_of(h))?);
                }
            }
        }
    }

    Ok(out)
}

fn delete_gated(
    enable: &Template,
    fields: &[FieldSpec],
    want: &ConfigTree,
    have: &ConfigTree,
) -> Result<Vec<Command>> {
    if want == have {
        return Ok(vec![emitter::negative(enable, Scope::Tree(have))?]);
    }

    let inner = delete_fields(fields, want, have)?;
    if !inner.is_empty() {
        return Ok(bracket(emitter::positive(enable, Scope::Tree(have))?, inner));
    }

    let both_enabled =
        want.field("enable") == Some(&ENABLED) && have.field("enable") == Some(&ENABLED);
    if both_enabled {
        return Ok(vec![emitter::negative(enable, Scope::Tree(have))?]);
    }
    Ok(Vec::new())
}

// ============================================================================
// Helpers
// ============================================================================

/// Every field have holds is restated identically by want.
fn covers(want: &ConfigTree, have: &ConfigTree) -> bool {
    have.iter().all(|(name, value)| want.field(name) == Some(value))
}

fn tree_of(value: Option<&Value>) -> &ConfigTree {
    value.and_then(Value::as_tree).unwrap_or(&EMPTY_TREE)
}

fn entities_of(value: Option<&Value>) -> &Entities {
    value.and_then(Value::as_entities).unwrap_or(&EMPTY_ENTITIES)
}

fn set_of(value: Option<&Value>) -> &BTreeSet<String> {
    value.and_then(Value::as_set).unwrap_or(&EMPTY_SET)
}
