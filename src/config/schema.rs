//! Declared parameter schemas.
//!
//! Every resource declares the accepted shape of its `config` parameter as a
//! static [`Shape`] tree. The validator walks it to coerce and check input,
//! the normalizer walks it to key repeated blocks.

/// Accepted shape of a parameter.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// Boolean option.
    Bool,
    /// Integer option.
    Int,
    /// Free-form string.
    Str,
    /// String restricted to a fixed set of choices.
    Choice(&'static [&'static str]),
    /// Unordered list of strings, canonicalized into a set.
    StrList,
    /// Nested dictionary.
    Dict(&'static DictSchema),
    /// List of dictionaries keyed by identifying fields.
    Entries(&'static EntrySchema),
}

/// A single named parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    /// Parameter name.
    pub name: &'static str,
    /// Accepted shape.
    pub shape: Shape,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Value assumed for an absent boolean.
    pub default: Option<bool>,
}

impl Param {
    /// Declares an optional parameter.
    #[must_use]
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
            default: None,
        }
    }

    /// Marks the parameter as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Gives an absent boolean parameter a default value.
    #[must_use]
    pub const fn default_bool(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }
}

/// Schema of a dictionary parameter.
#[derive(Debug, Clone, Copy)]
pub struct DictSchema {
    /// Accepted keys.
    pub params: &'static [Param],
    /// Groups of keys of which at most one may be set.
    pub mutually_exclusive: &'static [&'static [&'static str]],
    /// Groups of keys that must be set all together or not at all.
    pub required_together: &'static [&'static [&'static str]],
    /// `(key, requirement)` pairs: setting `key` requires `requirement`.
    pub required_by: &'static [(&'static str, &'static str)],
}

impl DictSchema {
    /// Declares a dictionary without cross-field constraints.
    #[must_use]
    pub const fn new(params: &'static [Param]) -> Self {
        Self {
            params,
            mutually_exclusive: &[],
            required_together: &[],
            required_by: &[],
        }
    }

    /// Adds mutually exclusive groups.
    #[must_use]
    pub const fn exclusive(mut self, groups: &'static [&'static [&'static str]]) -> Self {
        self.mutually_exclusive = groups;
        self
    }

    /// Adds required-together groups.
    #[must_use]
    pub const fn together(mut self, groups: &'static [&'static [&'static str]]) -> Self {
        self.required_together = groups;
        self
    }

    /// Adds required-by pairs.
    #[must_use]
    pub const fn required_by(mut self, pairs: &'static [(&'static str, &'static str)]) -> Self {
        self.required_by = pairs;
        self
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Schema of a list of keyed dictionaries.
#[derive(Debug, Clone, Copy)]
pub struct EntrySchema {
    /// Entity kind, used in diagnostics.
    pub entity: &'static str,
    /// Identifying fields, in key order.
    pub key: &'static [&'static str],
    /// Schema of each entry.
    pub item: DictSchema,
}

/// Shared schema of an `enable` + `attach_policy` pair.
pub static ATTACH_POLICY: DictSchema = DictSchema::new(&[
    Param::new("enable", Shape::Bool),
    Param::new("attach_policy", Shape::Str),
])
.required_by(&[("attach_policy", "enable")]);
