//! Line grammar declarations.
//!
//! A grammar is an ordered table of line rules. The first rule whose pattern
//! matches a line wins. Patterns are indentation-exact: one leading space
//! for entity-level lines, two for lines inside a nested block.

/// Where a rule writes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The entity the cursor is in.
    Entity,
    /// The nested block the cursor is in.
    Nested,
}

/// How a capture group becomes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// The matched text.
    Text,
    /// `true` when the group matched; omitted otherwise.
    Present,
}

/// One capture group copied into a field.
#[derive(Debug, Clone, Copy)]
pub struct Capture {
    /// Destination field.
    pub field: &'static str,
    /// Named group in the pattern.
    pub group: &'static str,
    /// Conversion.
    pub kind: CaptureKind,
}

impl Capture {
    /// Copies the group text into the field of the same name.
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self {
            field: name,
            group: name,
            kind: CaptureKind::Text,
        }
    }

    /// Records whether the group of the same name matched.
    #[must_use]
    pub const fn present(name: &'static str) -> Self {
        Self {
            field: name,
            group: name,
            kind: CaptureKind::Present,
        }
    }
}

/// What a matching line does.
#[derive(Debug, Clone, Copy)]
pub enum LineAction {
    /// Opens a top-level block, keyed by the named group when given.
    Open {
        /// Group holding the identifier; also the field it is stored in.
        key: Option<&'static str>,
    },
    /// Opens a nested keyed block inside the current entity.
    OpenNested {
        /// Path of the nested list.
        path: &'static [&'static str],
        /// Group holding the identifier; also the field it is stored in.
        key: &'static str,
    },
    /// Sets a boolean; a `negated` group turns it false.
    Flag(&'static [&'static str]),
    /// Stores the text of a group.
    Text {
        /// Destination path.
        path: &'static [&'static str],
        /// Named group.
        group: &'static str,
    },
    /// Appends the text of a group to a list.
    Append {
        /// Destination path.
        path: &'static [&'static str],
        /// Named group.
        group: &'static str,
    },
    /// Stores several groups as one sub-tree.
    Group {
        /// Destination path.
        path: &'static [&'static str],
        /// Groups to copy.
        captures: &'static [Capture],
    },
    /// Appends several groups as one entry of a list.
    Entry {
        /// Destination path.
        path: &'static [&'static str],
        /// Groups to copy.
        captures: &'static [Capture],
    },
}

/// One line rule.
#[derive(Debug, Clone, Copy)]
pub struct LineRule {
    /// Rule name, used in diagnostics.
    pub name: &'static str,
    /// Regular expression matched against the whole line.
    pub pattern: &'static str,
    /// Where the result goes.
    pub target: Target,
    /// What to do.
    pub action: LineAction,
}

impl LineRule {
    /// Declares an entity-level rule.
    #[must_use]
    pub const fn entity(name: &'static str, pattern: &'static str, action: LineAction) -> Self {
        Self {
            name,
            pattern,
            target: Target::Entity,
            action,
        }
    }

    /// Declares a rule for lines inside a nested block.
    #[must_use]
    pub const fn nested(name: &'static str, pattern: &'static str, action: LineAction) -> Self {
        Self {
            name,
            pattern,
            target: Target::Nested,
            action,
        }
    }
}

/// Ordered rule table of one resource.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    /// Rules, first match wins.
    pub rules: &'static [LineRule],
}
