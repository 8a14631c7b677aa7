//! Field tables.
//!
//! Each resource describes its command surface as static data: a
//! [`BlockSpec`] per block (how to enter and remove it) holding an ordered
//! list of [`FieldSpec`]s (how each field is compared and rendered). The
//! reconciler is generic over these tables.

use crate::tree::FieldPath;

use super::template::Template;

/// How a field is compared and rendered.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Single scalar or boolean option.
    Linear(Template),
    /// Group of sub-values emitted and negated together.
    Paired(Template),
    /// Boolean whose absence on the device reads as enabled.
    DefaultOn(Template),
    /// Option whose old value must be negated before a new one is set.
    Exclusive(Template),
    /// Unordered string set, one command per element.
    Set(Template),
    /// `enable` flag with an optional `attach_policy` companion.
    Dual(Template),
    /// Keyed one-line entries rendered from the whole entry.
    Entries(Template),
    /// Sub-mode opened by an `enable` flag.
    Gated {
        /// Command that opens the sub-mode.
        enable: Template,
        /// Fields inside the sub-mode, relative to the gate.
        fields: &'static [FieldSpec],
    },
    /// Keyed nested blocks with their own bracketing.
    Nested(&'static BlockSpec),
}

/// Static declaration of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Path relative to the enclosing entity.
    pub path: FieldPath,
    /// Comparison policy and template.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declares a field.
    #[must_use]
    pub const fn new(path: &'static [&'static str], kind: FieldKind) -> Self {
        Self {
            path: FieldPath::new(path),
            kind,
        }
    }
}

/// How a whole block is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Plain `no <enter>`.
    Plain,
    /// `no <enter>` answered at a confirmation prompt.
    Prompted,
}

/// When a delete request removes a block whole instead of field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMatch {
    /// Want restates the block exactly.
    Exact,
    /// Every field have holds is restated identically by want.
    Covered,
    /// Never; the block is always cleared field by field.
    Never,
}

/// Static declaration of a block.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    /// Entity kind, used in logs.
    pub name: &'static str,
    /// Command entering the block, rendered from the entity.
    pub enter: Template,
    /// Removal form.
    pub removal: Removal,
    /// Whether a delete with empty want removes each entity whole.
    pub purge_whole: bool,
    /// Whole-block removal rule for delete requests.
    pub delete_match: DeleteMatch,
    /// Fields in emission order.
    pub fields: &'static [FieldSpec],
}

/// Top-level arrangement of a resource.
#[derive(Debug, Clone, Copy)]
pub enum Layout {
    /// One block, configured as a dict.
    Single(&'static BlockSpec),
    /// Repeated blocks, configured as a list keyed by identifier.
    Keyed(&'static BlockSpec),
}

impl Layout {
    /// Returns the top-level block.
    #[must_use]
    pub const fn block(self) -> &'static BlockSpec {
        match self {
            Self::Single(block) | Self::Keyed(block) => block,
        }
    }
}
