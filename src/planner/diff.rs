//! Per-field decisions.
//!
//! Comparing one field of `want` against the same field of `have` yields a
//! [`Decision`]. Booleans follow the device grammar: a `false` in want only
//! matters when have holds `true`, and a `false` left behind in have is
//! restated positively once want stops mentioning the field.

use crate::tree::Value;

/// Which side a positive command is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Render from the desired value.
    Want,
    /// Render from the current value.
    Have,
}

/// Outcome of comparing one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to do.
    NoOp,
    /// Emit the positive command.
    Set(Source),
    /// Emit the negated command, restating the current value.
    Unset,
    /// Negate the current value, then set the desired one.
    Replace,
}

impl Decision {
    /// Returns true when the decision emits nothing.
    #[must_use]
    pub const fn is_noop(self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Compares a field between want and have.
#[must_use]
pub fn decide(want: Option<&Value>, have: Option<&Value>) -> Decision {
    match (want, have) {
        (Some(w), h) if Some(w) != h => match w {
            Value::Bool(false) if h == Some(&Value::Bool(true)) => Decision::Unset,
            Value::Bool(false) => Decision::NoOp,
            _ => Decision::Set(Source::Want),
        },
        (None, Some(Value::Bool(false))) => Decision::Set(Source::Have),
        (None, Some(_)) => Decision::Unset,
        _ => Decision::NoOp,
    }
}

/// Compares a field whose configured value must be cleared before a
/// different one can be set.
#[must_use]
pub fn decide_exclusive(want: Option<&Value>, have: Option<&Value>) -> Decision {
    match (want, have) {
        (Some(w), Some(h)) if w != h && !matches!(w, Value::Bool(false)) => Decision::Replace,
        _ => decide(want, have),
    }
}

/// Decision for a field that survived a delete (equal on both sides):
/// clear what have holds.
#[must_use]
pub fn decide_removal(have: Option<&Value>) -> Decision {
    decide(None, have)
}
