//! Planning module for the reconciliation engine.
//!
//! This module holds the building blocks the reconciler is assembled from:
//! - Entity normalization (lists to keyed maps and back)
//! - Deep merge of want onto have
//! - Per-field decisions
//! - Field tables, templates and the command emitter
//! - Command plans

pub mod diff;
pub mod emitter;
pub mod fields;
pub mod merge;
pub mod normalize;
mod plan;
pub mod template;

pub use diff::{Decision, Source, decide, decide_exclusive, decide_removal};
pub use fields::{BlockSpec, DeleteMatch, FieldKind, FieldSpec, Layout, Removal};
pub use plan::{CONFIRM_ANSWER, CONFIRM_PROMPT, Command, CommandPlan, EXIT};
pub use template::{Piece, Scope, Template};
