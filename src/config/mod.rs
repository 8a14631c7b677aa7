//! Configuration module for the reconciliation engine.
//!
//! This module handles everything that happens before reconciliation:
//! - Loading task documents (`iosrec.yaml`)
//! - Declared parameter schemas for each resource
//! - Validation of documents and parameters

mod document;
mod parser;
pub mod schema;
mod validator;

pub use document::{Mode, TaskDocument};
pub use parser::{DEFAULT_DOCUMENT_FILES, DocumentParser, find_document};
pub use schema::{DictSchema, EntrySchema, Param, Shape};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
