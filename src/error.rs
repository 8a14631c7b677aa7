//! Error types for the IOS reconciliation engine.
//!
//! This module provides the error hierarchy for every stage of a run:
//! loading the task document, validating parameters, parsing device text,
//! normalizing entities and rendering commands.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the reconciliation engine.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Malformed or ambiguous structural input.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// A command could not be rendered.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Parameter validation failed.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The task document could not be loaded.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Device configuration text could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural input errors surfaced before any command is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Two entries share the same identifier.
    #[error("Duplicate {entity} identifier '{key}'")]
    DuplicateKey {
        /// Kind of entity (instance, context, vlan, ...).
        entity: String,
        /// The repeated identifier.
        key: String,
    },

    /// An entry lacks one of its identifying fields.
    #[error("{entity} entry is missing identifying field '{field}'")]
    MissingIdentifier {
        /// Kind of entity.
        entity: String,
        /// The absent identifying field.
        field: String,
    },

    /// The document shape does not match the resource layout.
    #[error("Resource {resource} expects {expected} configuration")]
    ShapeMismatch {
        /// Resource name.
        resource: String,
        /// Expected shape description.
        expected: String,
    },
}

/// Command rendering errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A required placeholder had no value in scope.
    #[error("Template '{template}' has no value for placeholder '{placeholder}'")]
    Unbound {
        /// Template name.
        template: String,
        /// Dotted placeholder path.
        placeholder: String,
    },

    /// A placeholder resolved to a structured value.
    #[error("Template '{template}' placeholder '{placeholder}' is not a scalar")]
    NotScalar {
        /// Template name.
        template: String,
        /// Dotted placeholder path.
        placeholder: String,
    },
}

/// Parameter validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Validation failed for a field.
    #[error("Validation failed at {field}: {message}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// Description of the failure.
        message: String,
    },
}

/// Task document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document file was not found.
    #[error("Task document not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The document could not be deserialized.
    #[error("Failed to parse task document: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// The document combines fields in a way the state does not allow.
    #[error("Task document is invalid: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
        /// Field that is at fault.
        field: Option<String>,
    },
}

/// Device text parse errors.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A grammar rule pattern failed to compile.
    #[error("Invalid pattern for rule '{rule}': {message}")]
    InvalidPattern {
        /// Rule name.
        rule: String,
        /// Compiler message.
        message: String,
    },
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconError>;

impl ReconError {
    /// Returns true if the error was caused by the caller's input rather than
    /// by the environment.
    #[must_use]
    pub const fn is_input_fault(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::Schema(_) | Self::Document(_) | Self::Parse(_)
        )
    }
}

impl SchemaError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl DocumentError {
    /// Creates a document error tied to a field.
    #[must_use]
    pub fn invalid(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl TemplateError {
    /// Creates an unbound-placeholder error.
    #[must_use]
    pub fn unbound(template: &str, placeholder: impl Into<String>) -> Self {
        Self::Unbound {
            template: template.to_string(),
            placeholder: placeholder.into(),
        }
    }
}
