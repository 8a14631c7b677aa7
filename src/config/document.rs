//! Task document types.
//!
//! A task document mirrors one module invocation: which resource to act on,
//! the reconciliation state to reach, the desired `config` and optionally a
//! device `running_config` to parse.

use serde::{Deserialize, Serialize};

use crate::resources::ResourceKind;

/// Root task document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDocument {
    /// Resource to reconcile.
    pub resource: ResourceKind,

    /// Requested reconciliation mode.
    #[serde(default)]
    pub state: Mode,

    /// Desired configuration, shaped per resource.
    #[serde(default)]
    pub config: Option<serde_json::Value>,

    /// Device configuration text used by the `parsed` state.
    #[serde(default)]
    pub running_config: Option<String>,
}

/// Reconciliation mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Add and change what want declares, keep everything else.
    #[default]
    Merged,
    /// Make every declared entity match want exactly.
    Replaced,
    /// Remove what want names, or everything when want is empty.
    Deleted,
    /// Report the device configuration as structured data.
    Gathered,
    /// Parse supplied configuration text into structured data.
    Parsed,
    /// Render want as commands against an empty device.
    Rendered,
}

impl Mode {
    /// Returns true for modes that produce commands.
    #[must_use]
    pub const fn generates_commands(self) -> bool {
        matches!(
            self,
            Self::Merged | Self::Replaced | Self::Deleted | Self::Rendered
        )
    }

    /// Returns true for modes that cannot run without a desired config.
    #[must_use]
    pub const fn requires_config(self) -> bool {
        matches!(self, Self::Merged | Self::Replaced | Self::Rendered)
    }

    /// Returns true for modes that read the device configuration.
    #[must_use]
    pub const fn reads_device(self) -> bool {
        matches!(
            self,
            Self::Merged | Self::Replaced | Self::Deleted | Self::Gathered
        )
    }

    /// Returns the state name as written in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::Replaced => "replaced",
            Self::Deleted => "deleted",
            Self::Gathered => "gathered",
            Self::Parsed => "parsed",
            Self::Rendered => "rendered",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TaskDocument {
    /// Creates a document with no config.
    #[must_use]
    pub const fn new(resource: ResourceKind, state: Mode) -> Self {
        Self {
            resource,
            state,
            config: None,
            running_config: None,
        }
    }

    /// Sets the desired config.
    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the running config text.
    #[must_use]
    pub fn with_running_config(mut self, text: impl Into<String>) -> Self {
        self.running_config = Some(text.into());
        self
    }

    /// Returns true when `config` carries at least one value.
    #[must_use]
    pub fn has_config(&self) -> bool {
        match &self.config {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_properties() {
        assert!(Mode::Rendered.generates_commands());
        assert!(!Mode::Rendered.reads_device());
        assert!(!Mode::Parsed.generates_commands());
        assert!(Mode::Gathered.reads_device());
        assert!(!Mode::Deleted.requires_config());
        assert_eq!(Mode::default(), Mode::Merged);
    }

    #[test]
    fn test_has_config() {
        let doc = TaskDocument::new(ResourceKind::L2vpn, Mode::Merged);
        assert!(!doc.has_config());
        assert!(!doc.clone().with_config(serde_json::json!({})).has_config());
        assert!(!doc.clone().with_config(serde_json::json!([])).has_config());
        assert!(doc.with_config(serde_json::json!({"shutdown": true})).has_config());
    }
}
