//! Task document loading.
//!
//! Documents are YAML by default; files with a `.json` extension are read
//! with `serde_json`. The binary loads the working directory's `.env` before
//! argument parsing and the one next to the document before reading it.

use crate::error::{DocumentError, ReconError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::document::TaskDocument;

/// Loader for task documents.
#[derive(Debug, Default)]
pub struct DocumentParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl DocumentParser {
    /// Creates a new document parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Resolves a path against the base path.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Loads a task document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<TaskDocument> {
        let path = self.resolve(path);
        info!("Loading task document from: {}", path.display());

        let content = read_source(&path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            self.parse_json(&content, Some(&path))
        } else {
            self.parse_yaml(&content, Some(&path))
        }
    }

    /// Parses a task document from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<TaskDocument> {
        debug!("Parsing YAML task document");

        let document: TaskDocument = serde_yaml::from_str(content).map_err(|e| {
            ReconError::Document(DocumentError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })?;

        debug!(
            "Parsed task document for resource {} (state {})",
            document.resource, document.state
        );
        Ok(document)
    }

    /// Parses a task document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse_json(&self, content: &str, source: Option<&Path>) -> Result<TaskDocument> {
        debug!("Parsing JSON task document");

        serde_json::from_str(content).map_err(|e| {
            ReconError::Document(DocumentError::ParseError {
                message: format!("JSON parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Reads device configuration text from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn load_running_config(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = self.resolve(path);
        info!("Reading running config from: {}", path.display());
        read_source(&path)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self.resolve(".env");

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ReconError::Document(DocumentError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ReconError::Document(DocumentError::FileNotFound {
            path: path.to_path_buf(),
        }));
    }

    std::fs::read_to_string(path).map_err(|e| {
        ReconError::Document(DocumentError::ParseError {
            message: format!("Failed to read file: {e}"),
            location: Some(path.display().to_string()),
        })
    })
}

/// Default task document names to search for.
pub const DEFAULT_DOCUMENT_FILES: &[&str] = &["iosrec.yaml", "iosrec.yml", "iosrec.json"];

/// Finds the task document in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no task document is found.
pub fn find_document(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_DOCUMENT_FILES {
            let candidate = current.join(filename);
            if candidate.exists() {
                info!("Found task document: {}", candidate.display());
                return Ok(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ReconError::Document(DocumentError::FileNotFound {
        path: start.join(DEFAULT_DOCUMENT_FILES[0]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::resources::ResourceKind;

    #[test]
    fn test_parse_minimal_document() {
        let yaml = r"
resource: l2vpn
config:
  router_id: 4.4.4.4
  shutdown: true
";
        let document = DocumentParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(document.resource, ResourceKind::L2vpn);
        assert_eq!(document.state, Mode::Merged);
        assert!(document.has_config());
        assert!(document.running_config.is_none());
    }

    #[test]
    fn test_parse_keyed_document() {
        let yaml = r#"
resource: l2vpn_evpn_ptp
state: deleted
config:
  - instance: 123
    rd: "222:222"
    vpws_context:
      - context: TEST
        member: Vlan10
"#;
        let document = DocumentParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(document.resource, ResourceKind::L2vpnEvpnPtp);
        assert_eq!(document.state, Mode::Deleted);
        let config = document.config.unwrap();
        assert_eq!(config[0]["instance"], serde_json::json!(123));
    }

    #[test]
    fn test_unknown_top_level_field_is_rejected() {
        let yaml = "resource: l2vpn\nstates: merged\n";
        let err = DocumentParser::new().parse_yaml(yaml, None).unwrap_err();
        assert!(matches!(
            err,
            ReconError::Document(DocumentError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.json");
        std::fs::write(
            &path,
            r#"{"resource": "vlan_configuration", "state": "gathered"}"#,
        )
        .unwrap();

        let document = DocumentParser::new().load_file(&path).unwrap();
        assert_eq!(document.resource, ResourceKind::VlanConfiguration);
        assert_eq!(document.state, Mode::Gathered);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentParser::new()
            .with_base_path(dir.path())
            .load_file("absent.yaml")
            .unwrap_err();
        assert!(matches!(
            err,
            ReconError::Document(DocumentError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_find_document_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site").join("leaf1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("iosrec.yml"), "resource: l2vpn\n").unwrap();

        let found = find_document(&nested).unwrap();
        assert_eq!(found, dir.path().join("iosrec.yml"));
    }

    #[test]
    fn test_running_config_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("running.cfg"), "l2vpn\n shutdown\n").unwrap();
        let text = DocumentParser::new()
            .with_base_path(dir.path())
            .load_running_config("running.cfg")
            .unwrap();
        assert!(text.contains("shutdown"));
    }
}
