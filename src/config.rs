//! Project-wide builder defaults, loadable from TOML.
//!
//! Defaults are an explicit value handed to
//! [`crate::builder::ChunkBuilder::with_defaults`], never ambient
//! process state. A typical defaults file:
//!
//! ```toml
//! project = "context-harness"
//! unit_id = "ingest"
//! language = "en"
//! chunking_version = "1.0"
//! status = "raw"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::status::ChunkStatus;

/// Defaults applied to fields a caller leaves unset.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BuilderDefaults {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_chunking_version")]
    pub chunking_version: Option<String>,
    /// Initial lifecycle status for new chunks. The builder falls back
    /// to `raw` when neither the input nor the defaults set one.
    #[serde(default)]
    pub status: Option<ChunkStatus>,
}

fn default_chunking_version() -> Option<String> {
    Some("1.0".to_string())
}

pub fn load_defaults(path: &Path) -> Result<BuilderDefaults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read defaults file: {}", path.display()))?;

    let defaults: BuilderDefaults =
        toml::from_str(&content).with_context(|| "Failed to parse defaults file")?;

    if let Some(lang) = &defaults.language {
        if lang.is_empty() {
            anyhow::bail!("language default must not be empty");
        }
    }

    if let Some(version) = &defaults.chunking_version {
        if version.is_empty() {
            anyhow::bail!("chunking_version default must not be empty");
        }
    }

    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_defaults(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chunks.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_load_full_defaults() {
        let (_tmp, path) = write_defaults(
            r#"
project = "harness"
unit_id = "ingest"
language = "en"
chunking_version = "2.1"
status = "new"
"#,
        );
        let defaults = load_defaults(&path).unwrap();
        assert_eq!(defaults.project.as_deref(), Some("harness"));
        assert_eq!(defaults.unit_id.as_deref(), Some("ingest"));
        assert_eq!(defaults.language.as_deref(), Some("en"));
        assert_eq!(defaults.chunking_version.as_deref(), Some("2.1"));
        assert_eq!(defaults.status, Some(ChunkStatus::New));
    }

    #[test]
    fn test_empty_file_gets_chunking_version_default() {
        let (_tmp, path) = write_defaults("");
        let defaults = load_defaults(&path).unwrap();
        assert_eq!(defaults.project, None);
        assert_eq!(defaults.chunking_version.as_deref(), Some("1.0"));
        assert_eq!(defaults.status, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let (_tmp, path) = write_defaults("status = \"golden\"\n");
        assert!(load_defaults(&path).is_err());
    }

    #[test]
    fn test_empty_language_is_rejected() {
        let (_tmp, path) = write_defaults("language = \"\"\n");
        assert!(load_defaults(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_defaults(&tmp.path().join("absent.toml")).is_err());
    }
}
