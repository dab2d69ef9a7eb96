//! Project descriptor: identity metadata read once from the project's
//! `package.json` at pipeline start, immutable thereafter.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::PipelineError;

const DESCRIPTOR_FILENAME: &str = "package.json";

#[derive(Deserialize, Debug)]
struct RawDescriptor {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Project identity metadata
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub root: PathBuf,
    pub name: String,
    pub description: String,
    pub version: String,
}

impl ProjectDescriptor {
    /// Load the descriptor from `<root>/package.json`. A missing file or
    /// missing `name` field is unrecoverable and names the path.
    pub fn load(root: &Path) -> Result<Self, PipelineError> {
        let path = root.join(DESCRIPTOR_FILENAME);
        debug!("Loading project descriptor: {:?}", path);

        let content = fs::read_to_string(&path)
            .map_err(|_| PipelineError::Descriptor(path.display().to_string()))?;
        let raw: RawDescriptor = serde_json::from_str(&content)
            .map_err(|_| PipelineError::Descriptor(path.display().to_string()))?;

        let Some(name) = raw.name.filter(|n| !n.is_empty()) else {
            return Err(PipelineError::Descriptor(format!(
                "{} (missing \"name\")",
                path.display()
            )));
        };

        Ok(ProjectDescriptor {
            root: root.to_path_buf(),
            name,
            description: raw.description.unwrap_or_default(),
            version: raw.version.unwrap_or_else(|| "1.0.0".to_string()),
        })
    }

    /// Numeric version code for the manifest, derived from the semantic
    /// version: major * 10000 + minor * 100 + patch
    pub fn version_code(&self) -> i64 {
        let mut parts = self
            .version
            .split('.')
            .map(|p| p.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
            .map(|p| p.parse::<i64>().unwrap_or(0));

        let major = parts.next().unwrap_or(0);
        let minor = parts.next().unwrap_or(0);
        let patch = parts.next().unwrap_or(0);
        (major * 10000 + minor * 100 + patch).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_descriptor() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let raw = r#"{"name": "crossword-helper", "description": "Puzzle plugin", "version": "1.2.3"}"#;
        assert!(fs::write(temp_dir.path().join("package.json"), raw).is_ok());

        let descriptor = ProjectDescriptor::load(temp_dir.path());
        assert!(descriptor.is_ok());
        if let Ok(d) = descriptor {
            assert_eq!(d.name, "crossword-helper");
            assert_eq!(d.version, "1.2.3");
            assert_eq!(d.version_code(), 10203);
        }
    }

    #[test]
    fn test_missing_descriptor_is_fatal_and_names_path() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let err = ProjectDescriptor::load(temp_dir.path());
        assert!(err.is_err());
        if let Err(e) = err {
            assert!(e.to_string().contains("package.json"));
        }
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        assert!(fs::write(temp_dir.path().join("package.json"), r#"{"version": "1.0.0"}"#).is_ok());
        assert!(ProjectDescriptor::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_version_code_floor() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        assert!(fs::write(
            temp_dir.path().join("package.json"),
            r#"{"name": "p", "version": "0.0.0"}"#
        )
        .is_ok());
        let descriptor = ProjectDescriptor::load(temp_dir.path());
        assert!(descriptor.is_ok_and(|d| d.version_code() == 1));
    }
}
