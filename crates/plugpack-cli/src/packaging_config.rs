//! Packaging configuration from an optional `plugpack.toml` at the
//! project root. Every field has a default; an absent file is a default
//! run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::PipelineError;

pub const CONFIG_FILENAME: &str = "plugpack.toml";

/// Tunable packaging options
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PackagingConfig {
    /// Script bundle entry point, relative to the project root
    pub entry_file: String,

    /// Target platform passed to the bundler
    pub platform: String,

    /// Build a development bundle
    pub dev: bool,

    /// Bundle filename inside the staging directory; also drives the
    /// manifest's `jsMainPath`
    pub bundle_output: String,

    /// Fixed target passed to the native toolchain
    pub native_build_target: String,

    /// When true, the native build stage only runs if the staged manifest
    /// already carries a non-empty registrable-package list
    pub require_registered_packages: bool,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        PackagingConfig {
            entry_file: "index.js".to_string(),
            platform: "android".to_string(),
            dev: false,
            bundle_output: "index.bundle".to_string(),
            native_build_target: "assembleDebug".to_string(),
            require_registered_packages: false,
        }
    }
}

impl PackagingConfig {
    /// Load configuration from `<root>/plugpack.toml`, falling back to
    /// defaults when the file is absent. A present-but-invalid file is a
    /// configuration error, not a silent default.
    pub fn load(root: &Path) -> Result<Self, PipelineError> {
        let path = root.join(CONFIG_FILENAME);
        if !path.exists() {
            debug!("No {} found, using defaults", CONFIG_FILENAME);
            return Ok(PackagingConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| PipelineError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Root-relative manifest path of the bundle, beginning with a path
    /// separator
    pub fn js_main_path(&self) -> String {
        format!("/{}", self.bundle_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absent_file_yields_defaults() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let config = PackagingConfig::load(temp_dir.path());
        assert!(config.is_ok_and(|c| c.entry_file == "index.js"
            && c.platform == "android"
            && !c.dev
            && c.native_build_target == "assembleDebug"
            && !c.require_registered_packages));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let raw = "entry_file = \"app.js\"\nrequire_registered_packages = true\n";
        assert!(fs::write(temp_dir.path().join(CONFIG_FILENAME), raw).is_ok());

        let config = PackagingConfig::load(temp_dir.path());
        assert!(config.is_ok_and(|c| c.entry_file == "app.js"
            && c.require_registered_packages
            && c.bundle_output == "index.bundle"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        assert!(fs::write(temp_dir.path().join(CONFIG_FILENAME), "entry_file = [1,").is_ok());
        assert!(PackagingConfig::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_js_main_path_is_root_relative() {
        assert_eq!(PackagingConfig::default().js_main_path(), "/index.bundle");
    }
}
