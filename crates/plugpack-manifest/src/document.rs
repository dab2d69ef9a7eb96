//! The plugin manifest document - the structured descriptor shipped at the
//! root of the packaged archive and consumed by the plugin host.
//!
//! Field names are the exact keys the host expects, so serde renames are
//! spelled out instead of relying on a rename-all rule (`pluginID` is not
//! camelCase).

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::errors::ManifestError;

/// Filename of the manifest document in both the project root and the
/// staging directory
pub const MANIFEST_FILENAME: &str = "plugin.json";

/// The plugin manifest document.
///
/// `react_packages` is always serialized (the host expects the key even when
/// the list is empty); `native_code_package` is present only when a native
/// artifact was produced, and `icon_path` only when an icon was staged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDocument {
    pub name: String,

    pub desc: String,

    #[serde(rename = "iconPath", skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,

    #[serde(rename = "versionName")]
    pub version_name: String,

    #[serde(rename = "versionCode")]
    pub version_code: i64,

    #[serde(rename = "pluginID")]
    pub plugin_id: String,

    #[serde(rename = "pluginKey")]
    pub plugin_key: String,

    #[serde(rename = "jsMainPath")]
    pub js_main_path: String,

    #[serde(rename = "reactPackages", default)]
    pub react_packages: Vec<String>,

    #[serde(rename = "nativeCodePackage", skip_serializing_if = "Option::is_none")]
    pub native_code_package: Option<String>,
}

impl ManifestDocument {
    /// Load a manifest document from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        debug!("Loading manifest from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let document: ManifestDocument = serde_json::from_str(&content)?;
        Ok(document)
    }

    /// Save the manifest document to a specific path with atomic write
    pub fn save_to_path(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("json.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }

        std::fs::rename(&temp_path, path)?;
        debug!("Manifest written to: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_document() -> ManifestDocument {
        ManifestDocument {
            name: "crossword-helper".to_string(),
            desc: "Puzzle helper plugin".to_string(),
            icon_path: None,
            version_name: "1.2.0".to_string(),
            version_code: 12,
            plugin_id: "abcd1234abcd1234".to_string(),
            plugin_key: "k".repeat(32),
            js_main_path: "/index.bundle".to_string(),
            react_packages: Vec::new(),
            native_code_package: None,
        }
    }

    #[test]
    fn test_exact_field_keys() {
        let mut document = sample_document();
        document.icon_path = Some("/icon.png".to_string());
        document.native_code_package = Some("/native.apk".to_string());

        let json = serde_json::to_string(&document).unwrap_or_default();
        for key in [
            "\"name\"",
            "\"desc\"",
            "\"iconPath\"",
            "\"versionName\"",
            "\"versionCode\"",
            "\"pluginID\"",
            "\"pluginKey\"",
            "\"jsMainPath\"",
            "\"reactPackages\"",
            "\"nativeCodePackage\"",
        ] {
            assert!(json.contains(key), "missing key {} in {}", key, json);
        }
    }

    #[test]
    fn test_optional_fields_omitted_when_unset() {
        let document = sample_document();
        let json = serde_json::to_string(&document).unwrap_or_default();

        assert!(!json.contains("nativeCodePackage"));
        assert!(!json.contains("iconPath"));
        // reactPackages stays present even when empty
        assert!(json.contains("\"reactPackages\":[]"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join(MANIFEST_FILENAME);

        let mut document = sample_document();
        document.react_packages = vec!["com.example.FooPackage".to_string()];

        assert!(document.save_to_path(&path).is_ok());
        let loaded = ManifestDocument::load_from_path(&path);
        assert!(loaded.is_ok_and(|d| d == document));
    }

    #[test]
    fn test_load_tolerates_missing_react_packages() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join(MANIFEST_FILENAME);

        // A freshly bootstrapped root manifest written by an older run may
        // predate the reactPackages field
        let raw = r#"{
            "name": "p",
            "desc": "d",
            "versionName": "1.0.0",
            "versionCode": 1,
            "pluginID": "abcd1234abcd1234",
            "pluginKey": "kkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkk",
            "jsMainPath": "/index.bundle"
        }"#;
        assert!(std::fs::write(&path, raw).is_ok());

        let loaded = ManifestDocument::load_from_path(&path);
        assert!(loaded.is_ok_and(|d| d.react_packages.is_empty()));
    }
}
