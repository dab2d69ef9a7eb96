//! Manifest store - idempotent mutator operations over the root and
//! staging copies of the manifest document.
//!
//! Every mutation is whole-document read-modify-write so that re-running
//! the pipeline converges to the same manifest content instead of losing
//! fields or accumulating duplicates.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::{ManifestDocument, MANIFEST_FILENAME};
use crate::errors::ManifestError;
use crate::token::{generate_token, PLUGIN_ID_LEN, PLUGIN_KEY_LEN};

/// Identity fields used to populate a freshly created root manifest
#[derive(Debug, Clone)]
pub struct ManifestIdentity {
    pub name: String,
    pub desc: String,
    pub version_name: String,
    pub version_code: i64,
    pub js_main_path: String,
}

/// Handles the two on-disk manifest copies: the root copy (source of
/// truth, created once) and the staging copy (mutated during the
/// pipeline).
#[derive(Debug, Clone)]
pub struct ManifestStore {
    root_path: PathBuf,
    staging_path: PathBuf,
}

impl ManifestStore {
    /// Create a store for a project root and a staging directory
    pub fn new(project_root: &Path, staging_dir: &Path) -> Self {
        ManifestStore {
            root_path: project_root.join(MANIFEST_FILENAME),
            staging_path: staging_dir.join(MANIFEST_FILENAME),
        }
    }

    /// Path of the root manifest copy
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Path of the staging manifest copy
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// Load the root manifest copy
    pub fn load_root(&self) -> Result<ManifestDocument, ManifestError> {
        if !self.root_path.exists() {
            return Err(ManifestError::RootMissing(
                self.root_path.display().to_string(),
            ));
        }
        ManifestDocument::load_from_path(&self.root_path)
    }

    /// Load the staging manifest copy
    pub fn load_staging(&self) -> Result<ManifestDocument, ManifestError> {
        ManifestDocument::load_from_path(&self.staging_path)
    }

    /// Create the root manifest only if absent, populating identity fields
    /// and freshly generated plugin tokens. Returns true if a new manifest
    /// was created. An existing root manifest is never touched, so the
    /// plugin identity survives rebuilds.
    pub fn bootstrap_root(&self, identity: &ManifestIdentity) -> Result<bool, ManifestError> {
        if self.root_path.exists() {
            debug!("Root manifest already present: {:?}", self.root_path);
            return Ok(false);
        }

        let document = ManifestDocument {
            name: identity.name.clone(),
            desc: identity.desc.clone(),
            icon_path: None,
            version_name: identity.version_name.clone(),
            version_code: identity.version_code,
            plugin_id: generate_token(PLUGIN_ID_LEN),
            plugin_key: generate_token(PLUGIN_KEY_LEN),
            js_main_path: identity.js_main_path.clone(),
            react_packages: Vec::new(),
            native_code_package: None,
        };

        document.save_to_path(&self.root_path)?;
        info!("Created root manifest: {:?}", self.root_path);
        Ok(true)
    }

    /// Copy the root manifest into the staging location if the staging
    /// copy is absent. Returns true if a copy was made.
    pub fn seed_staging(&self) -> Result<bool, ManifestError> {
        if self.staging_path.exists() {
            debug!("Staging manifest already present: {:?}", self.staging_path);
            return Ok(false);
        }

        let document = self.load_root()?;
        document.save_to_path(&self.staging_path)?;
        info!("Seeded staging manifest: {:?}", self.staging_path);
        Ok(true)
    }

    /// Overwrite the staged manifest's icon path with a root-relative path
    pub fn set_icon_path(&self, relative_path: &str) -> Result<(), ManifestError> {
        self.update_staging(|document| {
            document.icon_path = Some(normalize_relative(relative_path));
        })
    }

    /// Overwrite the staged manifest's native code package field with a
    /// root-relative path
    pub fn set_native_code_package(&self, relative_path: &str) -> Result<(), ManifestError> {
        self.update_staging(|document| {
            document.native_code_package = Some(normalize_relative(relative_path));
        })
    }

    /// Overwrite `reactPackages` with the deduplicated, sorted union of
    /// discovered package references. An empty union writes an empty list,
    /// never a stale value from a previous run.
    pub fn merge_packages(&self, references: &BTreeSet<String>) -> Result<(), ManifestError> {
        self.update_staging(|document| {
            document.react_packages = references.iter().cloned().collect();
        })
    }

    /// Read the full staging document, apply a targeted mutation, write
    /// the full document back
    fn update_staging<F>(&self, mutate: F) -> Result<(), ManifestError>
    where
        F: FnOnce(&mut ManifestDocument),
    {
        let mut document = self.load_staging()?;
        mutate(&mut document);
        document.save_to_path(&self.staging_path)
    }
}

/// Root-relative paths in the manifest begin with a path separator
fn normalize_relative(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
