//! Artifact assembly: staging the produced native binary and the icon,
//! then compressing the staging directory into the distributable archive.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use plugpack_manifest::ManifestStore;

use crate::errors::PipelineError;
use crate::layout::ProjectLayout;
use crate::stages::{StageOutcome, StageResult};

/// Fixed filename the native binary is staged under
pub const NATIVE_BUNDLE_FILENAME: &str = "native.apk";

/// Filenames containing this hint are preferred when several binaries
/// were produced
const CUSTOM_ARTIFACT_HINT: &str = "custom";

/// Locate the produced native binary, copy it into staging under the
/// fixed filename, and record it in the staged manifest
pub fn stage_native_artifact(layout: &ProjectLayout, store: &ManifestStore) -> StageResult {
    let Some(produced) = find_produced_binary(&layout.gradle_outputs_dir()) else {
        return Ok(StageOutcome::Skipped(
            "no native binary found in toolchain output".to_string(),
        ));
    };

    let staged = layout.staging_dir().join(NATIVE_BUNDLE_FILENAME);
    fs::copy(&produced, &staged)?;
    info!("Staged native binary {:?} as {:?}", produced, staged);

    store.set_native_code_package(NATIVE_BUNDLE_FILENAME)?;
    Ok(StageOutcome::Completed)
}

/// Pick a single produced binary from the toolchain output tree,
/// preferring one matching the custom naming hint. Candidates are walked
/// in sorted order so the choice is deterministic.
fn find_produced_binary(outputs_dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = WalkDir::new(outputs_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("apk"))
        .collect();
    candidates.sort();

    let preferred = candidates.iter().find(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(CUSTOM_ARTIFACT_HINT))
    });

    preferred.or(candidates.first()).cloned()
}

/// Copy the configured icon into staging under its original filename and
/// record it in the staged manifest. The icon reference in the root
/// manifest may be absolute or root-relative.
pub fn stage_icon(layout: &ProjectLayout, store: &ManifestStore) -> StageResult {
    let root_document = store.load_root()?;
    let Some(icon_ref) = root_document.icon_path.filter(|p| !p.is_empty()) else {
        return Ok(StageOutcome::Skipped("icon not configured".to_string()));
    };

    let source = resolve_icon_path(layout.root(), &icon_ref);
    if !source.is_file() {
        return Ok(StageOutcome::Skipped(format!(
            "icon file not found: {}",
            source.display()
        )));
    }

    let Some(filename) = source.file_name().and_then(|n| n.to_str()).map(String::from) else {
        return Ok(StageOutcome::Skipped(format!(
            "icon path has no filename: {}",
            source.display()
        )));
    };

    fs::copy(&source, layout.staging_dir().join(&filename))?;
    debug!("Staged icon {:?} as /{}", source, filename);

    store.set_icon_path(&filename)?;
    Ok(StageOutcome::Completed)
}

fn resolve_icon_path(root: &Path, icon_ref: &str) -> PathBuf {
    let as_path = Path::new(icon_ref);
    if as_path.is_absolute() && as_path.is_file() {
        return as_path.to_path_buf();
    }
    root.join(icon_ref.trim_start_matches('/'))
}

/// Compress the staging directory into an archive and rename it to the
/// distributable extension. Refuses to package a missing or empty
/// staging directory.
pub fn compress_staging(layout: &ProjectLayout, name: &str) -> Result<PathBuf, PipelineError> {
    let staging = layout.staging_dir();

    let entries = collect_staging_entries(&staging)?;
    if entries.is_empty() {
        return Err(PipelineError::EmptyStaging(staging.display().to_string()));
    }

    let archive_path = layout.archive_path(name);
    {
        let file = File::create(&archive_path)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for entry in &entries {
            let relative = entry.strip_prefix(&staging).unwrap_or(entry);
            builder.append_path_with_name(entry, relative)?;
        }

        builder.into_inner()?.finish()?;
    }

    let dist_path = layout.dist_path(name);
    fs::rename(&archive_path, &dist_path)?;
    info!("Packaged {} entries into {:?}", entries.len(), dist_path);

    Ok(dist_path)
}

/// Files under the staging directory, sorted so re-runs produce identical
/// archives with no duplicate entries
fn collect_staging_entries(staging: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !staging.is_dir() {
        return Err(PipelineError::EmptyStaging(staging.display().to_string()));
    }

    let mut entries: Vec<PathBuf> = WalkDir::new(staging)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    entries.sort();
    Ok(entries)
}
