//! Pipeline orchestrator.
//!
//! Stages run in a fixed order. Fatal errors propagate immediately;
//! recoverable skips are logged and the pipeline continues, so a project
//! with no native half still yields a usable plugin archive.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use plugpack_logger as logger;
use plugpack_manifest::{ManifestIdentity, ManifestStore};
use plugpack_scanner::{classify_modules, collect_references, scan_roots};

use crate::decision::{decide, BuildDecision};
use crate::descriptor::ProjectDescriptor;
use crate::errors::PipelineError;
use crate::layout::ProjectLayout;
use crate::packaging_config::PackagingConfig;
use crate::stages::{assemble, bundle, native, StageOutcome};

/// Run the full packaging pipeline for the project at `root`, returning
/// the path of the produced distributable
pub fn run(root: &Path) -> Result<PathBuf, PipelineError> {
    let descriptor = ProjectDescriptor::load(root)?;
    let config = PackagingConfig::load(root)?;
    let layout = ProjectLayout::new(root);

    logger::step(&format!(
        "Packaging {} {} at {:?}",
        descriptor.name, descriptor.version, root
    ));

    let staging = layout.staging_dir();
    fs::create_dir_all(&staging).map_err(|source| PipelineError::CreateDir {
        path: staging.display().to_string(),
        source,
    })?;

    logger::step("Bundling scripts");
    logger::spinner_start("Bundling scripts...");
    match bundle::run_bundler(root, &config, &staging) {
        Ok(_) => logger::spinner_success("Script bundle produced"),
        Err(e) => {
            logger::spinner_error("Script bundling failed");
            return Err(e);
        }
    }

    let store = ManifestStore::new(root, &staging);
    let identity = ManifestIdentity {
        name: descriptor.name.clone(),
        desc: descriptor.description.clone(),
        version_name: descriptor.version.clone(),
        version_code: descriptor.version_code(),
        js_main_path: config.js_main_path(),
    };
    store.bootstrap_root(&identity)?;
    store.seed_staging()?;

    logger::step("Scanning sources");
    let app_roots = layout.app_source_roots();
    let app_root_refs: Vec<&Path> = app_roots.iter().map(PathBuf::as_path).collect();
    let units = scan_roots(&app_root_refs)?;
    let references = collect_references(&units);
    let modules = classify_modules(&layout.node_modules())?;

    let decision = decide(&references, &modules);

    if decision == BuildDecision::NativeBuildRequired {
        run_native_stages(&layout, &config, &store)?;
    } else {
        logger::skip("native build", "no native work detected");
    }

    logger::step("Recording discovered packages");
    store.merge_packages(&references)?;

    match assemble::stage_icon(&layout, &store)? {
        StageOutcome::Completed => info!("Icon staged"),
        StageOutcome::Skipped(reason) => logger::skip("icon", &reason),
    }

    logger::step("Compressing staging directory");
    logger::spinner_start("Packaging...");
    match assemble::compress_staging(&layout, &descriptor.name) {
        Ok(dist_path) => {
            logger::spinner_success(&format!("Packaged {}", dist_path.display()));
            Ok(dist_path)
        }
        Err(e) => {
            logger::spinner_error("Packaging failed");
            Err(e)
        }
    }
}

/// Native compilation and artifact staging. Both sub-stages are
/// recoverable: a failed or skipped build simply leaves the plugin
/// without a native half.
fn run_native_stages(
    layout: &ProjectLayout,
    config: &PackagingConfig,
    store: &ManifestStore,
) -> Result<(), PipelineError> {
    logger::step("Running native build");
    logger::spinner_start("Building native sources...");
    match native::run_native_build(&layout.android_dir(), config, store) {
        Ok(StageOutcome::Completed) => {
            logger::spinner_success("Native build finished");
        }
        Ok(StageOutcome::Skipped(reason)) => {
            logger::spinner_stop();
            logger::skip("native build", &reason);
            return Ok(());
        }
        Err(e) => {
            logger::spinner_error("Native build errored");
            return Err(e);
        }
    }

    match assemble::stage_native_artifact(layout, store)? {
        StageOutcome::Completed => info!("Native artifact staged"),
        StageOutcome::Skipped(reason) => logger::skip("native artifact", &reason),
    }

    Ok(())
}
