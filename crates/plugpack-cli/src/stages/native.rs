//! Native toolchain invocation.
//!
//! Runs Gradle against the project's native source tree with a fixed
//! target. This stage only reports pass/fail; locating the produced
//! binary is the assembler's job, keeping build-failure detection
//! separate from artifact discovery. Failure aborts the native sub-stage
//! only - the pipeline still packages a non-native plugin.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;
use which::which;

use plugpack_logger as logger;
use plugpack_manifest::ManifestStore;

use crate::packaging_config::PackagingConfig;
use crate::stages::{StageOutcome, StageResult};

/// Run the native build in `android_dir` with the configured target
pub fn run_native_build(
    android_dir: &Path,
    config: &PackagingConfig,
    store: &ManifestStore,
) -> StageResult {
    if config.require_registered_packages {
        let staged = store.load_staging()?;
        if staged.react_packages.is_empty() {
            return Ok(StageOutcome::Skipped(
                "no registrable packages recorded in staged manifest".to_string(),
            ));
        }
    }

    let Some(tool) = find_toolchain(android_dir) else {
        return Ok(StageOutcome::Skipped(
            "native toolchain not available (no gradlew or gradle on PATH)".to_string(),
        ));
    };

    info!(
        "Running native build: {:?} {} in {:?}",
        tool, config.native_build_target, android_dir
    );

    // A wrapper that exists but cannot be launched (lost exec bit after an
    // archive checkout) degrades the same way as a failing build
    let output = match Command::new(&tool)
        .current_dir(android_dir)
        .arg(&config.native_build_target)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            logger::error(&format!("Failed to launch native toolchain {:?}: {}", tool, e));
            return Ok(StageOutcome::Skipped(
                "native toolchain failed to launch".to_string(),
            ));
        }
    };

    logger::capture_output("gradle", &output);

    if !output.status.success() {
        logger::error(&format!(
            "Native build failed with exit code {}",
            output.status.code().unwrap_or(-1)
        ));
        return Ok(StageOutcome::Skipped("native build failed".to_string()));
    }

    Ok(StageOutcome::Completed)
}

/// Prefer the project's Gradle wrapper; fall back to a `gradle` on PATH
fn find_toolchain(android_dir: &Path) -> Option<PathBuf> {
    let wrapper_name = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
    let wrapper = android_dir.join(wrapper_name);
    if wrapper.exists() {
        return Some(wrapper);
    }
    which("gradle").ok()
}
