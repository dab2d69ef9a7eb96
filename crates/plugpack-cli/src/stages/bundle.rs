//! Script bundler invocation.
//!
//! The bundler is an external collaborator: it is handed the entry point,
//! target platform, bundle output path, and asset destination, and is
//! expected to populate the staging directory. Without its output there
//! is no usable package, so failure here is fatal.

use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::info;
use which::which;

use plugpack_logger as logger;

use crate::errors::PipelineError;
use crate::packaging_config::PackagingConfig;
use crate::stages::{StageOutcome, StageResult};

const BUNDLER_LAUNCHER: &str = "npx";

/// Run the script bundler, producing the bundle and asset tree inside the
/// staging directory
pub fn run_bundler(root: &Path, config: &PackagingConfig, staging_dir: &Path) -> StageResult {
    let launcher = which(BUNDLER_LAUNCHER)
        .map_err(|_| PipelineError::BundlerMissing(BUNDLER_LAUNCHER.to_string()))?;

    let bundle_output = staging_dir.join(&config.bundle_output);
    let assets_dest = staging_dir.join("assets");
    fs::create_dir_all(&assets_dest)?;

    info!(
        "Bundling {} for {} into {:?}",
        config.entry_file, config.platform, bundle_output
    );

    let output = Command::new(launcher)
        .current_dir(root)
        .args(["react-native", "bundle"])
        .args(["--platform", &config.platform])
        .args(["--dev", if config.dev { "true" } else { "false" }])
        .args(["--entry-file", &config.entry_file])
        .arg("--bundle-output")
        .arg(&bundle_output)
        .arg("--assets-dest")
        .arg(&assets_dest)
        .output()?;

    logger::capture_output("react-native bundle", &output);

    if !output.status.success() {
        return Err(PipelineError::BundlerFailed(
            output.status.code().unwrap_or(-1),
        ));
    }

    Ok(StageOutcome::Completed)
}
