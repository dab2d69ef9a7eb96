//! Centralized error types for the plugpack pipeline
//!
//! Only unrecoverable failures become errors; recoverable conditions are
//! modeled as skipped stage outcomes instead (see `stages`).

use std::io;
use thiserror::Error;

use plugpack_manifest::ManifestError;

/// Fatal errors that abort the packaging pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Project descriptor missing or invalid: {0}")]
    Descriptor(String),

    #[error("Invalid packaging configuration in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir { path: String, source: io::Error },

    #[error("Script bundler not found: {0}")]
    BundlerMissing(String),

    #[error("Script bundler failed with exit code {0}")]
    BundlerFailed(i32),

    #[error("Staging directory missing or empty, refusing to produce an empty package: {0}")]
    EmptyStaging(String),

    #[error(transparent)]
    Scan(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors_name_the_missing_resource() {
        let err = PipelineError::Descriptor("/proj/package.json".to_string());
        assert!(err.to_string().contains("/proj/package.json"));

        let err = PipelineError::EmptyStaging("/proj/build/plugin".to_string());
        assert!(err.to_string().contains("/proj/build/plugin"));
    }
}
