use std::io;
use thiserror::Error;

/// Errors that can occur during plugin manifest operations
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Root manifest not found: {0}")]
    RootMissing(String),
}
