//! Plugpack Manifest Management
//!
//! This crate handles the plugin manifest document shipped alongside the
//! packaged artifact and consumed by the plugin host. It provides the
//! document type itself, JSON persistence, and the idempotent mutator
//! operations used by the packaging pipeline.
//!
//! The manifest lives on disk in two places: a root copy at the project
//! root (source of truth, created once and never overwritten) and a
//! staging copy inside the staging directory (mutated repeatedly while
//! the pipeline runs).

pub mod document;
pub mod errors;
pub mod store;
pub mod token;

pub use document::{ManifestDocument, MANIFEST_FILENAME};
pub use errors::ManifestError;
pub use store::{ManifestIdentity, ManifestStore};
pub use token::{generate_token, PLUGIN_ID_LEN, PLUGIN_KEY_LEN};
