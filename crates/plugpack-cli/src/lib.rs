//! plugpack library - expose modules for testing
//!
//! This library exposes the pipeline stages and supporting modules needed
//! for testing and integration.

pub mod common;
pub mod decision;
pub mod descriptor;
pub mod errors;
pub mod layout;
pub mod packaging_config;
pub mod pipeline;
pub mod stages;

pub use common::GlobalOpts;
pub use plugpack_logger as logger;
