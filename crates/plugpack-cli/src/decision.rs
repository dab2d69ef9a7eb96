//! Build decision engine: the single branch point of the pipeline.

use std::collections::BTreeSet;
use tracing::info;

use plugpack_scanner::DependencyModule;

/// Whether the native compilation stage must run. Computed once per run
/// from a complete scan; no intermediate states exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDecision {
    NoNativeWork,
    NativeBuildRequired,
}

/// A native build is required iff the project's own registration call
/// sites yielded at least one package reference, or at least one
/// dependency module is native-bearing.
pub fn decide(references: &BTreeSet<String>, modules: &[DependencyModule]) -> BuildDecision {
    let native_modules = modules.iter().filter(|m| m.is_native_bearing()).count();

    let decision = if !references.is_empty() || native_modules > 0 {
        BuildDecision::NativeBuildRequired
    } else {
        BuildDecision::NoNativeWork
    };

    info!(
        "Build decision: {:?} ({} package references, {} native-bearing modules)",
        decision,
        references.len(),
        native_modules
    );

    decision
}
