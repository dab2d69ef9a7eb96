//! Dependency-module classification: which third-party modules are
//! ignorable framework libraries, and which carry native sources that
//! force a native build.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::grammar::SourceGrammar;

/// Framework and core modules that never need scanning. Entries ending in
/// `/*` are scope-prefix wildcards; matching is case-insensitive.
pub const IGNORED_MODULES: &[&str] = &[
    "react",
    "react-native",
    "react-dom",
    "metro",
    "@babel/*",
    "@types/*",
    "@react-native/*",
    "@react-native-community/*",
];

/// Candidate subdirectories, relative to a module root, that may hold
/// native sources
pub const NATIVE_SOURCE_ROOTS: &[&str] = &["android/src/main/java", "android/src/main/kotlin"];

/// A third-party source dependency and its native-source classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyModule {
    pub name: String,
    /// Candidate roots that exist and contain at least one source file
    pub native_source_roots: Vec<PathBuf>,
    /// Static deny-list classification - never discovered dynamically
    pub ignored: bool,
}

impl DependencyModule {
    /// A module requires a native build iff it is not ignored and at
    /// least one candidate root holds sources
    pub fn is_native_bearing(&self) -> bool {
        !self.ignored && !self.native_source_roots.is_empty()
    }
}

/// Check a module name against the deny-list, case-insensitively.
/// `@scope/*` entries match every module under that scope.
pub fn is_ignored_module(name: &str) -> bool {
    let lowered = name.to_lowercase();
    IGNORED_MODULES.iter().any(|pattern| {
        if let Some(scope) = pattern.strip_suffix("/*") {
            lowered
                .strip_prefix(&scope.to_lowercase())
                .is_some_and(|rest| rest.starts_with('/'))
        } else {
            lowered == pattern.to_lowercase()
        }
    })
}

/// Classify a single module rooted at `module_dir`. Deny-listed modules
/// are never probed, regardless of what is on disk.
pub fn classify_module(name: &str, module_dir: &Path) -> DependencyModule {
    if is_ignored_module(name) {
        debug!("Module '{}' is deny-listed, not scanning", name);
        return DependencyModule {
            name: name.to_string(),
            native_source_roots: Vec::new(),
            ignored: true,
        };
    }

    let native_source_roots: Vec<PathBuf> = NATIVE_SOURCE_ROOTS
        .iter()
        .map(|rel| module_dir.join(rel))
        .filter(|candidate| candidate.is_dir() && contains_source_files(candidate))
        .collect();

    DependencyModule {
        name: name.to_string(),
        native_source_roots,
        ignored: false,
    }
}

/// Classify every module under a `node_modules`-style directory,
/// descending one level into `@scope` directories. Results are sorted by
/// module name.
pub fn classify_modules(modules_root: &Path) -> Result<Vec<DependencyModule>> {
    let mut modules = Vec::new();

    if !modules_root.is_dir() {
        debug!("Modules root not present: {:?}", modules_root);
        return Ok(modules);
    }

    for entry in fs::read_dir(modules_root)?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if dir_name.starts_with('.') {
            continue;
        }

        if dir_name.starts_with('@') {
            for scoped in fs::read_dir(&path)?.flatten() {
                let scoped_path = scoped.path();
                if !scoped_path.is_dir() {
                    continue;
                }
                let Some(scoped_name) = scoped.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                let full_name = format!("{}/{}", dir_name, scoped_name);
                modules.push(classify_module(&full_name, &scoped_path));
            }
        } else {
            modules.push(classify_module(&dir_name, &path));
        }
    }

    modules.sort_by(|a, b| a.name.cmp(&b.name));

    info!(
        "Classified {} dependency modules, {} native-bearing",
        modules.len(),
        modules.iter().filter(|m| m.is_native_bearing()).count()
    );

    Ok(modules)
}

/// A candidate root counts only if it holds at least one file in either
/// recognized grammar
fn contains_source_files(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|entry| entry.file_type().is_file() && SourceGrammar::from_path(entry.path()).is_some())
}
