//! Directory scanning: walk a source root and produce the set of
//! `SourceUnit`s for every file under a recognized grammar.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::grammar::SourceGrammar;
use crate::unit::SourceUnit;

/// Scan a root directory for source files in either recognized grammar.
///
/// A missing root is an empty scan, not an error - candidate roots are
/// probed speculatively. Unreadable files are logged and skipped. Results
/// are sorted by path so discovery order is deterministic.
pub fn scan_root(root: &Path) -> Result<Vec<SourceUnit>> {
    if !root.is_dir() {
        debug!("Source root not present, skipping: {:?}", root);
        return Ok(Vec::new());
    }

    let mut units = Vec::new();
    let mut files_scanned = 0;

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if !entry.file_type().is_file() || SourceGrammar::from_path(path).is_none() {
            continue;
        }

        files_scanned += 1;

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Error reading source file {:?}: {}", path, e);
                continue;
            }
        };

        if let Some(unit) = SourceUnit::parse(path, &content) {
            units.push(unit);
        }
    }

    units.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        "Scanned {} source files under {:?}, {} units extracted",
        files_scanned,
        root,
        units.len()
    );

    Ok(units)
}

/// Scan several roots and merge the results, preserving the per-root
/// deterministic order. The accumulator is threaded explicitly - no
/// shared state between scans.
pub fn scan_roots(roots: &[&Path]) -> Result<Vec<SourceUnit>> {
    let mut units = Vec::new();
    for root in roots {
        units.extend(scan_root(root)?);
    }
    Ok(units)
}
