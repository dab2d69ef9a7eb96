//! Symbol resolution: mapping bare names found at declarations and
//! registration call sites to fully-qualified names, and deciding which
//! resolved names count as package references.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::unit::{CallSite, SourceUnit};

/// Naming convention suffix for a registrable extension class
pub const REGISTRABLE_SUFFIX: &str = "Package";

/// Capability markers a registrable-extension declaration implements or
/// extends. Any one of these in a class's supertype header qualifies it.
pub const CAPABILITY_MARKERS: &[&str] = &["ReactPackage", "TurboReactPackage", "BaseReactPackage"];

/// Resolve a bare type name against a file's import table and package.
/// First match wins: already dotted, imported, package-prefixed, bare.
pub fn resolve_type_name(
    package: Option<&str>,
    imports: &BTreeMap<String, String>,
    name: &str,
) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    if let Some(fq) = imports.get(name) {
        return fq.clone();
    }
    if let Some(pkg) = package {
        return format!("{}.{}", pkg, name);
    }
    name.to_string()
}

/// Resolve a registration call site to a fully-qualified name.
///
/// Constructor sites resolve through the import table and package prefix.
/// Variable sites resolve only through the file's local-alias table (which
/// already holds fully-qualified targets); a variable with no recorded
/// alias contributes nothing - that is not an error.
pub fn resolve_call_site(unit: &SourceUnit, site: &CallSite) -> Option<String> {
    match site {
        CallSite::Constructor(name) => Some(resolve_type_name(
            unit.package.as_deref(),
            &unit.imports,
            name,
        )),
        CallSite::Variable(name) => {
            let resolved = unit.local_aliases.get(name).cloned();
            if resolved.is_none() {
                debug!(
                    "Call site references variable '{}' with no recorded alias in {:?}",
                    name, unit.path
                );
            }
            resolved
        }
    }
}

/// Index of class declarations visible in a scanned set, keyed by
/// fully-qualified name. Value: whether the declaration carries a
/// capability marker.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    classes: BTreeMap<String, bool>,
}

impl DeclarationIndex {
    /// Build the index from a set of scanned units
    pub fn build(units: &[SourceUnit]) -> Self {
        let mut classes = BTreeMap::new();
        for unit in units {
            for class in &unit.classes {
                let fq = match &unit.package {
                    Some(pkg) => format!("{}.{}", pkg, class.name),
                    None => class.name.clone(),
                };
                // A marker seen in any declaration of the name wins
                let entry = classes.entry(fq).or_insert(false);
                *entry = *entry || class.is_registrable();
            }
        }
        DeclarationIndex { classes }
    }

    /// Accept a resolved name as a package reference: it must end with the
    /// registrable suffix and, when its declaration is visible, the
    /// declaration must carry a capability marker.
    pub fn accepts(&self, resolved: &str) -> bool {
        if !resolved.ends_with(REGISTRABLE_SUFFIX) {
            return false;
        }
        match self.classes.get(resolved) {
            Some(has_marker) => *has_marker,
            None => true,
        }
    }
}

/// Collect the deduplicated, order-normalized set of package references
/// from all registration call sites across the scanned units.
pub fn collect_references(units: &[SourceUnit]) -> BTreeSet<String> {
    let index = DeclarationIndex::build(units);

    let mut references = BTreeSet::new();
    for unit in units {
        for site in &unit.call_sites {
            let Some(resolved) = resolve_call_site(unit, site) else {
                continue;
            };
            if index.accepts(&resolved) {
                references.insert(resolved);
            } else {
                debug!("Rejected call site target '{}' in {:?}", resolved, unit.path);
            }
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::SourceUnit;
    use std::path::PathBuf;

    fn parse(name: &str, source: &str) -> SourceUnit {
        SourceUnit::parse(&PathBuf::from(name), source)
            .unwrap_or_else(|| panic!("source should parse"))
    }

    #[test]
    fn test_resolution_follows_import_table() {
        let unit = parse(
            "Main.kt",
            "import com.example.FooPackage\npackages.add(FooPackage())\n",
        );
        // resolve(name) == imports[name] whenever name is an import short-name
        for site in &unit.call_sites {
            let resolved = resolve_call_site(&unit, site);
            assert_eq!(resolved.as_deref(), Some("com.example.FooPackage"));
        }
    }

    #[test]
    fn test_dotted_name_returned_unchanged() {
        let unit = parse("Main.kt", "packages.add(com.example.FooPackage())\n");
        assert_eq!(
            resolve_call_site(&unit, &unit.call_sites[0]).as_deref(),
            Some("com.example.FooPackage")
        );
    }

    #[test]
    fn test_package_prefix_fallback() {
        let unit = parse(
            "Main.kt",
            "package com.example\nclass FooPackage : ReactPackage {}\npackages.add(FooPackage())\n",
        );
        assert_eq!(
            resolve_call_site(&unit, &unit.call_sites[0]).as_deref(),
            Some("com.example.FooPackage")
        );
    }

    #[test]
    fn test_bare_name_when_nothing_matches() {
        let unit = parse("Main.kt", "packages.add(FooPackage())\n");
        assert_eq!(
            resolve_call_site(&unit, &unit.call_sites[0]).as_deref(),
            Some("FooPackage")
        );
    }

    #[test]
    fn test_unresolvable_variable_contributes_nothing() {
        let unit = parse("Main.kt", "packages.add(mystery)\n");
        assert_eq!(resolve_call_site(&unit, &unit.call_sites[0]), None);
        assert!(collect_references(&[unit]).is_empty());
    }

    #[test]
    fn test_direct_and_alias_forms_resolve_identically() {
        let direct = parse(
            "Direct.kt",
            "package com.example\nclass FooPackage : ReactPackage {}\npackages.add(FooPackage())\n",
        );
        let aliased = parse(
            "Aliased.kt",
            "package com.example\nclass FooPackage : ReactPackage {}\nval bar = FooPackage()\npackages.add(bar)\n",
        );

        let from_direct = collect_references(std::slice::from_ref(&direct));
        let from_alias = collect_references(std::slice::from_ref(&aliased));
        assert_eq!(from_direct, from_alias);
        assert!(from_direct.contains("com.example.FooPackage"));
    }

    #[test]
    fn test_wrapped_declaration_header_still_accepted() {
        let unit = parse(
            "Main.kt",
            "package com.example\nclass FooPackage :\n    ReactPackage {\n}\npackages.add(FooPackage())\n",
        );
        let references = collect_references(&[unit]);
        assert!(references.contains("com.example.FooPackage"));
    }

    #[test]
    fn test_suffix_convention_filters_references() {
        let unit = parse(
            "Main.kt",
            "import com.example.SomeHelper\npackages.add(SomeHelper())\n",
        );
        assert!(collect_references(&[unit]).is_empty());
    }

    #[test]
    fn test_visible_declaration_without_marker_rejected() {
        let unit = parse(
            "Main.kt",
            "package com.example\nclass FakePackage {}\npackages.add(FakePackage())\n",
        );
        assert!(collect_references(&[unit]).is_empty());
    }

    #[test]
    fn test_duplicate_discoveries_deduplicated() {
        let one = parse(
            "One.kt",
            "import com.example.FooPackage\npackages.add(FooPackage())\n",
        );
        let two = parse(
            "Two.kt",
            "package com.example\npackages.add(FooPackage())\n",
        );
        let references = collect_references(&[one, two]);
        assert_eq!(references.len(), 1);
        assert!(references.contains("com.example.FooPackage"));
    }
}
