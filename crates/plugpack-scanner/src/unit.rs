//! Per-file extraction into a normalized `SourceUnit`.
//!
//! Each grammar carries its own small set of extraction rules; everything
//! downstream (resolution, reference collection) operates on the
//! normalized unit and never looks at raw source again.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::grammar::{strip_comments, SourceGrammar};
use crate::resolve::{resolve_type_name, CAPABILITY_MARKERS};

/// A class declaration together with the capability markers found in its
/// supertype header. Any marker present classifies the class as a
/// registrable-extension declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub markers: Vec<String>,
}

impl ClassDecl {
    pub fn is_registrable(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// A registration call site: either a constructor expression passed
/// directly, or a bare variable reference bound earlier in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSite {
    Constructor(String),
    Variable(String),
}

/// Structured facts extracted from one source file. Derived during a scan
/// and discarded after resolution - never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub grammar: SourceGrammar,
    /// First package declaration, if any
    pub package: Option<String>,
    /// Import table: short name -> fully-qualified name
    pub imports: BTreeMap<String, String>,
    /// Local aliases: variable name -> fully-qualified constructor target
    pub local_aliases: BTreeMap<String, String>,
    pub classes: Vec<ClassDecl>,
    pub call_sites: Vec<CallSite>,
}

// Java rules
static JAVA_PACKAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*package\s+([A-Za-z_][\w.]*)\s*;").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static JAVA_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([A-Za-z_][\w.]*)\s*;").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static JAVA_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_]\w*)([^{;]*)\{").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static JAVA_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z_]\w*)\s*=\s*new\s+([A-Za-z_][\w.]*)\s*\(").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static JAVA_CALL_CTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\badd\s*\(\s*new\s+([A-Za-z_][\w.]*)\s*\(").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});

// Kotlin rules
static KOTLIN_PACKAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*package\s+([A-Za-z_][\w.]*)").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static KOTLIN_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*import\s+([A-Za-z_][\w.]*)(?:\s+as\s+([A-Za-z_]\w*))?")
        .unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static KOTLIN_CLASS: Lazy<Regex> = Lazy::new(|| {
    // The supertype list may wrap across lines, so the header runs to the
    // opening brace like the Java rule
    Regex::new(r"\bclass\s+([A-Za-z_]\w*)(?:\s*\([^)]*\))?\s*(?::([^{]*))?\{")
        .unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static KOTLIN_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:va[lr]\s+)?([a-z_]\w*)\s*=\s*((?:[A-Za-z_]\w*\.)*[A-Z]\w*)\s*\(")
        .unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});
static KOTLIN_CALL_CTOR: Lazy<Regex> = Lazy::new(|| {
    // Constructor targets follow class naming: an uppercase final segment,
    // optionally qualified
    Regex::new(r"\badd\s*\(\s*((?:[A-Za-z_]\w*\.)*[A-Z]\w*)\s*\(")
        .unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});

// Shared by both grammars: a bare lowercase identifier as the sole argument
static CALL_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\badd\s*\(\s*([a-z_]\w*)\s*\)").unwrap_or_else(|e| panic!("invalid pattern: {e}")));

impl SourceUnit {
    /// Parse one source file into a unit. Returns `None` when the file
    /// extension selects no recognized grammar.
    pub fn parse(path: &Path, source: &str) -> Option<SourceUnit> {
        let grammar = SourceGrammar::from_path(path)?;
        let text = strip_comments(source, grammar);

        let package = extract_package(grammar, &text);
        let imports = extract_imports(grammar, &text);
        let classes = extract_classes(grammar, &text);
        let local_aliases = extract_aliases(grammar, &text, package.as_deref(), &imports);
        let call_sites = extract_call_sites(grammar, &text);

        debug!(
            "Parsed {:?}: package={:?}, {} imports, {} classes, {} call sites",
            path,
            package,
            imports.len(),
            classes.len(),
            call_sites.len()
        );

        Some(SourceUnit {
            path: path.to_path_buf(),
            grammar,
            package,
            imports,
            local_aliases,
            classes,
            call_sites,
        })
    }
}

/// First package declaration only
fn extract_package(grammar: SourceGrammar, text: &str) -> Option<String> {
    let pattern = match grammar {
        SourceGrammar::Java => &*JAVA_PACKAGE,
        SourceGrammar::Kotlin => &*KOTLIN_PACKAGE,
    };
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_imports(grammar: SourceGrammar, text: &str) -> BTreeMap<String, String> {
    let mut imports = BTreeMap::new();

    match grammar {
        SourceGrammar::Java => {
            for captures in JAVA_IMPORT.captures_iter(text) {
                if let Some(fq) = captures.get(1).map(|m| m.as_str()) {
                    if let Some(short) = fq.rsplit('.').next() {
                        imports.insert(short.to_string(), fq.to_string());
                    }
                }
            }
        }
        SourceGrammar::Kotlin => {
            for captures in KOTLIN_IMPORT.captures_iter(text) {
                let Some(fq) = captures.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                // `import x.y.Z as W` binds W, not Z
                let short = captures
                    .get(2)
                    .map(|m| m.as_str())
                    .or_else(|| fq.rsplit('.').next());
                if let Some(short) = short {
                    imports.insert(short.to_string(), fq.to_string());
                }
            }
        }
    }

    imports
}

fn extract_classes(grammar: SourceGrammar, text: &str) -> Vec<ClassDecl> {
    let pattern = match grammar {
        SourceGrammar::Java => &*JAVA_CLASS,
        SourceGrammar::Kotlin => &*KOTLIN_CLASS,
    };

    let mut classes = Vec::new();
    for captures in pattern.captures_iter(text) {
        let Some(name) = captures.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let header = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let markers = header_markers(header);
        classes.push(ClassDecl {
            name: name.to_string(),
            markers,
        });
    }
    classes
}

/// Capability marker names present as tokens in a supertype header.
/// Qualified supertypes (`com.facebook.react.ReactPackage`) count via
/// their last segment.
fn header_markers(header: &str) -> Vec<String> {
    let tokens: Vec<&str> = header
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect();

    CAPABILITY_MARKERS
        .iter()
        .filter(|marker| tokens.iter().any(|t| t == *marker))
        .map(|marker| (*marker).to_string())
        .collect()
}

/// Assignment sites binding a local variable to a constructor target.
/// Covers `val bar = FooPackage()` and `FooPackage bar = new FooPackage()`.
/// Targets are stored fully qualified so variable call sites resolve in
/// one step.
fn extract_aliases(
    grammar: SourceGrammar,
    text: &str,
    package: Option<&str>,
    imports: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let pattern = match grammar {
        SourceGrammar::Java => &*JAVA_ALIAS,
        SourceGrammar::Kotlin => &*KOTLIN_ALIAS,
    };

    let mut aliases = BTreeMap::new();
    for captures in pattern.captures_iter(text) {
        let (Some(variable), Some(target)) = (
            captures.get(1).map(|m| m.as_str()),
            captures.get(2).map(|m| m.as_str()),
        ) else {
            continue;
        };
        aliases.insert(
            variable.to_string(),
            resolve_type_name(package, imports, target),
        );
    }
    aliases
}

fn extract_call_sites(grammar: SourceGrammar, text: &str) -> Vec<CallSite> {
    let ctor_pattern = match grammar {
        SourceGrammar::Java => &*JAVA_CALL_CTOR,
        SourceGrammar::Kotlin => &*KOTLIN_CALL_CTOR,
    };

    let mut sites = Vec::new();
    for captures in ctor_pattern.captures_iter(text) {
        if let Some(target) = captures.get(1).map(|m| m.as_str()) {
            sites.push(CallSite::Constructor(target.to_string()));
        }
    }
    for captures in CALL_VARIABLE.captures_iter(text) {
        if let Some(variable) = captures.get(1).map(|m| m.as_str()) {
            sites.push(CallSite::Variable(variable.to_string()));
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse_kotlin(source: &str) -> SourceUnit {
        SourceUnit::parse(&PathBuf::from("MainApplication.kt"), source)
            .unwrap_or_else(|| panic!("kotlin source should parse"))
    }

    fn parse_java(source: &str) -> SourceUnit {
        SourceUnit::parse(&PathBuf::from("MainApplication.java"), source)
            .unwrap_or_else(|| panic!("java source should parse"))
    }

    #[test]
    fn test_unrecognized_extension() {
        assert!(SourceUnit::parse(&PathBuf::from("index.js"), "add(x)").is_none());
    }

    #[test]
    fn test_package_first_match_only() {
        let unit = parse_java("package com.example.app;\npackage com.other;\n");
        assert_eq!(unit.package.as_deref(), Some("com.example.app"));
    }

    #[test]
    fn test_java_imports() {
        let unit = parse_java(
            "package app;\nimport com.example.FooPackage;\nimport static a.b.C.helper;\nimport com.example.*;\n",
        );
        assert_eq!(
            unit.imports.get("FooPackage").map(String::as_str),
            Some("com.example.FooPackage")
        );
        assert_eq!(unit.imports.get("helper").map(String::as_str), Some("a.b.C.helper"));
        // Wildcard imports carry no short name and are not recorded
        assert_eq!(unit.imports.len(), 2);
    }

    #[test]
    fn test_kotlin_import_alias() {
        let unit = parse_kotlin("import com.example.FooPackage as Foo\n");
        assert_eq!(
            unit.imports.get("Foo").map(String::as_str),
            Some("com.example.FooPackage")
        );
        assert!(!unit.imports.contains_key("FooPackage"));
    }

    #[test]
    fn test_kotlin_class_markers() {
        let unit = parse_kotlin("package com.example\nclass FooPackage : ReactPackage {\n}\n");
        assert_eq!(unit.classes.len(), 1);
        assert_eq!(unit.classes[0].name, "FooPackage");
        assert!(unit.classes[0].is_registrable());
        assert_eq!(unit.classes[0].markers, vec!["ReactPackage".to_string()]);
    }

    #[test]
    fn test_kotlin_wrapped_supertype_header() {
        let unit = parse_kotlin(
            "package com.example\nclass FooPackage :\n    ReactPackage {\n}\n",
        );
        assert_eq!(unit.classes.len(), 1);
        assert!(unit.classes[0].is_registrable());
    }

    #[test]
    fn test_kotlin_class_with_ctor_and_qualified_marker() {
        let unit = parse_kotlin(
            "class BarPackage(ctx: Context) : com.facebook.react.TurboReactPackage() {\n}\n",
        );
        assert!(unit.classes[0].is_registrable());
    }

    #[test]
    fn test_java_class_markers() {
        let unit = parse_java(
            "package com.example;\nclass FooPackage extends Base implements ReactPackage {\n}\n",
        );
        assert!(unit.classes[0].is_registrable());

        let plain = parse_java("class Helper extends Thing {\n}\n");
        assert!(!plain.classes[0].is_registrable());
    }

    #[test]
    fn test_multiple_classes_per_file() {
        let unit = parse_kotlin(
            "class FooPackage : ReactPackage {}\nclass Helper {}\nclass BarPackage : BaseReactPackage() {}\n",
        );
        assert_eq!(unit.classes.len(), 3);
        let registrable: Vec<&str> = unit
            .classes
            .iter()
            .filter(|c| c.is_registrable())
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(registrable, vec!["FooPackage", "BarPackage"]);
    }

    #[test]
    fn test_kotlin_alias_binding_resolved_via_imports() {
        let unit = parse_kotlin(
            "import com.example.FooPackage\nval bar = FooPackage()\n",
        );
        assert_eq!(
            unit.local_aliases.get("bar").map(String::as_str),
            Some("com.example.FooPackage")
        );
    }

    #[test]
    fn test_java_typed_alias_binding() {
        let unit = parse_java(
            "package app;\nimport com.example.FooPackage;\nFooPackage bar = new FooPackage();\n",
        );
        assert_eq!(
            unit.local_aliases.get("bar").map(String::as_str),
            Some("com.example.FooPackage")
        );
    }

    #[test]
    fn test_alias_falls_back_to_package() {
        let unit = parse_kotlin("package com.example\nval bar = FooPackage()\n");
        assert_eq!(
            unit.local_aliases.get("bar").map(String::as_str),
            Some("com.example.FooPackage")
        );
    }

    #[test]
    fn test_call_sites_both_forms() {
        let unit = parse_kotlin(
            "packages.add(FooPackage())\nval bar = BarPackage()\npackages.add(bar)\n",
        );
        assert_eq!(
            unit.call_sites,
            vec![
                CallSite::Constructor("FooPackage".to_string()),
                CallSite::Variable("bar".to_string()),
            ]
        );
    }

    #[test]
    fn test_java_call_sites() {
        let unit = parse_java("packages.add(new FooPackage());\npackages.add(bar);\n");
        assert_eq!(
            unit.call_sites,
            vec![
                CallSite::Constructor("FooPackage".to_string()),
                CallSite::Variable("bar".to_string()),
            ]
        );
    }

    #[test]
    fn test_commented_call_sites_ignored() {
        let unit = parse_kotlin("// packages.add(FooPackage())\n/* add(BarPackage()) */\n");
        assert!(unit.call_sites.is_empty());
    }
}
