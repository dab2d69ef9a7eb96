//! Plugpack Source Discovery
//!
//! Static analysis over the native half of a hybrid project. Two related
//! grammars (Java and Kotlin) are recognized; each scanned file is reduced
//! to a normalized [`unit::SourceUnit`] that a single resolver operates on,
//! regardless of which grammar produced it.
//!
//! The scanner's primary job is finding registrable-extension classes: the
//! native-side classes a host application registers at startup to expose
//! extra capability to the script layer. It also classifies third-party
//! dependency modules as native-bearing or not, which feeds the build
//! decision upstream.

pub mod grammar;
pub mod modules;
pub mod resolve;
pub mod scan;
pub mod unit;

pub use grammar::SourceGrammar;
pub use modules::{classify_modules, is_ignored_module, DependencyModule};
pub use resolve::{collect_references, resolve_call_site, DeclarationIndex, REGISTRABLE_SUFFIX};
pub use scan::{scan_root, scan_roots};
pub use unit::{CallSite, ClassDecl, SourceUnit};
