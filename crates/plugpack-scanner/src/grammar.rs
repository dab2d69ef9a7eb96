//! Source grammar selection and comment stripping.
//!
//! Both grammars share the extraction pipeline; the variant decides which
//! rule set applies and the few places the languages genuinely differ
//! (import aliases, inheritance syntax, comment nesting).

use std::path::Path;

/// The two recognized source grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceGrammar {
    /// Curly-brace style: `class Foo extends Bar implements Baz { ... }`
    Java,
    /// Colon-inheritance style: `class Foo : Bar(), Baz { ... }`
    Kotlin,
}

impl SourceGrammar {
    /// Select a grammar from a file extension, if recognized
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("java") => Some(SourceGrammar::Java),
            Some("kt") => Some(SourceGrammar::Kotlin),
            _ => None,
        }
    }

    /// Kotlin block comments nest; Java's do not
    fn block_comments_nest(self) -> bool {
        matches!(self, SourceGrammar::Kotlin)
    }

    /// Kotlin has raw `"""..."""` string literals
    fn has_raw_strings(self) -> bool {
        matches!(self, SourceGrammar::Kotlin)
    }
}

/// Remove line and block comments from source text before any pattern
/// extraction, so example code in documentation comments is never matched.
///
/// String and character literals are respected (a `//` inside a string is
/// not a comment). Newlines inside comments are preserved so line-anchored
/// extraction keeps working on the stripped text.
pub fn strip_comments(source: &str, grammar: SourceGrammar) -> String {
    let mut out = String::with_capacity(source.len());
    let bytes: Vec<char> = source.chars().collect();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();

        match (c, next) {
            ('/', Some('/')) => {
                // Line comment: drop until end of line, keep the newline
                while i < bytes.len() && bytes[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                let mut depth = 1;
                i += 2;
                while i < bytes.len() && depth > 0 {
                    if bytes[i] == '/' && bytes.get(i + 1) == Some(&'*')
                        && grammar.block_comments_nest()
                    {
                        depth += 1;
                        i += 2;
                    } else if bytes[i] == '*' && bytes.get(i + 1) == Some(&'/') {
                        depth -= 1;
                        i += 2;
                    } else {
                        if bytes[i] == '\n' {
                            out.push('\n');
                        }
                        i += 1;
                    }
                }
            }
            ('"', Some('"'))
                if grammar.has_raw_strings() && bytes.get(i + 2) == Some(&'"') =>
            {
                // Raw string: copy verbatim until the closing triple quote
                out.push_str("\"\"\"");
                i += 3;
                while i < bytes.len() {
                    if bytes[i] == '"'
                        && bytes.get(i + 1) == Some(&'"')
                        && bytes.get(i + 2) == Some(&'"')
                    {
                        out.push_str("\"\"\"");
                        i += 3;
                        break;
                    }
                    out.push(bytes[i]);
                    i += 1;
                }
            }
            ('"' | '\'', _) => {
                let quote = c;
                out.push(c);
                i += 1;
                while i < bytes.len() {
                    out.push(bytes[i]);
                    if bytes[i] == '\\' {
                        // Escaped character, copy it through
                        if let Some(&escaped) = bytes.get(i + 1) {
                            out.push(escaped);
                        }
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote || bytes[i] == '\n' {
                        i += 1;
                        break;
                    }
                    i += 1;
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}
