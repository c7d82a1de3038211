//! Shared diagnostic shape for the parser, type checker and compiler.
use std::fmt::Display;

use serde::Serialize;

/// Which stage raised a [`Diagnostic`]. Not part of the public `{key, message}`
/// contract (spec.md §6.3) but kept around for tests and internal wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Parsing,
    Type,
    Compile,
}

/// A single error produced while parsing, checking or compiling an expression.
///
/// `key` is the dotted path (see [`crate::context::ParsingContext`]) from the
/// root of the raw input to the offending node. Serializes to exactly the
/// `{key, message}` shape spec.md §6.3 mandates for the public error surface;
/// `kind` is an internal-only field, excluded from that representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(skip)]
    pub kind: DiagnosticKind,
    pub key: String,
    pub message: String,
}

impl Diagnostic {
    pub fn parsing(key: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Parsing,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn type_error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Type,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn compile(key: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Compile,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Return a copy of this diagnostic re-keyed under an enclosing node's key,
    /// used when a child error bubbles up through a `Lambda-call`.
    pub fn under(mut self, parent_key: &str) -> Self {
        if self.key.is_empty() {
            self.key = parent_key.to_owned();
        }
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} ({})", self.message, self.key)
        }
    }
}

impl std::error::Error for Diagnostic {}

pub type DiagResult<T> = Result<T, Diagnostic>;
pub type DiagResults<T> = Result<T, Vec<Diagnostic>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_key_when_present() {
        let diag = Diagnostic::parsing("a.b.0", "Unknown expression \"foo\"");
        assert_eq!(diag.to_string(), "Unknown expression \"foo\" (a.b.0)");
    }

    #[test]
    fn display_omits_parens_for_empty_key() {
        let diag = Diagnostic::type_error("", "top level failure");
        assert_eq!(diag.to_string(), "top level failure");
    }

    #[test]
    fn serializes_to_the_key_message_shape_only() {
        let diag = Diagnostic::parsing("a.0", "Unknown expression \"foo\"");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "a.0", "message": "Unknown expression \"foo\""})
        );
    }

    #[test]
    fn under_only_fills_empty_key() {
        let diag = Diagnostic::compile("child.0", "bad").under("parent");
        assert_eq!(diag.key, "child.0");

        let diag = Diagnostic::compile("", "bad").under("parent");
        assert_eq!(diag.key, "parent");
    }
}
