//! The operator registry: name → operator definition (spec.md §4.2).
//!
//! Grounded on the static-table pattern implied by the teacher's `once_cell`
//! dependency and its `lexer::LEX_MAP` lookup table: a `HashMap` built once
//! behind a lazily-initialized static, read-only thereafter.
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::compile::{CompileStep, CompiledExpression};
use crate::context::ParsingContext;
use crate::error::Diagnostic;
use crate::expr::{Expression, Extra};
use crate::types::Type;

/// What an operator's `parse` override hands back: the parsed argument
/// expressions plus any operator-specific payload (spec.md §3 `extra`).
pub struct ParsedCall {
    pub args: Vec<Expression>,
    pub extra: Option<Extra>,
}

impl ParsedCall {
    pub fn new(args: Vec<Expression>) -> Self {
        ParsedCall { args, extra: None }
    }

    pub fn with_extra(args: Vec<Expression>, extra: Extra) -> Self {
        ParsedCall {
            args,
            extra: Some(extra),
        }
    }
}

/// Parsing is fail-fast (spec.md §4.3): the first malformed node aborts the
/// whole parse, so overrides return a single [`Diagnostic`], not a list.
pub type ParseFn =
    fn(&ParsingContext, &'static str, &[serde_json::Value]) -> Result<ParsedCall, Diagnostic>;

/// Compiling accumulates as many issues as possible per call (spec.md §7),
/// so `compile` returns a list.
pub type CompileFn =
    fn(&Expression, &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>>;

pub struct OperatorDef {
    pub name: &'static str,
    pub signature: Type,
    pub parse: Option<ParseFn>,
    pub compile: CompileFn,
}

/// The read-only, `Sync` mapping from operator name to definition
/// (spec.md §5).
pub struct Registry {
    operators: HashMap<&'static str, OperatorDef>,
}

impl Registry {
    pub fn empty() -> Self {
        Registry {
            operators: HashMap::new(),
        }
    }

    pub fn insert(&mut self, def: OperatorDef) {
        self.operators.insert(def.name, def);
    }

    pub fn get(&self, name: &str) -> Option<&OperatorDef> {
        self.operators.get(name)
    }
}

/// The process-wide registry, built once at first use (spec.md §4.2:
/// "constructed once at startup; not modified by compilation").
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::empty();
    crate::ops::register_all(&mut registry);
    registry
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_standard_operators() {
        assert!(REGISTRY.get("+").is_some());
        assert!(REGISTRY.get("curve").is_some());
        assert!(REGISTRY.get("zoom").is_some());
        assert!(REGISTRY.get("not-an-operator").is_none());
    }
}
