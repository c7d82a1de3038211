//! String operators (spec.md §4.6 "Strings").
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::Type;

use super::{unary, variadic};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "upcase",
        signature: unary(Type::string(), Type::string()),
        parse: None,
        compile: compile_upcase,
    });
    registry.insert(OperatorDef {
        name: "downcase",
        signature: unary(Type::string(), Type::string()),
        parse: None,
        compile: compile_downcase,
    });
    registry.insert(OperatorDef {
        name: "concat",
        signature: variadic(Type::string(), Type::value(), Some(0)),
        parse: None,
        compile: compile_concat,
    });
}

fn compile_upcase(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let s = helper.to_string(&inner(helper, props, feature)?)?;
        Ok(serde_json::Value::String(s.to_uppercase()))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_downcase(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let s = helper.to_string(&inner(helper, props, feature)?)?;
        Ok(serde_json::Value::String(s.to_lowercase()))
    });
    Ok(CompileStep::new(emitted))
}

/// Coerces each argument through the helper's `to_string` (SPEC_FULL.md §3
/// Open Question resolution: not an implicit JSON-style join) and
/// concatenates the results.
fn compile_concat(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let fns: Vec<EmittedFn> = args.iter().map(|c| c.emitted.clone()).collect();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let mut out = String::new();
        for f in &fns {
            out.push_str(&helper.to_string(&f(helper, props, feature)?)?);
        }
        Ok(serde_json::Value::String(out))
    });
    Ok(CompileStep::new(emitted))
}
