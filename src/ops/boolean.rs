//! Short-circuiting boolean operators (spec.md §4.6 "Arithmetic and
//! comparison": `&&`, `||`, `!`).
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::Type;

use super::{unary, variadic};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "&&",
        signature: variadic(Type::boolean(), Type::boolean(), Some(1)),
        parse: None,
        compile: compile_and,
    });
    registry.insert(OperatorDef {
        name: "||",
        signature: variadic(Type::boolean(), Type::boolean(), Some(1)),
        parse: None,
        compile: compile_or,
    });
    registry.insert(OperatorDef {
        name: "!",
        signature: unary(Type::boolean(), Type::boolean()),
        parse: None,
        compile: compile_not,
    });
}

/// `&&` short-circuits: the first `false` operand stops evaluation, so later
/// operands (which may themselves fail at runtime) never run.
fn compile_and(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let fns: Vec<EmittedFn> = args.iter().map(|c| c.emitted.clone()).collect();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        for f in &fns {
            if !helper.to_boolean(&f(helper, props, feature)?)? {
                return Ok(serde_json::Value::Bool(false));
            }
        }
        Ok(serde_json::Value::Bool(true))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_or(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let fns: Vec<EmittedFn> = args.iter().map(|c| c.emitted.clone()).collect();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        for f in &fns {
            if helper.to_boolean(&f(helper, props, feature)?)? {
                return Ok(serde_json::Value::Bool(true));
            }
        }
        Ok(serde_json::Value::Bool(false))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_not(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = helper.to_boolean(&inner(helper, props, feature)?)?;
        Ok(serde_json::Value::Bool(!v))
    });
    Ok(CompileStep::new(emitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;

    #[test]
    fn and_short_circuits_without_needing_evaluation() {
        let result = compile(&serde_json::json!(["&&", true, false, true]), None)
            .expect("compile ok");
        assert!(result.is_feature_constant);
    }

    #[test]
    fn not_negates_its_operand() {
        let result = compile(&serde_json::json!(["!", true]), None).expect("compile ok");
        assert_eq!(result.ty, Type::boolean());
    }
}
