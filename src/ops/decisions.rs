//! `case` and `coalesce` (spec.md §4.6 "Decisions").
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::{ParamSpec, Type};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "case",
        signature: Type::lambda(
            Type::typename("T"),
            vec![
                ParamSpec::NArgs {
                    min: Some(0),
                    max: None,
                    items: vec![Type::boolean(), Type::typename("T")],
                },
                ParamSpec::Single(Type::typename("T")),
            ],
        ),
        parse: None,
        compile: compile_case,
    });
    registry.insert(OperatorDef {
        name: "coalesce",
        signature: Type::lambda(
            Type::typename("T"),
            vec![ParamSpec::NArgs {
                min: Some(1),
                max: None,
                items: vec![Type::typename("T")],
            }],
        ),
        parse: None,
        compile: compile_coalesce,
    });
}

/// Evaluates `(cond, val)` pairs in order, returning the value paired with
/// the first true condition, or the trailing default (spec.md §4.6).
fn compile_case(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let default = args[args.len() - 1].emitted.clone();
    let pairs: Vec<(EmittedFn, EmittedFn)> = args[..args.len() - 1]
        .chunks_exact(2)
        .map(|pair| (pair[0].emitted.clone(), pair[1].emitted.clone()))
        .collect();

    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        for (cond, val) in &pairs {
            if helper.to_boolean(&cond(helper, props, feature)?)? {
                return val(helper, props, feature);
            }
        }
        default(helper, props, feature)
    });
    Ok(CompileStep::new(emitted))
}

/// Returns the first operand that evaluates without a runtime failure; later
/// operands are never forced once one succeeds (spec.md §4.6: "lazy").
fn compile_coalesce(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let fns: Vec<EmittedFn> = args.iter().map(|c| c.emitted.clone()).collect();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let mut last_err = None;
        for f in &fns {
            match f(helper, props, feature) {
                Ok(v) => return Ok(v),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            crate::runtime::RuntimeError::new("\"coalesce\" had no operands to evaluate")
        }))
    });
    Ok(CompileStep::new(emitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::types::Type;

    #[test]
    fn case_result_type_is_shared_branch_type() {
        let result = compile(
            &serde_json::json!(["case", ["==", 1, 1], "yes", "no"]),
            None,
        )
        .expect("compile ok");
        assert_eq!(result.ty, Type::string());
    }

    #[test]
    fn coalesce_requires_at_least_one_operand() {
        let err = compile(&serde_json::json!(["coalesce"]), None).expect_err("expected arity error");
        assert_eq!(err.len(), 1);
    }
}
