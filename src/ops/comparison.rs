//! Equality and ordering comparisons (spec.md §4.6 "Arithmetic and
//! comparison"): binary comparisons over a common type variable `T`.
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::{ParamSpec, Type};

pub(super) fn register(registry: &mut Registry) {
    register_comparison(registry, "==", compile_eq);
    register_comparison(registry, "!=", compile_ne);
    register_comparison(registry, ">", compile_gt);
    register_comparison(registry, "<", compile_lt);
    register_comparison(registry, ">=", compile_ge);
    register_comparison(registry, "<=", compile_le);
}

fn register_comparison(
    registry: &mut Registry,
    name: &'static str,
    compile: fn(&Expression, &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>>,
) {
    registry.insert(OperatorDef {
        name,
        signature: Type::lambda(
            Type::boolean(),
            vec![
                ParamSpec::Single(Type::typename("T")),
                ParamSpec::Single(Type::typename("T")),
            ],
        ),
        parse: None,
        compile,
    });
}

/// JSON values compare structurally; this matches how literals, arrays and
/// objects are represented (`serde_json::Value` derives `PartialEq`/`Ord`
/// is absent for `Value`, so numbers are compared as `f64` and everything
/// else falls back to structural equality).
fn ordering(a: &serde_json::Value, b: &serde_json::Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (serde_json::Value::Number(a), serde_json::Value::Number(b)) => {
            a.as_f64().partial_cmp(&b.as_f64())
        }
        (serde_json::Value::String(a), serde_json::Value::String(b)) => Some(a.cmp(b)),
        (serde_json::Value::Bool(a), serde_json::Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

macro_rules! comparison_fn {
    ($fn_name:ident, $op:tt) => {
        fn $fn_name(
            expr: &Expression,
            args: &[CompiledExpression],
        ) -> Result<CompileStep, Vec<Diagnostic>> {
            let lhs = args[0].emitted.clone();
            let rhs = args[1].emitted.clone();
            let path = expr.key().to_owned();
            let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
                let a = lhs(helper, props, feature)?;
                let b = rhs(helper, props, feature)?;
                match ordering(&a, &b) {
                    Some(ord) => Ok(serde_json::Value::Bool(ord $op std::cmp::Ordering::Equal)),
                    None => Err(crate::runtime::RuntimeError::new(format!(
                        "cannot compare {a} and {b} at \"{path}\""
                    ))),
                }
            });
            Ok(CompileStep::new(emitted))
        }
    };
}

fn compile_eq(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let lhs = args[0].emitted.clone();
    let rhs = args[1].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let a = lhs(helper, props, feature)?;
        let b = rhs(helper, props, feature)?;
        Ok(serde_json::Value::Bool(a == b))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_ne(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let lhs = args[0].emitted.clone();
    let rhs = args[1].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let a = lhs(helper, props, feature)?;
        let b = rhs(helper, props, feature)?;
        Ok(serde_json::Value::Bool(a != b))
    });
    Ok(CompileStep::new(emitted))
}

comparison_fn!(compile_gt, >);
comparison_fn!(compile_lt, <);
comparison_fn!(compile_ge, >=);
comparison_fn!(compile_le, <=);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::types::Type;

    #[test]
    fn equality_compares_structurally() {
        let result = compile(&serde_json::json!(["==", 1, 1]), None).expect("compile ok");
        assert_eq!(result.ty, Type::boolean());
    }

    #[test]
    fn ordering_works_across_numbers() {
        let result = compile(&serde_json::json!([">", 2, 1]), None).expect("compile ok");
        assert_eq!(result.ty, Type::boolean());
    }
}
