//! Arithmetic operators (spec.md §4.6 "Arithmetic and comparison").
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::Type;

use super::{binary, nullary, unary, variadic};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "+",
        signature: variadic(Type::number(), Type::number(), Some(1)),
        parse: None,
        compile: compile_add,
    });
    registry.insert(OperatorDef {
        name: "*",
        signature: variadic(Type::number(), Type::number(), Some(1)),
        parse: None,
        compile: compile_mul,
    });

    registry.insert(OperatorDef {
        name: "-",
        signature: binary(Type::number(), Type::number(), Type::number()),
        parse: None,
        compile: compile_sub,
    });
    registry.insert(OperatorDef {
        name: "/",
        signature: binary(Type::number(), Type::number(), Type::number()),
        parse: None,
        compile: compile_div,
    });
    registry.insert(OperatorDef {
        name: "%",
        signature: binary(Type::number(), Type::number(), Type::number()),
        parse: None,
        compile: compile_rem,
    });
    registry.insert(OperatorDef {
        name: "^",
        signature: binary(Type::number(), Type::number(), Type::number()),
        parse: None,
        compile: compile_pow,
    });

    registry.insert(OperatorDef {
        name: "log10",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_log10,
    });
    registry.insert(OperatorDef {
        name: "ln",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_ln,
    });
    registry.insert(OperatorDef {
        name: "log2",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_log2,
    });
    registry.insert(OperatorDef {
        name: "sin",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_sin,
    });
    registry.insert(OperatorDef {
        name: "cos",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_cos,
    });
    registry.insert(OperatorDef {
        name: "tan",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_tan,
    });
    registry.insert(OperatorDef {
        name: "asin",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_asin,
    });
    registry.insert(OperatorDef {
        name: "acos",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_acos,
    });
    registry.insert(OperatorDef {
        name: "atan",
        signature: unary(Type::number(), Type::number()),
        parse: None,
        compile: compile_atan,
    });

    registry.insert(OperatorDef {
        name: "ln2",
        signature: nullary(Type::number()),
        parse: None,
        compile: compile_ln2,
    });
    registry.insert(OperatorDef {
        name: "pi",
        signature: nullary(Type::number()),
        parse: None,
        compile: compile_pi,
    });
    registry.insert(OperatorDef {
        name: "e",
        signature: nullary(Type::number()),
        parse: None,
        compile: compile_e,
    });
}

fn compile_add(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let fns: Vec<EmittedFn> = args.iter().map(|c| c.emitted.clone()).collect();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let mut total = 0.0;
        for f in &fns {
            total += helper.to_number(&f(helper, props, feature)?)?;
        }
        Ok(serde_json::json!(total))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_mul(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let fns: Vec<EmittedFn> = args.iter().map(|c| c.emitted.clone()).collect();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let mut total = 1.0;
        for f in &fns {
            total *= helper.to_number(&f(helper, props, feature)?)?;
        }
        Ok(serde_json::json!(total))
    });
    Ok(CompileStep::new(emitted))
}

/// Builds a binary-operator `compile` fn for a plain `f64, f64 -> f64`
/// arithmetic operation. A macro (rather than a closure-returning helper)
/// keeps each registered `compile` a plain `fn` pointer, matching
/// [`crate::registry::CompileFn`].
macro_rules! binary_num_op {
    ($fn_name:ident, $a:ident, $b:ident, $body:expr) => {
        fn $fn_name(
            _expr: &Expression,
            args: &[CompiledExpression],
        ) -> Result<CompileStep, Vec<Diagnostic>> {
            let lhs = args[0].emitted.clone();
            let rhs = args[1].emitted.clone();
            let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
                let $a = helper.to_number(&lhs(helper, props, feature)?)?;
                let $b = helper.to_number(&rhs(helper, props, feature)?)?;
                Ok(serde_json::json!($body))
            });
            Ok(CompileStep::new(emitted))
        }
    };
}

binary_num_op!(compile_sub, a, b, a - b);
binary_num_op!(compile_div, a, b, a / b);
binary_num_op!(compile_rem, a, b, a % b);
binary_num_op!(compile_pow, a, b, a.powf(b));

macro_rules! unary_num_op {
    ($fn_name:ident, $x:ident, $body:expr) => {
        fn $fn_name(
            _expr: &Expression,
            args: &[CompiledExpression],
        ) -> Result<CompileStep, Vec<Diagnostic>> {
            let inner = args[0].emitted.clone();
            let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
                let $x = helper.to_number(&inner(helper, props, feature)?)?;
                Ok(serde_json::json!($body))
            });
            Ok(CompileStep::new(emitted))
        }
    };
}

unary_num_op!(compile_log10, x, x.log10());
unary_num_op!(compile_ln, x, x.ln());
unary_num_op!(compile_log2, x, x.log2());
unary_num_op!(compile_sin, x, x.sin());
unary_num_op!(compile_cos, x, x.cos());
unary_num_op!(compile_tan, x, x.tan());
unary_num_op!(compile_asin, x, x.asin());
unary_num_op!(compile_acos, x, x.acos());
unary_num_op!(compile_atan, x, x.atan());

macro_rules! const_num_op {
    ($fn_name:ident, $value:expr) => {
        fn $fn_name(
            _expr: &Expression,
            _args: &[CompiledExpression],
        ) -> Result<CompileStep, Vec<Diagnostic>> {
            let emitted: EmittedFn = Arc::new(|_helper, _props, _feature| Ok(serde_json::json!($value)));
            Ok(CompileStep::new(emitted))
        }
    };
}

const_num_op!(compile_ln2, std::f64::consts::LN_2);
const_num_op!(compile_pi, std::f64::consts::PI);
const_num_op!(compile_e, std::f64::consts::E);
