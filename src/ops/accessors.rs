//! Object/array access (spec.md §4.6 "Accessors").
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::{ParamSpec, Type};

use super::feature_properties;

pub(super) fn register(registry: &mut Registry) {
    // get(key: String, obj?: Object) -> Value. The trailing `obj` is modeled
    // as an `NArgs` block of exactly zero or one items so the registry-driven
    // arity expansion (spec.md §4.4 step 1) accepts both call shapes.
    let key_then_optional_obj = vec![
        ParamSpec::Single(Type::string()),
        ParamSpec::NArgs {
            min: Some(0),
            max: Some(1),
            items: vec![Type::object()],
        },
    ];

    registry.insert(OperatorDef {
        name: "get",
        signature: Type::lambda(Type::value(), key_then_optional_obj.clone()),
        parse: None,
        compile: compile_get,
    });
    registry.insert(OperatorDef {
        name: "has",
        signature: Type::lambda(Type::boolean(), key_then_optional_obj),
        parse: None,
        compile: compile_has,
    });

    registry.insert(OperatorDef {
        name: "at",
        signature: Type::lambda(
            Type::typename("T"),
            vec![
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::array(Type::typename("T"), None)),
            ],
        ),
        parse: None,
        compile: compile_at,
    });

    registry.insert(OperatorDef {
        name: "length",
        signature: Type::lambda(
            Type::number(),
            vec![ParamSpec::Single(Type::variant(vec![
                Type::array(Type::value(), None),
                Type::string(),
            ]))],
        ),
        parse: None,
        compile: compile_length,
    });
}

fn compile_get(
    expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let path = expr.key().to_owned();
    let key_fn = args[0].emitted.clone();
    let obj_fn = args.get(1).map(|c| c.emitted.clone());
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let key = helper.to_string(&key_fn(helper, props, feature)?)?;
        let obj = match &obj_fn {
            Some(f) => f(helper, props, feature)?,
            None => feature_properties(feature),
        };
        helper.get(&obj, &key, &path)
    });
    let step = CompileStep::new(emitted);
    Ok(if args.len() == 1 {
        step.feature_constant(false)
    } else {
        step
    })
}

fn compile_has(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let key_fn = args[0].emitted.clone();
    let obj_fn = args.get(1).map(|c| c.emitted.clone());
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let key = helper.to_string(&key_fn(helper, props, feature)?)?;
        let obj = match &obj_fn {
            Some(f) => f(helper, props, feature)?,
            None => feature_properties(feature),
        };
        Ok(serde_json::Value::Bool(helper.has(&obj, &key)?))
    });
    let step = CompileStep::new(emitted);
    Ok(if args.len() == 1 {
        step.feature_constant(false)
    } else {
        step
    })
}

fn compile_at(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let index_fn = args[0].emitted.clone();
    let array_fn = args[1].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let index = helper.to_number(&index_fn(helper, props, feature)?)?;
        let array = array_fn(helper, props, feature)?;
        helper.at(index, &array)
    });
    Ok(CompileStep::new(emitted))
}

fn compile_length(
    _expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        let len = match &v {
            serde_json::Value::Array(items) => items.len(),
            serde_json::Value::String(s) => s.chars().count(),
            other => {
                return Err(crate::runtime::RuntimeError::new(format!(
                    "length: expected an array or string, got {other}"
                )))
            }
        };
        Ok(serde_json::json!(len as f64))
    });
    Ok(CompileStep::new(emitted))
}
