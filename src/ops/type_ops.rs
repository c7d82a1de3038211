//! Type queries, runtime assertions, coercions and color construction
//! (spec.md §4.6 "Type queries and conversions").
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::registry::{OperatorDef, Registry};
use crate::types::{ParamSpec, Type};

use super::unary;

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "typeOf",
        signature: unary(Type::string(), Type::value()),
        parse: None,
        compile: compile_type_of,
    });

    registry.insert(OperatorDef {
        name: "string",
        signature: unary(Type::string(), Type::value()),
        parse: None,
        compile: assertion_compile("string"),
    });
    registry.insert(OperatorDef {
        name: "number",
        signature: unary(Type::number(), Type::value()),
        parse: None,
        compile: assertion_compile("number"),
    });
    registry.insert(OperatorDef {
        name: "boolean",
        signature: unary(Type::boolean(), Type::value()),
        parse: None,
        compile: assertion_compile("boolean"),
    });
    registry.insert(OperatorDef {
        name: "array",
        signature: unary(Type::array(Type::value(), None), Type::value()),
        parse: None,
        compile: assertion_compile("array"),
    });
    registry.insert(OperatorDef {
        name: "object",
        signature: unary(Type::object(), Type::value()),
        parse: None,
        compile: assertion_compile("object"),
    });

    registry.insert(OperatorDef {
        name: "to_string",
        signature: unary(Type::string(), Type::value()),
        parse: None,
        compile: compile_to_string,
    });
    registry.insert(OperatorDef {
        name: "to_number",
        signature: unary(Type::number(), Type::value()),
        parse: None,
        compile: compile_to_number,
    });
    registry.insert(OperatorDef {
        name: "to_boolean",
        signature: unary(Type::boolean(), Type::value()),
        parse: None,
        compile: compile_to_boolean,
    });
    registry.insert(OperatorDef {
        name: "to_rgba",
        signature: unary(Type::array(Type::number(), Some(4)), Type::value()),
        parse: None,
        compile: compile_to_rgba,
    });

    registry.insert(OperatorDef {
        name: "parse_color",
        signature: unary(Type::color(), Type::string()),
        parse: None,
        compile: compile_parse_color,
    });
    registry.insert(OperatorDef {
        name: "rgb",
        signature: Type::lambda(
            Type::color(),
            vec![
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::number()),
            ],
        ),
        parse: None,
        compile: compile_rgb,
    });
    registry.insert(OperatorDef {
        name: "rgba",
        signature: Type::lambda(
            Type::color(),
            vec![
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::number()),
            ],
        ),
        parse: None,
        compile: compile_rgba,
    });
}

fn compile_type_of(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        Ok(serde_json::Value::String(helper.type_of(&v)))
    });
    Ok(CompileStep::new(emitted))
}

/// Builds a `compile` function for a runtime type assertion operator:
/// verify the argument has the named primitive kind, else fail
/// (spec.md §4.6 "Assertions").
fn assertion_compile(type_name: &'static str) -> fn(&Expression, &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    match type_name {
        "string" => compile_assert_string,
        "number" => compile_assert_number,
        "boolean" => compile_assert_boolean,
        "array" => compile_assert_array,
        "object" => compile_assert_object,
        _ => unreachable!(),
    }
}

macro_rules! assertion_fn {
    ($fn_name:ident, $type_name:literal) => {
        fn $fn_name(
            expr: &Expression,
            args: &[CompiledExpression],
        ) -> Result<CompileStep, Vec<Diagnostic>> {
            let inner = args[0].emitted.clone();
            let path = expr.key().to_owned();
            let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
                let v = inner(helper, props, feature)?;
                helper.as_type(&v, $type_name, &path)
            });
            Ok(CompileStep::new(emitted))
        }
    };
}

assertion_fn!(compile_assert_string, "string");
assertion_fn!(compile_assert_number, "number");
assertion_fn!(compile_assert_boolean, "boolean");
assertion_fn!(compile_assert_array, "array");
assertion_fn!(compile_assert_object, "object");

fn compile_to_string(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        Ok(serde_json::Value::String(helper.to_string(&v)?))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_to_number(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        Ok(serde_json::json!(helper.to_number(&v)?))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_to_boolean(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        Ok(serde_json::Value::Bool(helper.to_boolean(&v)?))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_to_rgba(expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let path = expr.key().to_owned();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        let color = helper.as_type(&v, "color", &path)?;
        Ok(helper.unwrap(&color))
    });
    Ok(CompileStep::new(emitted))
}

fn compile_parse_color(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let inner = args[0].emitted.clone();
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let v = inner(helper, props, feature)?;
        let text = helper.to_string(&v)?;
        helper.parse_color(&text)
    });
    Ok(CompileStep::new(emitted))
}

fn compile_rgb(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let [r, g, b]: [EmittedFn; 3] = [
        args[0].emitted.clone(),
        args[1].emitted.clone(),
        args[2].emitted.clone(),
    ];
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let r = helper.to_number(&r(helper, props, feature)?)?;
        let g = helper.to_number(&g(helper, props, feature)?)?;
        let b = helper.to_number(&b(helper, props, feature)?)?;
        helper.rgba(r, g, b, None)
    });
    Ok(CompileStep::new(emitted))
}

fn compile_rgba(_expr: &Expression, args: &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    let [r, g, b, a]: [EmittedFn; 4] = [
        args[0].emitted.clone(),
        args[1].emitted.clone(),
        args[2].emitted.clone(),
        args[3].emitted.clone(),
    ];
    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let r = helper.to_number(&r(helper, props, feature)?)?;
        let g = helper.to_number(&g(helper, props, feature)?)?;
        let b = helper.to_number(&b(helper, props, feature)?)?;
        let a = helper.to_number(&a(helper, props, feature)?)?;
        helper.rgba(r, g, b, Some(a))
    });
    Ok(CompileStep::new(emitted))
}
