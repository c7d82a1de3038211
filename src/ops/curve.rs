//! `curve`: interpolated lookup between ascending numeric stops
//! (spec.md §4.7).
use std::sync::Arc;

use serde_json::Value as Json;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::context::ParsingContext;
use crate::error::Diagnostic;
use crate::expr::{CurveSpec, Expression, Extra, Interpolation};
use crate::parser::default_parse_from;
use crate::registry::{OperatorDef, ParsedCall, Registry};
use crate::runtime::{RuntimeError, Value};
use crate::types::{ParamSpec, Type};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "curve",
        signature: Type::lambda(
            Type::typename("U"),
            vec![
                ParamSpec::Single(Type::number()),
                ParamSpec::NArgs {
                    min: Some(1),
                    max: None,
                    items: vec![Type::number(), Type::typename("U")],
                },
            ],
        ),
        parse: Some(parse_curve),
        compile: compile_curve,
    });
}

fn parse_interpolation(raw: &Json, key: &str) -> Result<Interpolation, Diagnostic> {
    match raw {
        Json::Array(items) => match items.as_slice() {
            [Json::String(kind)] if kind == "step" => Ok(Interpolation::Step),
            [Json::String(kind)] if kind == "linear" => Ok(Interpolation::Linear),
            [Json::String(kind), Json::Number(base)] if kind == "exponential" => {
                Ok(Interpolation::Exponential(base.as_f64().unwrap_or(1.0)))
            }
            _ => Err(Diagnostic::parsing(
                key.to_owned(),
                "curve interpolation must be [\"step\"], [\"linear\"] or [\"exponential\", base]",
            )),
        },
        _ => Err(Diagnostic::parsing(
            key.to_owned(),
            "curve interpolation must be [\"step\"], [\"linear\"] or [\"exponential\", base]",
        )),
    }
}

/// Consumes the interpolation spec (slot 1, not a parsed expression) then
/// delegates the rest to the default per-argument parse loop, starting at
/// index 2 so later keys still match their source position (spec.md §4.7,
/// §9 "Source emits... reimplement as a structural intermediate").
fn parse_curve(
    ctx: &ParsingContext,
    op_name: &'static str,
    rest: &[Json],
) -> Result<ParsedCall, Diagnostic> {
    if rest.is_empty() {
        return Err(Diagnostic::parsing(
            ctx.key(),
            "\"curve\" requires an interpolation spec",
        ));
    }
    let interp_key = ctx.child(op_name, 1).key();
    let interpolation = parse_interpolation(&rest[0], &interp_key)?;

    let remaining = &rest[1..];
    if remaining.len() < 3 {
        return Err(Diagnostic::parsing(
            ctx.key(),
            "\"curve\" requires an input and at least one stop pair",
        ));
    }

    let body = default_parse_from(ctx, op_name, remaining, 2)?;
    Ok(ParsedCall::with_extra(
        body.args,
        Extra::Curve(CurveSpec { interpolation }),
    ))
}

fn is_ascending(stops: &[f64]) -> bool {
    stops.windows(2).all(|w| w[0] < w[1])
}

fn compile_curve(
    expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let spec = match expr.extra() {
        Some(Extra::Curve(spec)) => spec.clone(),
        _ => unreachable!("\"curve\" always carries its interpolation as Extra::Curve"),
    };
    let key = expr.key().to_owned();

    if args.len() < 3 || (args.len() - 1) % 2 != 0 {
        return Err(vec![Diagnostic::compile(
            key,
            "\"curve\" requires an input and at least one stop pair",
        )]);
    }

    let input_fn = args[0].emitted.clone();
    let stop_pairs = &args[1..];

    let mut stop_inputs = Vec::with_capacity(stop_pairs.len() / 2);
    for pair in stop_pairs.chunks_exact(2) {
        let stop_in = &pair[0];
        match &stop_in.source {
            Expression::Literal { value, ty, .. } if *ty == Type::number() => {
                let v = value.as_f64().ok_or_else(|| {
                    vec![Diagnostic::compile(key.clone(), "curve stop input must be a number")]
                })?;
                stop_inputs.push(v);
            }
            _ => {
                return Err(vec![Diagnostic::compile(
                    key.clone(),
                    "curve stop inputs must be literal numbers, not computed expressions",
                )])
            }
        }
    }
    if !is_ascending(&stop_inputs) {
        return Err(vec![Diagnostic::compile(
            key.clone(),
            "curve stop inputs must be strictly ascending",
        )]);
    }

    let first_output_ty = &stop_pairs[1].ty;
    let output_kind = match first_output_ty {
        Type::Primitive(crate::types::Primitive::Number) => "number",
        Type::Primitive(crate::types::Primitive::Color) => "color",
        Type::Array { item_type, .. } if **item_type == Type::number() => "array",
        _ if spec.interpolation == Interpolation::Step => "step",
        _ => {
            return Err(vec![Diagnostic::compile(
                key.clone(),
                format!(
                    "curve output type {first_output_ty} is only interpolatable with \"step\""
                ),
            )])
        }
    };

    let stop_outputs: Vec<EmittedFn> = stop_pairs
        .chunks_exact(2)
        .map(|pair| pair[1].emitted.clone())
        .collect();
    let interpolation = spec.interpolation;

    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let input = helper.to_number(&input_fn(helper, props, feature)?)?;
        let thunks: Vec<Box<dyn Fn() -> Result<Value, RuntimeError> + '_>> = stop_outputs
            .iter()
            .map(|f| -> Box<dyn Fn() -> Result<Value, RuntimeError> + '_> {
                Box::new(move || f(helper, props, feature))
            })
            .collect();
        let thunk_refs: Vec<&dyn Fn() -> Result<Value, RuntimeError>> =
            thunks.iter().map(|b| b.as_ref()).collect();
        helper.evaluate_curve(input, &stop_inputs, &thunk_refs, interpolation, output_kind)
    });
    Ok(CompileStep::new(emitted))
}
