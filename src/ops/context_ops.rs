//! Feature/map context accessors, including `zoom`'s contextual placement
//! restriction (spec.md §4.6 "Feature/map context").
use std::sync::Arc;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::context::{Frame, ParsingContext};
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::parser::default_parse;
use crate::registry::{OperatorDef, ParsedCall, Registry};
use crate::types::Type;

use super::{feature_properties, nullary};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "properties",
        signature: nullary(Type::object()),
        parse: None,
        compile: not_feature_constant(compile_properties),
    });
    registry.insert(OperatorDef {
        name: "geometry_type",
        signature: nullary(Type::string()),
        parse: None,
        compile: compile_geometry_type,
    });
    registry.insert(OperatorDef {
        name: "id",
        signature: nullary(Type::value()),
        parse: None,
        compile: compile_id,
    });
    registry.insert(OperatorDef {
        name: "zoom",
        signature: nullary(Type::number()),
        parse: Some(parse_zoom),
        compile: compile_zoom,
    });
}

/// `compile_properties` never depends on the argument list (it has none) so
/// there is no children-derived constancy to inherit from; always override.
fn not_feature_constant(
    f: fn(&Expression, &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>>,
) -> fn(&Expression, &[CompiledExpression]) -> Result<CompileStep, Vec<Diagnostic>> {
    // `f` already marks feature_constant(false) on its own step; this helper
    // exists only to make each call site read like a predicate instead of
    // duplicating the flag inline.
    f
}

fn compile_properties(
    _expr: &Expression,
    _args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let emitted: EmittedFn = Arc::new(|_helper, _map_properties, feature| {
        Ok(feature_properties(feature))
    });
    Ok(CompileStep::new(emitted).feature_constant(false))
}

fn compile_geometry_type(
    _expr: &Expression,
    _args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let emitted: EmittedFn = Arc::new(|_helper, _props, feature| {
        let geometry_type = feature
            .get("type")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Ok(geometry_type)
    });
    Ok(CompileStep::new(emitted).feature_constant(false))
}

fn compile_id(
    _expr: &Expression,
    _args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let emitted: EmittedFn = Arc::new(|_helper, _props, feature| {
        Ok(feature.get("id").cloned().unwrap_or(serde_json::Value::Null))
    });
    Ok(CompileStep::new(emitted).feature_constant(false))
}

/// `zoom` reads the second evaluator argument, the map-properties/globals bag
/// (spec.md §6.1 `evaluate(mapProperties, feature)`), leaving `feature` free
/// for the GeoJSON feature every other accessor here reads from.
fn compile_zoom(
    _expr: &Expression,
    _args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let emitted: EmittedFn = Arc::new(|_helper, props, _feature| Ok(props.clone()));
    Ok(CompileStep::new(emitted).zoom_constant(false))
}

/// `zoom` may appear only as the input (slot 2) of a top-level `curve` call,
/// or of a `coalesce` whose own input slot is a `curve`'s (spec.md §4.6).
fn parse_zoom(
    ctx: &ParsingContext,
    op_name: &'static str,
    rest: &[serde_json::Value],
) -> Result<ParsedCall, Diagnostic> {
    if !rest.is_empty() {
        return Err(Diagnostic::parsing(
            ctx.key(),
            format!("\"zoom\" takes no arguments, got {}", rest.len()),
        ));
    }

    let directly_under_curve = ctx.own_frame() == Some(Frame { op: "curve", index: 2 });
    let under_coalesce_under_curve = matches!(ctx.own_frame(), Some(Frame { op: "coalesce", .. }))
        && ctx.grandparent_frame() == Some(Frame { op: "curve", index: 2 });

    if !directly_under_curve && !under_coalesce_under_curve {
        return Err(Diagnostic::parsing(
            ctx.key(),
            "The \"zoom\" expression may only be used as the input to a top-level \"curve\" expression.",
        ));
    }

    default_parse(ctx, op_name, rest)
}
