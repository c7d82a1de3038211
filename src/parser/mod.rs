//! Raw JSON → [`Expression`] (spec.md §4.3).
//!
//! Grounded on `src/ast/node.rs`'s `from_expression`/`from_*` dispatch-by-node-
//! shape functions: recursive descent over an already-structured tree, one
//! helper per node shape, here dispatching on JSON value shape instead of
//! `pest::Rule`, and returning `Result` instead of `log::error!` +
//! `process::exit`.
use serde_json::Value as Json;

use crate::context::ParsingContext;
use crate::error::Diagnostic;
use crate::expr::{Expression, LiteralValue};
use crate::registry::ParsedCall;
use crate::types::Type;


/// Parse `raw` at `ctx`'s position (spec.md §4.3 rules 1–7).
pub fn parse(raw: &Json, ctx: &ParsingContext) -> Result<Expression, Diagnostic> {
    match raw {
        Json::Null => {
            log::trace!("parsed null literal at \"{}\"", ctx.key());
            Ok(Expression::Literal {
                value: Json::Null,
                ty: Type::null(),
                key: ctx.key(),
            })
        }
        Json::String(_) | Json::Number(_) | Json::Bool(_) => promote_literal(raw, ctx),
        Json::Array(items) => parse_call(items, ctx),
        Json::Object(_) => Err(Diagnostic::parsing(ctx.key(), "Expected an array")),
    }
}

/// The key of an array's head element (spec.md §4.3 rules 4 & 6: `key.0`),
/// joined the same way [`ParsingContext::key`] joins a child's index onto its
/// parent's — no leading dot when `ctx` is the root.
fn head_key(ctx: &ParsingContext) -> String {
    let parent = ctx.key();
    if parent.is_empty() {
        "0".to_owned()
    } else {
        format!("{parent}.0")
    }
}

fn parse_call(items: &[Json], ctx: &ParsingContext) -> Result<Expression, Diagnostic> {
    let name = match items.first() {
        Some(Json::String(s)) => s.clone(),
        Some(_) => {
            return Err(Diagnostic::parsing(
                head_key(ctx),
                "Expression name must be a string",
            ))
        }
        None => {
            return Err(Diagnostic::parsing(
                head_key(ctx),
                "Expression name must be a string",
            ))
        }
    };
    let rest = &items[1..];

    if name == "literal" {
        if rest.len() != 1 {
            return Err(Diagnostic::parsing(
                ctx.key(),
                format!(
                    "\"literal\" requires exactly one argument, got {}",
                    rest.len()
                ),
            ));
        }
        let child = ctx.child("literal", 1);
        return promote_literal(&rest[0], &child);
    }

    let def = match ctx.registry().get(&name) {
        Some(def) => def,
        None => {
            return Err(Diagnostic::parsing(
                head_key(ctx),
                format!("Unknown expression \"{name}\""),
            ))
        }
    };

    log::trace!("parsing \"{}\" at \"{}\"", def.name, ctx.key());
    let ParsedCall { args, extra } = match def.parse {
        Some(parse_fn) => parse_fn(ctx, def.name, rest)?,
        None => default_parse(ctx, def.name, rest)?,
    };

    Ok(Expression::Call {
        op: def.name,
        args,
        ty: def.signature.clone(),
        extra,
        key: ctx.key(),
    })
}

/// The default argument-parsing loop used by most operators (spec.md §4.2):
/// parse each remaining element with a child context, indices starting at 1.
pub fn default_parse(
    ctx: &ParsingContext,
    op_name: &'static str,
    rest: &[Json],
) -> Result<ParsedCall, Diagnostic> {
    default_parse_from(ctx, op_name, rest, 1)
}

/// Like [`default_parse`], but starting the positional index at `start`
/// instead of 1. Used by operators whose parse override consumes a fixed
/// prefix (e.g. `curve`'s interpolation spec) so later argument keys still
/// match their position in the original source array.
pub fn default_parse_from(
    ctx: &ParsingContext,
    op_name: &'static str,
    rest: &[Json],
    start: usize,
) -> Result<ParsedCall, Diagnostic> {
    let mut args = Vec::with_capacity(rest.len());
    for (i, raw) in rest.iter().enumerate() {
        let child = ctx.child(op_name, start + i);
        args.push(parse(raw, &child)?);
    }
    Ok(ParsedCall::new(args))
}

/// Literal promotion (spec.md §4.6): scalars become a matching-primitive
/// literal; arrays infer a homogeneous item type or fall back to `Value`;
/// objects become an `Object` literal. Used both by the parser's scalar fast
/// path and the explicit `"literal"` form.
pub fn promote_literal(raw: &Json, ctx: &ParsingContext) -> Result<Expression, Diagnostic> {
    let key = ctx.key();
    match raw {
        Json::Null => Ok(Expression::Literal {
            value: Json::Null,
            ty: Type::null(),
            key,
        }),
        Json::String(_) => Ok(Expression::Literal {
            value: raw.clone(),
            ty: Type::string(),
            key,
        }),
        Json::Number(_) => Ok(Expression::Literal {
            value: raw.clone(),
            ty: Type::number(),
            key,
        }),
        Json::Bool(_) => Ok(Expression::Literal {
            value: raw.clone(),
            ty: Type::boolean(),
            key,
        }),
        Json::Array(items) => {
            let item_type = infer_array_item_type(items);
            Ok(Expression::Literal {
                value: raw.clone(),
                ty: Type::array(item_type, Some(items.len())),
                key,
            })
        }
        Json::Object(_) => Ok(Expression::Literal {
            value: raw.clone(),
            ty: Type::object(),
            key,
        }),
    }
}

fn infer_array_item_type(items: &[LiteralValue]) -> Type {
    let mut kind: Option<Type> = None;
    for item in items {
        let item_kind = match item {
            Json::String(_) => Type::string(),
            Json::Number(_) => Type::number(),
            Json::Bool(_) => Type::boolean(),
            Json::Null => Type::null(),
            _ => return Type::value(),
        };
        match &kind {
            None => kind = Some(item_kind),
            Some(existing) if *existing == item_kind => {}
            Some(_) => return Type::value(),
        }
    }
    kind.unwrap_or_else(Type::value)
}
