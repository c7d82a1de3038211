//! `match`: lookup-table dispatch from a discriminator to one of several
//! outputs by label (spec.md §4.8).
//!
//! Labels are static dispatch keys, not expressions — they are validated and
//! collected during parsing rather than flowing through the normal
//! parse/check/compile pipeline like `args`. This mirrors `curve`'s parse
//! override (consume a fixed/irregular prefix, delegate the rest).
use std::sync::Arc;

use serde_json::Value as Json;

use crate::compile::{CompileStep, CompiledExpression, EmittedFn};
use crate::context::ParsingContext;
use crate::error::Diagnostic;
use crate::expr::{Expression, Extra, LiteralValue};
use crate::parser::parse;
use crate::registry::{OperatorDef, ParsedCall, Registry};
use crate::types::{ParamSpec, Type};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OperatorDef {
        name: "match",
        signature: Type::lambda(
            Type::typename("U"),
            vec![
                ParamSpec::Single(Type::value()),
                ParamSpec::NArgs {
                    min: Some(0),
                    max: None,
                    items: vec![Type::typename("U")],
                },
                ParamSpec::Single(Type::typename("U")),
            ],
        ),
        parse: Some(parse_match),
        compile: compile_match,
    });
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LabelKind {
    String,
    Number,
}

fn label_kind(v: &Json) -> Option<LabelKind> {
    match v {
        Json::String(_) => Some(LabelKind::String),
        Json::Number(_) => Some(LabelKind::Number),
        _ => None,
    }
}

/// A label slot is either one literal scalar, or an array of them (sugar for
/// multiple labels sharing one output) (spec.md §4.8).
fn parse_labels(raw: &Json, key: &str, seen: &mut Vec<LiteralValue>, kind: &mut Option<LabelKind>) -> Result<Vec<LiteralValue>, Diagnostic> {
    let values: Vec<&Json> = match raw {
        Json::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    if values.is_empty() {
        return Err(Diagnostic::parsing(
            key.to_owned(),
            "\"match\" label array must not be empty",
        ));
    }
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        let this_kind = label_kind(v).ok_or_else(|| {
            Diagnostic::parsing(
                key.to_owned(),
                "\"match\" labels must be literal strings or numbers",
            )
        })?;
        match kind {
            None => *kind = Some(this_kind),
            Some(k) if *k == this_kind => {}
            Some(_) => {
                return Err(Diagnostic::parsing(
                    key.to_owned(),
                    "\"match\" labels must all share the same type",
                ))
            }
        }
        if seen.iter().any(|s| s == v) {
            return Err(Diagnostic::parsing(
                key.to_owned(),
                format!("\"match\" has a duplicate label {v}"),
            ));
        }
        seen.push(v.clone());
        out.push(v.clone());
    }
    Ok(out)
}

fn parse_match(
    ctx: &ParsingContext,
    op_name: &'static str,
    rest: &[Json],
) -> Result<ParsedCall, Diagnostic> {
    if rest.len() < 4 || (rest.len() - 2) % 2 != 0 {
        return Err(Diagnostic::parsing(
            ctx.key(),
            format!(
                "\"match\" expects an input, one or more label/output pairs and a default, got {} arguments",
                rest.len()
            ),
        ));
    }
    let branch_count = (rest.len() - 2) / 2;

    let input = parse(&rest[0], &ctx.child(op_name, 1))?;

    let mut args = Vec::with_capacity(branch_count + 2);
    args.push(input);

    let mut labels = Vec::with_capacity(branch_count);
    let mut seen = Vec::new();
    let mut kind = None;
    for i in 0..branch_count {
        let label_original_index = 2 + 2 * i;
        let value_original_index = 3 + 2 * i;
        let label_key = ctx.child(op_name, label_original_index).key();
        let group = parse_labels(&rest[1 + 2 * i], &label_key, &mut seen, &mut kind)?;
        labels.push(group);

        let value = parse(&rest[2 + 2 * i], &ctx.child(op_name, value_original_index))?;
        args.push(value);
    }

    let default_index = rest.len();
    let default = parse(&rest[rest.len() - 1], &ctx.child(op_name, default_index))?;
    args.push(default);

    Ok(ParsedCall::with_extra(args, Extra::Match(labels)))
}

fn compile_match(
    expr: &Expression,
    args: &[CompiledExpression],
) -> Result<CompileStep, Vec<Diagnostic>> {
    let labels = match expr.extra() {
        Some(Extra::Match(labels)) => labels.clone(),
        _ => unreachable!("\"match\" always carries its label groups as Extra::Match"),
    };

    let input = args[0].emitted.clone();
    let default = args[args.len() - 1].emitted.clone();
    let outputs: Vec<EmittedFn> = args[1..args.len() - 1].iter().map(|c| c.emitted.clone()).collect();

    let emitted: EmittedFn = Arc::new(move |helper, props, feature| {
        let discriminant = input(helper, props, feature)?;
        for (group, output) in labels.iter().zip(outputs.iter()) {
            if group.iter().any(|label| label == &discriminant) {
                return output(helper, props, feature);
            }
        }
        default(helper, props, feature)
    });
    Ok(CompileStep::new(emitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::context::ParsingContext;
    use crate::registry::REGISTRY;

    #[test]
    fn rejects_duplicate_labels() {
        let ctx = ParsingContext::root(&REGISTRY);
        let err = parse(
            &serde_json::json!(["match", ["get", "x"], "a", 1, "a", 2, 0]),
            &ctx,
        )
        .unwrap_err();
        assert!(err.message.contains("duplicate label"));
    }

    #[test]
    fn rejects_mixed_label_types() {
        let ctx = ParsingContext::root(&REGISTRY);
        let err = parse(
            &serde_json::json!(["match", ["get", "x"], "a", 1, 2, 2, 0]),
            &ctx,
        )
        .unwrap_err();
        assert!(err.message.contains("same type"));
    }

    #[test]
    fn array_sugar_shares_one_output() {
        let result = compile(
            &serde_json::json!(["match", "b", ["a", "b"], 1, "c", 2, 0]),
            None,
        )
        .expect("compile ok");
        assert_eq!(result.ty, Type::number());
    }
}
