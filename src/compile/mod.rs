//! Compiler driver: walks the type-checked tree, invokes each operator's
//! `compile`, and aggregates purity bits and diagnostics (spec.md §4.5,
//! §6.1).
//!
//! Grounded on `src/typechecker/mod.rs`'s top-level `check` entry point: a
//! single public function wrapping the tree, returning a `Result` that
//! accumulates failures. Re-targeted here from "emit assembly" (the
//! teacher's actual `compiler/mod.rs`, dropped, see DESIGN.md) to "emit a
//! closure" — this crate's chosen intermediate form (SPEC_FULL.md §6).
use std::sync::Arc;

use crate::check;
use crate::context::ParsingContext;
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::parser;
use crate::registry::REGISTRY;
use crate::runtime::{Helper, RuntimeError, Value};
use crate::types::Type;

#[cfg(test)]
mod tests;

/// The evaluator produced for one expression node: given a runtime helper,
/// the map-properties bag and the feature, produces a value (spec.md §6.1
/// option A, "tree form").
pub type EmittedFn =
    Arc<dyn Fn(&dyn Helper, &Value, &Value) -> Result<Value, RuntimeError> + Send + Sync>;

/// What an operator's `compile` fn hands back to the driver (spec.md §4.2).
pub struct CompileStep {
    pub emitted: EmittedFn,
    /// `Some(v)` overrides the AND-reduction over children with `v`; `None`
    /// inherits it (spec.md §4.5).
    pub feature_constant: Option<bool>,
    pub zoom_constant: Option<bool>,
}

impl CompileStep {
    pub fn new(emitted: EmittedFn) -> Self {
        CompileStep {
            emitted,
            feature_constant: None,
            zoom_constant: None,
        }
    }

    pub fn feature_constant(mut self, value: bool) -> Self {
        self.feature_constant = Some(value);
        self
    }

    pub fn zoom_constant(mut self, value: bool) -> Self {
        self.zoom_constant = Some(value);
        self
    }
}

/// One already-compiled node, used as the input to its parent's `compile`
/// call (spec.md §3 `CompiledExpression`).
pub struct CompiledExpression {
    pub emitted: EmittedFn,
    pub ty: Type,
    pub is_feature_constant: bool,
    pub is_zoom_constant: bool,
    pub source: Expression,
}

/// The public success shape of `compile()` (spec.md §6.1).
pub struct CompileSuccess {
    pub ty: Type,
    pub is_feature_constant: bool,
    pub is_zoom_constant: bool,
    pub evaluate: EmittedFn,
}

pub type CompileOutcome = Result<CompileSuccess, Vec<Diagnostic>>;

/// Parse, check and compile `raw` against `expected` (spec.md §6.1's public
/// `compile(expr, expectedType?)` entry point). `expected` defaults to the
/// top type (`Value`) when omitted.
pub fn compile(raw: &serde_json::Value, expected: Option<Type>) -> CompileOutcome {
    let ctx = ParsingContext::root(&REGISTRY);
    let parsed = parser::parse(raw, &ctx).map_err(|e| vec![e])?;
    let expected = expected.unwrap_or_else(Type::value);
    let checked = check::check(&expected, parsed)?;
    let compiled = compile_expr(&checked)?;
    Ok(CompileSuccess {
        ty: compiled.ty,
        is_feature_constant: compiled.is_feature_constant,
        is_zoom_constant: compiled.is_zoom_constant,
        evaluate: compiled.emitted,
    })
}

fn compile_expr(expr: &Expression) -> Result<CompiledExpression, Vec<Diagnostic>> {
    match expr {
        Expression::Literal { value, ty, .. } => {
            log::trace!("compiling literal at \"{}\"", expr.key());
            let value = value.clone();
            let emitted: EmittedFn = Arc::new(move |_helper, _props, _feature| Ok(value.clone()));
            Ok(CompiledExpression {
                emitted,
                ty: ty.clone(),
                is_feature_constant: true,
                is_zoom_constant: true,
                source: expr.clone(),
            })
        }
        Expression::Call {
            op, args, ty, key, ..
        } => {
            let mut compiled_args = Vec::with_capacity(args.len());
            let mut errors = Vec::new();
            for arg in args {
                match compile_expr(arg) {
                    Ok(compiled) => compiled_args.push(compiled),
                    Err(errs) => errors.extend(errs),
                }
            }
            if !errors.is_empty() {
                return Err(errors);
            }

            let def = REGISTRY
                .get(op)
                .unwrap_or_else(|| panic!("operator \"{op}\" missing from registry after check"));
            log::trace!("compiling \"{op}\" at \"{key}\"");
            let step = (def.compile)(expr, &compiled_args)
                .map_err(|errs| errs.into_iter().map(|d| d.under(key)).collect::<Vec<_>>())?;

            let is_feature_constant = step
                .feature_constant
                .unwrap_or_else(|| compiled_args.iter().all(|c| c.is_feature_constant));
            let is_zoom_constant = step
                .zoom_constant
                .unwrap_or_else(|| compiled_args.iter().all(|c| c.is_zoom_constant));

            Ok(CompiledExpression {
                emitted: step.emitted,
                ty: ty.lambda_result(),
                is_feature_constant,
                is_zoom_constant,
                source: expr.clone(),
            })
        }
    }
}
