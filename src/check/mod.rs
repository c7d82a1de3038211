//! Type checker: unifies an expected type against a parsed expression,
//! solving for generic type variables and re-stamping each node with its
//! specialized type (spec.md §4.4).
//!
//! Grounded on `src/typechecker/mod.rs::Typechecker::check`'s per-node-kind
//! dispatch and `Result<_, TypeError>`-returning recursive shape, generalized
//! from a fixed small grammar to the operator-registry-driven signature
//! expansion and unification spec.md §4.4 requires.
use crate::error::Diagnostic;
use crate::expr::Expression;
use crate::types::{match_types, substitute, Bindings, ParamSpec, Type};


/// Check `expr` against `expected`, returning a re-stamped tree on success
/// or every diagnostic accumulated across sibling branches on failure
/// (spec.md §7: "accumulated across sibling branches before surfacing").
pub fn check(expected: &Type, expr: Expression) -> Result<Expression, Vec<Diagnostic>> {
    match expr {
        Expression::Literal { value, ty, key } => {
            match_types(expected, &ty, &Bindings::new()).map_err(|err| {
                log::debug!("literal at \"{key}\" failed to unify: {}", err.message());
                vec![Diagnostic::type_error(key.clone(), err.message())]
            })?;
            Ok(Expression::Literal { value, ty, key })
        }
        Expression::Call {
            op,
            args,
            ty,
            extra,
            key,
        } => {
            let (sig_result, sig_params) = match &ty {
                Type::Lambda { result, params } => (result.as_ref().clone(), params.clone()),
                other => (other.clone(), vec![]),
            };

            let expanded = expand_params(&sig_params, args.len()).ok_or_else(|| {
                vec![Diagnostic::type_error(
                    key.clone(),
                    format!(
                        "\"{op}\" expected a different number of arguments, got {}",
                        args.len()
                    ),
                )]
            })?;

            // A generic result (e.g. `case`/`coalesce`/`match`/`curve`/`at` return T)
            // can't be matched against a concrete `expected` yet — it's still a bare
            // Typename. Narrow `bindings` here only when the match already succeeds;
            // otherwise leave it empty and let the per-argument loop below bind T from
            // the actual argument types, then check the specialized result at the end
            // (spec.md §4.4: a Typename still unbound after all arguments is an error).
            let mut bindings =
                match_types(expected, &sig_result, &Bindings::new()).unwrap_or_default();

            let mut checked_args = Vec::with_capacity(args.len());
            let mut errors = Vec::new();
            for (arg, expected_i) in args.into_iter().zip(expanded.iter()) {
                let effective = substitute(expected_i, &bindings);
                match check(&effective, arg) {
                    Ok(checked) => {
                        let actual = checked.value_type();
                        if let Ok(next) = match_types(expected_i, &actual, &bindings) {
                            bindings = next;
                        }
                        checked_args.push(checked);
                    }
                    Err(errs) => errors.extend(errs),
                }
            }
            if !errors.is_empty() {
                return Err(errors);
            }

            let specialized_params: Vec<ParamSpec> = sig_params
                .iter()
                .map(|p| match p {
                    ParamSpec::Single(t) => ParamSpec::Single(substitute(t, &bindings)),
                    ParamSpec::NArgs { min, max, items } => ParamSpec::NArgs {
                        min: *min,
                        max: *max,
                        items: items.iter().map(|t| substitute(t, &bindings)).collect(),
                    },
                })
                .collect();
            let specialized_result = substitute(&sig_result, &bindings);

            if specialized_result.contains_typename()
                || specialized_params.iter().any(|p| match p {
                    ParamSpec::Single(t) => t.contains_typename(),
                    ParamSpec::NArgs { items, .. } => items.iter().any(Type::contains_typename),
                })
            {
                return Err(vec![Diagnostic::type_error(
                    key.clone(),
                    "could not infer type of a generic parameter".to_owned(),
                )]);
            }

            match_types(expected, &specialized_result, &Bindings::new())
                .map_err(|err| vec![Diagnostic::type_error(key.clone(), err.message())])?;

            let specialized = Type::lambda(specialized_result, specialized_params);
            Ok(Expression::Call {
                op,
                args: checked_args,
                ty: specialized,
                extra,
                key,
            })
        }
    }
}

/// Flatten `params` to exactly `arg_count` concrete slots, repeating an
/// `NArgs` group (if present) as many times as needed to cover the
/// remainder, subject to its `min`/`max` bounds (spec.md §4.4 step 1,
/// §9 "Variadic parameter groups").
fn expand_params(params: &[ParamSpec], arg_count: usize) -> Option<Vec<Type>> {
    match params.iter().position(|p| matches!(p, ParamSpec::NArgs { .. })) {
        None => {
            if params.len() != arg_count {
                return None;
            }
            Some(
                params
                    .iter()
                    .map(|p| match p {
                        ParamSpec::Single(t) => t.clone(),
                        ParamSpec::NArgs { .. } => unreachable!(),
                    })
                    .collect(),
            )
        }
        Some(idx) => {
            let before = &params[..idx];
            let after = &params[idx + 1..];
            let (min, max, items) = match &params[idx] {
                ParamSpec::NArgs { min, max, items } => (*min, *max, items),
                _ => unreachable!(),
            };
            let fixed = before.len() + after.len();
            if arg_count < fixed || items.is_empty() {
                return None;
            }
            let remaining = arg_count - fixed;
            if remaining % items.len() != 0 {
                return None;
            }
            let reps = remaining / items.len();
            if min.map_or(false, |min| reps < min) {
                return None;
            }
            if max.map_or(false, |max| reps > max) {
                return None;
            }

            let mut expanded = Vec::with_capacity(arg_count);
            for p in before {
                expanded.push(single(p));
            }
            for _ in 0..reps {
                expanded.extend(items.iter().cloned());
            }
            for p in after {
                expanded.push(single(p));
            }
            Some(expanded)
        }
    }
}

fn single(p: &ParamSpec) -> Type {
    match p {
        ParamSpec::Single(t) => t.clone(),
        ParamSpec::NArgs { .. } => unreachable!("NArgs only valid as its own group"),
    }
}
