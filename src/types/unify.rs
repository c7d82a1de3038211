//! One-way unification of an expected type against an actual type, with a
//! small generic-variable binding map threaded through the recursion
//! (spec.md §4.1 `match`/`substitute`, §9 "Generics via typenames").
//!
//! Grounded on `src/typechecker/scope.rs::Scope`: a `HashMap`-backed binding
//! store with get/insert, generalized here from variable name → value type
//! to typename → type.
use std::collections::HashMap;

use super::{ParamSpec, Primitive, Type};

/// Bindings accumulated while matching a lambda's signature against its
/// actual argument types. No occurs-check is needed: typenames only ever
/// originate from operator signatures, never from user input (spec.md §9).
pub type Bindings = HashMap<String, Type>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchError {
    /// Human-readable reasons why `expected` did not match `actual`. More
    /// than one reason accumulates when `expected` is a [`Type::Variant`]
    /// and every member failed.
    pub reasons: Vec<String>,
}

impl MatchError {
    fn single(reason: impl Into<String>) -> Self {
        MatchError {
            reasons: vec![reason.into()],
        }
    }

    pub fn message(&self) -> String {
        self.reasons.join("; ")
    }
}

/// Match `expected` against `actual`, extending `bindings` with any newly
/// solved type variables. Returns the extended bindings on success.
pub fn match_types(
    expected: &Type,
    actual: &Type,
    bindings: &Bindings,
) -> Result<Bindings, MatchError> {
    match expected {
        Type::Primitive(Primitive::Value) => Ok(bindings.clone()),

        Type::Typename(name) => match bindings.get(name) {
            Some(bound) => match_types(&bound.clone(), actual, bindings),
            None => {
                let mut next = bindings.clone();
                next.insert(name.clone(), actual.clone());
                Ok(next)
            }
        },

        Type::Variant(members) => {
            let mut reasons = vec![];
            for member in members {
                match match_types(member, actual, bindings) {
                    Ok(next) => return Ok(next),
                    Err(err) => reasons.extend(err.reasons),
                }
            }
            Err(MatchError { reasons })
        }

        Type::Array {
            item_type: expected_item,
            length: expected_len,
        } => match actual {
            Type::Array {
                item_type: actual_item,
                length: actual_len,
            } => {
                let next = match_types(expected_item, actual_item, bindings)
                    .map_err(|err| MatchError::single(format!("{}: {}", expected, err.message())))?;
                match expected_len {
                    Some(len) if Some(*len) != *actual_len => Err(MatchError::single(format!(
                        "expected {expected}, got {actual}"
                    ))),
                    _ => Ok(next),
                }
            }
            _ => Err(MatchError::single(format!(
                "expected {expected}, got {actual}"
            ))),
        },

        Type::Primitive(expected_name) => match actual {
            Type::Primitive(actual_name) if expected_name == actual_name => Ok(bindings.clone()),
            _ => Err(MatchError::single(format!(
                "expected {expected}, got {actual}"
            ))),
        },

        Type::Lambda { .. } => Err(MatchError::single(format!(
            "expected {expected}, got {actual}"
        ))),
    }
}

/// Replace every [`Type::Typename`] in `t` with its binding. Unbound
/// typenames are left as-is.
pub fn substitute(t: &Type, bindings: &Bindings) -> Type {
    match t {
        Type::Typename(name) => bindings.get(name).cloned().unwrap_or_else(|| t.clone()),
        Type::Primitive(_) => t.clone(),
        Type::Array { item_type, length } => Type::Array {
            item_type: Box::new(substitute(item_type, bindings)),
            length: *length,
        },
        Type::Variant(members) => {
            Type::Variant(members.iter().map(|m| substitute(m, bindings)).collect())
        }
        Type::Lambda { result, params } => Type::Lambda {
            result: Box::new(substitute(result, bindings)),
            params: params
                .iter()
                .map(|p| match p {
                    ParamSpec::Single(t) => ParamSpec::Single(substitute(t, bindings)),
                    ParamSpec::NArgs { min, max, items } => ParamSpec::NArgs {
                        min: *min,
                        max: *max,
                        items: items.iter().map(|t| substitute(t, bindings)).collect(),
                    },
                })
                .collect(),
        },
    }
}
