//! The standard operator set (spec.md §4.6-§4.8): one module per operator
//! family, each registering its operators into the shared registry.
//!
//! Grounded on `src/typechecker/mod.rs`'s per-construct `check_*` functions
//! (the general shape of "one function per operator family") and, for
//! `curve`'s parse override, on `src/ast/node.rs::from_fn_def`'s pattern of
//! consuming a fixed prefix before delegating to the generic per-argument
//! parse loop.
mod accessors;
mod arithmetic;
mod boolean;
mod comparison;
mod context_ops;
mod curve;
mod decisions;
mod match_op;
mod strings;
mod type_ops;

use crate::registry::Registry;
use crate::types::{ParamSpec, Type};

pub(crate) fn register_all(registry: &mut Registry) {
    type_ops::register(registry);
    accessors::register(registry);
    context_ops::register(registry);
    arithmetic::register(registry);
    comparison::register(registry);
    boolean::register(registry);
    strings::register(registry);
    decisions::register(registry);
    match_op::register(registry);
    curve::register(registry);
}

fn nullary(result: Type) -> Type {
    Type::lambda(result, vec![])
}

fn unary(result: Type, param: Type) -> Type {
    Type::lambda(result, vec![ParamSpec::Single(param)])
}

fn binary(result: Type, a: Type, b: Type) -> Type {
    Type::lambda(result, vec![ParamSpec::Single(a), ParamSpec::Single(b)])
}

fn variadic(result: Type, item: Type, min: Option<usize>) -> Type {
    Type::lambda(
        result,
        vec![ParamSpec::NArgs {
            min,
            max: None,
            items: vec![item],
        }],
    )
}

/// Extract the `properties` bag from a feature value, defaulting to an empty
/// object for a feature that omits it (spec.md §4.6 `properties()`).
fn feature_properties(feature: &serde_json::Value) -> serde_json::Value {
    feature
        .get("properties")
        .cloned()
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()))
}
