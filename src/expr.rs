//! The parsed/checked expression tree (spec.md §3 `Expression`).
//!
//! Grounded on `src/ast/expression.rs`'s enum-of-node-shapes and its
//! `position()` accessor, adapted from line/column source positions to the
//! dotted-path `key` produced by [`crate::context::ParsingContext`].
use crate::types::Type;

/// A literal value in its raw JSON form (spec.md §6.4: "the input is a
/// JSON-like value").
pub type LiteralValue = serde_json::Value;

/// Operator-specific payload attached to a [`Expression::Call`] by a parse
/// override (spec.md §4.2, §4.7, §4.8).
#[derive(Debug, Clone, PartialEq)]
pub enum Extra {
    Curve(CurveSpec),
    /// `match`'s label groups, parallel to the non-discriminator,
    /// non-default args: `labels[i]` is the set of label values (more than
    /// one when the array-sugar form is used) that dispatch to `args[i+1]`
    /// (spec.md §4.8). Labels are static dispatch keys, not expressions, so
    /// they live here rather than in `args`.
    Match(Vec<Vec<LiteralValue>>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Exponential interpolation with the given base (spec.md §4.7).
    Exponential(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurveSpec {
    pub interpolation: Interpolation,
}

/// A node in the parsed tree: either a literal or an operator invocation
/// (spec.md §3).
#[derive(Debug, Clone)]
pub enum Expression {
    Literal {
        value: LiteralValue,
        ty: Type,
        key: String,
    },
    Call {
        op: &'static str,
        args: Vec<Expression>,
        /// The operator's signature, specialized by the type checker
        /// (spec.md §4.4 step 4). Before checking, this is the registry's
        /// canonical, possibly generic, signature.
        ty: Type,
        extra: Option<Extra>,
        key: String,
    },
}

impl Expression {
    pub fn key(&self) -> &str {
        match self {
            Expression::Literal { key, .. } => key,
            Expression::Call { key, .. } => key,
        }
    }

    /// The type this expression produces when evaluated: the literal's own
    /// type, or a call's specialized result type (spec.md §4.5: "Result type
    /// of a Lambda-call is `type.result` after specialization").
    pub fn value_type(&self) -> Type {
        match self {
            Expression::Literal { ty, .. } => ty.clone(),
            Expression::Call { ty, .. } => ty.lambda_result(),
        }
    }

    pub fn extra(&self) -> Option<&Extra> {
        match self {
            Expression::Literal { .. } => None,
            Expression::Call { extra, .. } => extra.as_ref(),
        }
    }

    pub fn args(&self) -> &[Expression] {
        match self {
            Expression::Literal { .. } => &[],
            Expression::Call { args, .. } => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_value_type_is_its_own_type() {
        let e = Expression::Literal {
            value: serde_json::json!(1.0),
            ty: Type::number(),
            key: "0".to_owned(),
        };
        assert_eq!(e.value_type(), Type::number());
    }

    #[test]
    fn call_value_type_is_lambda_result() {
        let e = Expression::Call {
            op: "+",
            args: vec![],
            ty: Type::lambda(Type::number(), vec![]),
            extra: None,
            key: "".to_owned(),
        };
        assert_eq!(e.value_type(), Type::number());
    }
}
