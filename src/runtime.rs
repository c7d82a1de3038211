//! The runtime helper context: the external collaborator every compiled
//! evaluator calls into (spec.md §6.2). Providing an implementation is out of
//! scope for this crate (spec.md §1); this module only shapes the interface.
use std::fmt;

/// The tagged value type flowing through a compiled evaluator. Reuses
/// `serde_json::Value` rather than inventing a parallel scalar/array/object
/// representation (SPEC_FULL.md §3).
pub type Value = serde_json::Value;

/// Raised by a [`Helper`] method when a runtime assertion fails (e.g. `as`
/// against a value of the wrong type, or a missing property). Distinct from
/// [`crate::error::Diagnostic`], which covers only parse/check/compile-time
/// failures (spec.md §8 "Type soundness": a bad runtime value either matches
/// the expected type or raises a runtime assertion error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// One interpolation mode recognized by `evaluateCurve`. Re-exported here so
/// implementations of [`Helper`] don't need to reach into [`crate::expr`].
pub use crate::expr::Interpolation;

/// The runtime collaborator a compiled evaluator calls into (spec.md §6.2).
/// Configured once per compiled evaluator; every method is pure from the
/// compiler's point of view.
pub trait Helper {
    fn to_string(&self, value: &Value) -> Result<String, RuntimeError>;
    fn to_number(&self, value: &Value) -> Result<f64, RuntimeError>;
    fn to_boolean(&self, value: &Value) -> Result<bool, RuntimeError>;

    /// Runtime type assertion: verify `value` has the named primitive kind
    /// (`"string"`, `"number"`, `"boolean"`, `"array"`, `"object"`),
    /// otherwise fail. `path` is the dotted key of the asserting expression,
    /// used to phrase the error.
    fn as_type(&self, value: &Value, type_name: &str, path: &str) -> Result<Value, RuntimeError>;

    fn get(&self, obj: &Value, key: &str, path: &str) -> Result<Value, RuntimeError>;
    fn has(&self, obj: &Value, key: &str) -> Result<bool, RuntimeError>;
    fn at(&self, index: f64, array: &Value) -> Result<Value, RuntimeError>;

    /// Normalize an arbitrary value into the `Object` representation.
    fn object(&self, value: &Value) -> Result<Value, RuntimeError>;
    /// Denormalize a tagged runtime value back into plain JSON, if the
    /// implementation carries a richer internal representation.
    fn unwrap(&self, value: &Value) -> Value;

    fn parse_color(&self, text: &str) -> Result<Value, RuntimeError>;
    fn rgba(&self, r: f64, g: f64, b: f64, a: Option<f64>) -> Result<Value, RuntimeError>;

    fn type_of(&self, value: &Value) -> String;

    /// Evaluate each thunk in order, returning the first one that succeeds.
    fn coalesce(
        &self,
        thunks: &[&dyn Fn() -> Result<Value, RuntimeError>],
    ) -> Result<Value, RuntimeError>;

    /// Evaluate a `curve` stop table at `input` under `interpolation`.
    /// `stop_outputs` are thunks so only the selected neighbor(s) run
    /// (spec.md §4.7: "emitted as deferred thunks").
    fn evaluate_curve(
        &self,
        input: f64,
        stop_inputs: &[f64],
        stop_outputs: &[&dyn Fn() -> Result<Value, RuntimeError>],
        interpolation: Interpolation,
        output_kind: &str,
    ) -> Result<Value, RuntimeError>;
}
