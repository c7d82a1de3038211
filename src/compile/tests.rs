use super::*;
use crate::runtime::{Helper, RuntimeError, Value};

/// A [`Helper`] whose every method panics. Tests in this module only exercise
/// the driver's tree-walking, aggregation and error-plumbing behavior, never
/// `evaluate`, so none of these should ever run.
struct UnusedHelper;

impl Helper for UnusedHelper {
    fn to_string(&self, _value: &Value) -> Result<String, RuntimeError> {
        unreachable!()
    }
    fn to_number(&self, _value: &Value) -> Result<f64, RuntimeError> {
        unreachable!()
    }
    fn to_boolean(&self, _value: &Value) -> Result<bool, RuntimeError> {
        unreachable!()
    }
    fn as_type(&self, _value: &Value, _type_name: &str, _path: &str) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn get(&self, _obj: &Value, _key: &str, _path: &str) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn has(&self, _obj: &Value, _key: &str) -> Result<bool, RuntimeError> {
        unreachable!()
    }
    fn at(&self, _index: f64, _array: &Value) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn object(&self, _value: &Value) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn unwrap(&self, _value: &Value) -> Value {
        unreachable!()
    }
    fn parse_color(&self, _text: &str) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn rgba(&self, _r: f64, _g: f64, _b: f64, _a: Option<f64>) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn type_of(&self, _value: &Value) -> String {
        unreachable!()
    }
    fn coalesce(
        &self,
        _thunks: &[&dyn Fn() -> Result<Value, RuntimeError>],
    ) -> Result<Value, RuntimeError> {
        unreachable!()
    }
    fn evaluate_curve(
        &self,
        _input: f64,
        _stop_inputs: &[f64],
        _stop_outputs: &[&dyn Fn() -> Result<Value, RuntimeError>],
        _interpolation: crate::runtime::Interpolation,
        _output_kind: &str,
    ) -> Result<Value, RuntimeError> {
        unreachable!()
    }
}

#[test]
fn literal_compiles_to_a_constant_evaluator() {
    let result = compile(&serde_json::json!(5), None).expect("compile ok");
    assert!(result.is_feature_constant);
    assert!(result.is_zoom_constant);
    let value = (result.evaluate)(&UnusedHelper, &serde_json::json!({}), &serde_json::json!(null))
        .expect("evaluate ok");
    assert_eq!(value, serde_json::json!(5.0));
}

#[test]
fn unknown_operator_is_rejected_before_compilation() {
    let errs = compile(&serde_json::json!(["nope", 1]), None).expect_err("expected parse error");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].key, "0");
}

#[test]
fn sibling_type_errors_are_all_reported_together() {
    let errs = compile(&serde_json::json!(["+", 1, "a", "b"]), None)
        .expect_err("expected accumulated type errors");
    assert_eq!(errs.len(), 2);
    assert_eq!(errs[0].key, "2");
    assert_eq!(errs[1].key, "3");
}

#[test]
fn purity_is_the_conjunction_of_children() {
    let result = compile(&serde_json::json!(["+", ["get", "x"], 1]), None).expect("compile ok");
    assert!(!result.is_feature_constant);
    assert!(result.is_zoom_constant);
}

#[test]
fn compile_error_from_an_operators_own_compile_step_carries_its_key() {
    let errs = compile(
        &serde_json::json!(["curve", ["linear"], ["zoom"], ["+", 0, 0], 1, 4, 2]),
        None,
    )
    .expect_err("expected a compile error for a computed stop input");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].key, "");
}
