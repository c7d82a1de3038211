//! Parser, type checker and compiler front-end for a declarative
//! expression language used to express data-driven styling of map features
//! (spec.md §1).
//!
//! The public surface is the single [`compile()`] entry point: it parses a
//! raw `serde_json::Value` AST, type-checks it against an optional expected
//! [`types::Type`], and produces an evaluator closure plus feature/zoom
//! purity bits (spec.md §6.1). Runtime evaluation (coercions, color parsing,
//! feature accessors, curve math) is provided by an external collaborator
//! implementing [`runtime::Helper`] (spec.md §6.2) — this crate does not
//! ship one.
mod check;
mod compile;
mod context;
mod error;
mod expr;
mod ops;
mod parser;
mod registry;
pub mod runtime;
mod types;

pub use compile::{compile, CompileOutcome, CompileSuccess};
pub use error::{Diagnostic, DiagnosticKind};
pub use types::{ParamSpec, Primitive, Type};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NoopHelper;

    /// A minimal [`runtime::Helper`] covering exactly what the end-to-end
    /// scenarios in spec.md §8 need. Not a general-purpose implementation —
    /// this crate explicitly leaves that to an external collaborator
    /// (spec.md §1, §6.2).
    impl runtime::Helper for NoopHelper {
        fn to_string(&self, value: &runtime::Value) -> Result<String, runtime::RuntimeError> {
            match value {
                serde_json::Value::String(s) => Ok(s.clone()),
                serde_json::Value::Number(n) => Ok(n.to_string()),
                serde_json::Value::Bool(b) => Ok(b.to_string()),
                other => Ok(other.to_string()),
            }
        }

        fn to_number(&self, value: &runtime::Value) -> Result<f64, runtime::RuntimeError> {
            value
                .as_f64()
                .ok_or_else(|| runtime::RuntimeError::new(format!("expected a number, got {value}")))
        }

        fn to_boolean(&self, value: &runtime::Value) -> Result<bool, runtime::RuntimeError> {
            value
                .as_bool()
                .ok_or_else(|| runtime::RuntimeError::new(format!("expected a boolean, got {value}")))
        }

        fn as_type(
            &self,
            value: &runtime::Value,
            type_name: &str,
            path: &str,
        ) -> Result<runtime::Value, runtime::RuntimeError> {
            let matches = match type_name {
                "string" => value.is_string(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => false,
            };
            if matches {
                Ok(value.clone())
            } else {
                Err(runtime::RuntimeError::new(format!(
                    "expected {type_name} at \"{path}\", got {value}"
                )))
            }
        }

        fn get(
            &self,
            obj: &runtime::Value,
            key: &str,
            path: &str,
        ) -> Result<runtime::Value, runtime::RuntimeError> {
            obj.get(key).cloned().ok_or_else(|| {
                runtime::RuntimeError::new(format!("no property \"{key}\" at \"{path}\""))
            })
        }

        fn has(&self, obj: &runtime::Value, key: &str) -> Result<bool, runtime::RuntimeError> {
            Ok(obj.get(key).is_some())
        }

        fn at(&self, index: f64, array: &runtime::Value) -> Result<runtime::Value, runtime::RuntimeError> {
            let items = array
                .as_array()
                .ok_or_else(|| runtime::RuntimeError::new("\"at\" requires an array"))?;
            items
                .get(index as usize)
                .cloned()
                .ok_or_else(|| runtime::RuntimeError::new(format!("index {index} out of bounds")))
        }

        fn object(&self, value: &runtime::Value) -> Result<runtime::Value, runtime::RuntimeError> {
            Ok(value.clone())
        }

        fn unwrap(&self, value: &runtime::Value) -> runtime::Value {
            value.clone()
        }

        fn parse_color(&self, text: &str) -> Result<runtime::Value, runtime::RuntimeError> {
            Ok(serde_json::Value::String(text.to_owned()))
        }

        fn rgba(
            &self,
            r: f64,
            g: f64,
            b: f64,
            a: Option<f64>,
        ) -> Result<runtime::Value, runtime::RuntimeError> {
            Ok(json!([r, g, b, a.unwrap_or(1.0)]))
        }

        fn type_of(&self, value: &runtime::Value) -> String {
            match value {
                serde_json::Value::Null => "Null",
                serde_json::Value::String(_) => "String",
                serde_json::Value::Number(_) => "Number",
                serde_json::Value::Bool(_) => "Boolean",
                serde_json::Value::Array(_) => "Array",
                serde_json::Value::Object(_) => "Object",
            }
            .to_owned()
        }

        fn coalesce(
            &self,
            thunks: &[&dyn Fn() -> Result<runtime::Value, runtime::RuntimeError>],
        ) -> Result<runtime::Value, runtime::RuntimeError> {
            let mut last = None;
            for thunk in thunks {
                match thunk() {
                    Ok(v) => return Ok(v),
                    Err(e) => last = Some(e),
                }
            }
            Err(last.unwrap_or_else(|| runtime::RuntimeError::new("coalesce had no operands")))
        }

        fn evaluate_curve(
            &self,
            input: f64,
            stop_inputs: &[f64],
            stop_outputs: &[&dyn Fn() -> Result<runtime::Value, runtime::RuntimeError>],
            interpolation: runtime::Interpolation,
            _output_kind: &str,
        ) -> Result<runtime::Value, runtime::RuntimeError> {
            if input <= stop_inputs[0] {
                return stop_outputs[0]();
            }
            let last = stop_inputs.len() - 1;
            if input >= stop_inputs[last] {
                return stop_outputs[last]();
            }
            let upper = stop_inputs.iter().position(|&s| s > input).unwrap();
            let lower = upper - 1;
            let lo_in = stop_inputs[lower];
            let hi_in = stop_inputs[upper];
            let t = match interpolation {
                runtime::Interpolation::Step => 0.0,
                runtime::Interpolation::Linear => (input - lo_in) / (hi_in - lo_in),
                runtime::Interpolation::Exponential(base) => {
                    if (base - 1.0).abs() < f64::EPSILON {
                        (input - lo_in) / (hi_in - lo_in)
                    } else {
                        (base.powf(input - lo_in) - 1.0) / (base.powf(hi_in - lo_in) - 1.0)
                    }
                }
            };
            if t <= 0.0 {
                return stop_outputs[lower]();
            }
            let lo = self.to_number(&stop_outputs[lower]()?)?;
            let hi = self.to_number(&stop_outputs[upper]()?)?;
            Ok(json!(lo + (hi - lo) * t))
        }
    }

    #[test]
    fn end_to_end_variadic_sum() {
        let result = compile(&json!(["+", 2, 3, 4]), None).expect("compile ok");
        let value = (result.evaluate)(&NoopHelper, &json!({}), &json!(null)).unwrap();
        assert_eq!(value, json!(9.0));
        assert!(result.is_feature_constant);
        assert!(result.is_zoom_constant);
    }

    #[test]
    fn end_to_end_get_is_not_feature_constant() {
        let result = compile(&json!(["get", "name"]), None).expect("compile ok");
        let feature = json!({"properties": {"name": "X"}});
        // The 1-arg form reads the feature's properties, not the map-properties
        // argument — pass an unrelated value there to prove it's ignored.
        let value = (result.evaluate)(&NoopHelper, &json!(0.0), &feature).unwrap();
        assert_eq!(value, json!("X"));
        assert!(!result.is_feature_constant);
    }

    #[test]
    fn end_to_end_zoom_outside_curve_is_rejected() {
        let err = compile(&json!(["zoom"]), None).expect_err("expected a parsing error");
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].key, "");
        assert_eq!(
            err[0].message,
            "The \"zoom\" expression may only be used as the input to a top-level \"curve\" expression."
        );
    }

    #[test]
    fn end_to_end_exponential_curve_over_zoom() {
        let result = compile(
            &json!(["curve", ["exponential", 2], ["zoom"], 0, 10, 4, 20]),
            None,
        )
        .expect("compile ok");
        assert!(!result.is_zoom_constant);
        let value = (result.evaluate)(&NoopHelper, &json!(2.0), &json!(null)).unwrap();
        // Standard exponential-base interpolation factor (spec.md §4.7), not a
        // direct geometric scaling of the output: t = (base^x - 1) / (base^d - 1).
        let t = (2f64.powf(2.0) - 1.0) / (2f64.powf(4.0) - 1.0);
        let expected = 10.0 + (20.0 - 10.0) * t;
        match value {
            serde_json::Value::Number(n) => {
                assert!((n.as_f64().unwrap() - expected).abs() < 1e-9);
            }
            other => panic!("expected a number, got {other}"),
        }
    }

    #[test]
    fn end_to_end_equality_type_mismatch_is_rejected() {
        let err = compile(&json!(["==", 1, "a"]), None).expect_err("expected a type error");
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].key, "2");
    }

    #[test]
    fn end_to_end_case_picks_matching_branch() {
        let result = compile(&json!(["case", ["==", 1, 1], "yes", "no"]), None).expect("compile ok");
        let value = (result.evaluate)(&NoopHelper, &json!({}), &json!(null)).unwrap();
        assert_eq!(value, json!("yes"));
    }
}
