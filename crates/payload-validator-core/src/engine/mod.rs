//! Validation engine
//!
//! [`compile`] turns a schema into a [`CompiledSchema`]; evaluating it against
//! a payload produces a [`ValidationReport`]. Compiled schemas are immutable
//! and can be shared across threads and requests.

pub mod checks;
pub mod compiler;
pub mod formats;

pub use checks::{Check, CheckOutcome, JsonShape, MessageTemplate, TemporalFormat};
pub use compiler::{compile, compile_field};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::report::{FieldErrors, ValidationReport};
use crate::rules::FieldType;

/// Compiled validation program for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckPlan {
    pub field: String,
    pub field_type: FieldType,
    pub checks: Vec<Check>,
}

impl CheckPlan {
    pub fn is_required(&self) -> bool {
        self.checks.first().is_some_and(Check::is_required)
    }

    /// Run the plan against the field's value.
    ///
    /// Returns the failure messages in check order, plus a replacement value
    /// when a check normalized the input.
    pub fn run(&self, value: Option<&Value>) -> (Vec<String>, Option<Value>) {
        let value = match value.filter(|v| !formats::is_blank(v)) {
            Some(value) => value,
            None => {
                // Absent: a required check reports and stops, anything else is skipped
                let errors = match self.checks.first() {
                    Some(Check::Required { message }) => {
                        vec![message.render(&self.field, None, None)]
                    }
                    _ => Vec::new(),
                };
                return (errors, None);
            }
        };

        let mut errors = Vec::new();
        let mut normalized = None;
        for check in &self.checks {
            match check.apply(&self.field, value) {
                CheckOutcome::Pass => {}
                CheckOutcome::Normalized(v) => normalized = Some(v),
                CheckOutcome::Fail(message) => {
                    tracing::trace!(field = %self.field, check = check.kind(), "Check failed");
                    errors.push(message);
                }
            }
        }

        (errors, normalized)
    }
}

/// Ordered set of check plans, one per schema field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSchema {
    plans: Vec<CheckPlan>,
}

impl CompiledSchema {
    /// Compile a schema; see [`compile`]
    pub fn compile(schema: &Value) -> crate::error::Result<Self> {
        compile(schema)
    }

    pub fn plans(&self) -> &[CheckPlan] {
        &self.plans
    }

    pub fn plan(&self, field: &str) -> Option<&CheckPlan> {
        self.plans.iter().find(|p| p.field == field)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Evaluate a payload against every plan.
    ///
    /// All fields are evaluated regardless of failures elsewhere. The
    /// caller's payload is left untouched; normalized values are written to a
    /// working copy returned in the report.
    pub fn evaluate(&self, payload: &Map<String, Value>) -> ValidationReport {
        let mut normalized = payload.clone();
        let mut errors = FieldErrors::default();

        for plan in &self.plans {
            let (messages, replacement) = plan.run(payload.get(&plan.field));
            if let Some(value) = replacement {
                normalized.insert(plan.field.clone(), value);
            }
            if !messages.is_empty() {
                errors.push(&plan.field, plan.field_type, messages);
            }
        }

        tracing::debug!(
            fields = self.plans.len(),
            failed_fields = errors.len(),
            "Evaluated payload"
        );
        ValidationReport::new(errors, normalized)
    }
}

/// Evaluate a payload against a compiled schema
pub fn evaluate(compiled: &CompiledSchema, payload: &Map<String, Value>) -> ValidationReport {
    compiled.evaluate(payload)
}

/// Compile `schema` and evaluate `payload` against it in one step
pub fn validate(schema: &Value, payload: &Map<String, Value>) -> crate::error::Result<ValidationReport> {
    Ok(compile(schema)?.evaluate(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_short_circuits() {
        let compiled = compile(&json!({
            "name": {"type": "string", "required": true, "min_length": 3}
        }))
        .unwrap();

        let report = compiled.evaluate(&payload(json!({})));
        assert_eq!(report.errors.get("name"), Some(&["name is required.".to_string()][..]));

        let report = compiled.evaluate(&payload(json!({"name": "   "})));
        assert_eq!(report.errors.get("name").map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_plan_lookup_and_required_flag() {
        let compiled = CompiledSchema::compile(&json!({
            "name": {"type": "string", "required": true},
            "nick": {"type": "string", "required": false}
        }))
        .unwrap();

        assert_eq!(compiled.len(), 2);
        assert!(compiled.plan("name").unwrap().is_required());
        assert!(!compiled.plan("nick").unwrap().is_required());
        assert!(compiled.plan("missing").is_none());
    }

    #[test]
    fn test_required_accepts_false_and_zero() {
        let compiled = compile(&json!({
            "flag": {"type": "boolean", "required": true},
            "count": {"type": "number", "required": true}
        }))
        .unwrap();

        let report = compiled.evaluate(&payload(json!({"flag": false, "count": 0})));
        assert!(report.valid);
    }

    #[test]
    fn test_optional_absent_field_is_skipped() {
        let compiled = compile(&json!({
            "born": {"type": "date"},
            "score": {"type": "number", "min": 1}
        }))
        .unwrap();

        let report = compiled.evaluate(&payload(json!({"score": null})));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_number_collects_every_failure() {
        let compiled = compile(&json!({
            "age": {"type": "number", "min": 5, "max": 10}
        }))
        .unwrap();

        let report = compiled.evaluate(&payload(json!({"age": "old"})));
        assert_eq!(
            report.errors.get("age").unwrap(),
            &[
                "Not a valid integer value.".to_string(),
                "age must be between 5 and 10!".to_string()
            ]
        );
    }

    #[test]
    fn test_email_length_and_format_both_reported() {
        let compiled = compile(&json!({
            "contact": {"type": "email", "min_length": 20}
        }))
        .unwrap();

        let report = compiled.evaluate(&payload(json!({"contact": "nope"})));
        assert_eq!(
            report.errors.get("contact").unwrap(),
            &[
                "contact must have at least 20 characters!".to_string(),
                "Email must be a valid email!".to_string()
            ]
        );
    }

    #[test]
    fn test_boolean_normalization_leaves_input_untouched() {
        let compiled = compile(&json!({"active": {"type": "boolean"}})).unwrap();
        let input = payload(json!({"active": "1", "extra": "kept"}));

        let report = compiled.evaluate(&input);
        assert!(report.valid);
        assert_eq!(report.normalized["active"], json!(true));
        assert_eq!(report.normalized["extra"], json!("kept"));
        assert_eq!(input["active"], json!("1"));
    }

    #[test]
    fn test_validate_propagates_schema_errors() {
        let err = validate(&json!({"x": {"type": "uuid"}}), &Map::new()).unwrap_err();
        assert_eq!(err.field(), Some("x"));
    }
}
