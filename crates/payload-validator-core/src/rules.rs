//! Rule set definitions
//!
//! A schema maps field names to rule sets. This module reads one rule set out
//! of its JSON form into a typed [`RuleSet`], coercing numeric bounds and
//! rejecting unsupported field types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Result, SchemaError};

/// The closed set of field types a rule set may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    String,
    Email,
    DateTime,
    Date,
    Time,
    Dictionary,
    Array,
    Boolean,
}

impl FieldType {
    /// All supported types, in the order they are reported to callers
    pub const ALL: [FieldType; 9] = [
        FieldType::Number,
        FieldType::String,
        FieldType::Email,
        FieldType::DateTime,
        FieldType::Date,
        FieldType::Time,
        FieldType::Dictionary,
        FieldType::Array,
        FieldType::Boolean,
    ];

    /// Schema keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Email => "email",
            FieldType::DateTime => "datetime",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Dictionary => "dictionary",
            FieldType::Array => "array",
            FieldType::Boolean => "boolean",
        }
    }

    /// Look up a type by its schema keyword (case-sensitive)
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == keyword)
    }

    /// Comma-separated list of the supported keywords
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(FieldType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric bound as supplied in the schema.
///
/// Integers and floats are kept apart so messages echo the bound the way
/// it was written (`5` vs `5.5`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

impl Bound {
    pub fn as_f64(&self) -> f64 {
        match self {
            Bound::Int(i) => *i as f64,
            Bound::Float(f) => *f,
        }
    }

    /// Coerce a bound parameter from its JSON form.
    ///
    /// `null` means the bound is absent. Strings are parsed as a float when
    /// they contain a decimal point and as an integer otherwise.
    pub fn parse(field: &str, parameter: &str, value: &Value) -> Result<Option<Self>> {
        let invalid = |rendered: String| SchemaError::InvalidBound {
            field: field.to_string(),
            parameter: parameter.to_string(),
            value: rendered,
        };

        let bound = match value {
            Value::Null => return Ok(None),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Bound::Int(i),
                None => n
                    .as_f64()
                    .map(Bound::Float)
                    .ok_or_else(|| invalid(n.to_string()))?,
            },
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.contains('.') {
                    trimmed
                        .parse::<f64>()
                        .map(Bound::Float)
                        .map_err(|_| invalid(s.clone()))?
                } else {
                    trimmed
                        .parse::<i64>()
                        .map(Bound::Int)
                        .map_err(|_| invalid(s.clone()))?
                }
            }
            other => return Err(invalid(other.to_string())),
        };

        if !bound.as_f64().is_finite() {
            return Err(invalid(value_text(value)));
        }
        Ok(Some(bound))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part on whole floats ("5.0")
            Bound::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Typed view of one field's rule set
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub field_type: FieldType,
    pub required: bool,
    pub required_message: Option<String>,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub min_length: Option<Bound>,
    pub max_length: Option<Bound>,
    pub length_message: Option<String>,
    pub range_message: Option<String>,
}

impl RuleSet {
    /// Read a rule set for `field` out of its JSON form.
    ///
    /// Bounds are only read for the types that use them: `min`/`max` for
    /// numbers, `min_length`/`max_length` for strings and emails.
    pub fn parse(field: &str, rules: &Value) -> Result<Self> {
        let rules = rules.as_object().ok_or_else(|| SchemaError::InvalidRuleSet {
            field: field.to_string(),
        })?;

        let field_type = match rules.get("type") {
            None | Some(Value::Null) => {
                return Err(SchemaError::MissingType {
                    field: field.to_string(),
                })
            }
            Some(Value::String(keyword)) => {
                FieldType::parse(keyword).ok_or_else(|| SchemaError::UnsupportedType {
                    field: field.to_string(),
                    found: keyword.clone(),
                })?
            }
            Some(other) => {
                return Err(SchemaError::UnsupportedType {
                    field: field.to_string(),
                    found: other.to_string(),
                })
            }
        };

        let bound = |parameter: &str| -> Result<Option<Bound>> {
            match rules.get(parameter) {
                Some(value) => Bound::parse(field, parameter, value),
                None => Ok(None),
            }
        };
        let message = |parameter: &str| -> Result<Option<String>> {
            match rules.get(parameter) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(SchemaError::InvalidMessage {
                    field: field.to_string(),
                    parameter: parameter.to_string(),
                }),
            }
        };

        let (min, max) = match field_type {
            FieldType::Number => (bound("min")?, bound("max")?),
            _ => (None, None),
        };
        let (min_length, max_length) = match field_type {
            FieldType::String | FieldType::Email => (bound("min_length")?, bound("max_length")?),
            _ => (None, None),
        };

        Ok(Self {
            field_type,
            required: rules.get("required").is_some_and(is_truthy),
            required_message: message("required_message")?,
            min,
            max,
            min_length,
            max_length,
            length_message: message("length_message")?,
            range_message: message("range_message")?,
        })
    }
}

/// Truthiness of a JSON value: `false`, `null`, zero, and empty
/// strings/arrays/objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_keywords() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::parse(t.as_str()), Some(t));
        }
        assert_eq!(FieldType::parse("integer"), None);
        assert_eq!(FieldType::parse("String"), None);
    }

    #[test]
    fn test_bound_coercion() {
        assert_eq!(Bound::parse("f", "min", &json!(5)).unwrap(), Some(Bound::Int(5)));
        assert_eq!(Bound::parse("f", "min", &json!("5")).unwrap(), Some(Bound::Int(5)));
        assert_eq!(
            Bound::parse("f", "min", &json!("5.5")).unwrap(),
            Some(Bound::Float(5.5))
        );
        assert_eq!(Bound::parse("f", "min", &json!(null)).unwrap(), None);
    }

    #[test]
    fn test_bound_coercion_failure() {
        let err = Bound::parse("age", "max", &json!("ten")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidBound {
                field: "age".to_string(),
                parameter: "max".to_string(),
                value: "ten".to_string(),
            }
        );

        assert!(Bound::parse("age", "max", &json!("5.x")).is_err());
        assert!(Bound::parse("age", "max", &json!(true)).is_err());
        assert!(Bound::parse("age", "max", &json!("inf")).is_err());
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(Bound::Int(10).to_string(), "10");
        assert_eq!(Bound::Float(2.5).to_string(), "2.5");
        assert_eq!(Bound::Float(5.0).to_string(), "5.0");
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }

    #[test]
    fn test_rule_set_parse() {
        let rules = RuleSet::parse(
            "age",
            &json!({"type": "number", "required": true, "min": "18", "max": 65.5}),
        )
        .unwrap();
        assert_eq!(rules.field_type, FieldType::Number);
        assert!(rules.required);
        assert_eq!(rules.min, Some(Bound::Int(18)));
        assert_eq!(rules.max, Some(Bound::Float(65.5)));
        assert_eq!(rules.min_length, None);
    }

    #[test]
    fn test_rule_set_ignores_unrelated_bounds() {
        // min_length on a date field is never read, so it cannot fail
        let rules = RuleSet::parse("when", &json!({"type": "date", "min_length": "abc"})).unwrap();
        assert_eq!(rules.field_type, FieldType::Date);
        assert_eq!(rules.min_length, None);
    }

    #[test]
    fn test_rule_set_type_errors() {
        assert_eq!(
            RuleSet::parse("x", &json!({"required": true})).unwrap_err(),
            SchemaError::MissingType { field: "x".to_string() }
        );
        assert_eq!(
            RuleSet::parse("x", &json!({"type": "float"})).unwrap_err(),
            SchemaError::UnsupportedType {
                field: "x".to_string(),
                found: "float".to_string()
            }
        );
        assert_eq!(
            RuleSet::parse("x", &json!("string")).unwrap_err(),
            SchemaError::InvalidRuleSet { field: "x".to_string() }
        );
    }

    #[test]
    fn test_rule_set_message_must_be_string() {
        let err = RuleSet::parse("x", &json!({"type": "string", "length_message": 3})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidMessage { .. }));
    }
}
