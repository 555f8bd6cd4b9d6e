//! Rule compiler
//!
//! Translates a schema into one [`CheckPlan`] per field. Check order within a
//! plan is fixed: required first, then coercion, length/range, and format.

use serde_json::Value;

use super::checks::{Check, JsonShape, MessageTemplate, TemporalFormat};
use super::{CheckPlan, CompiledSchema};
use crate::error::{Result, SchemaError};
use crate::rules::{Bound, FieldType, RuleSet};

const REQUIRED_DEFAULT: &str = "{field} is required.";

const LENGTH_BETWEEN: &str = "{field} must be between {min} and {max} characters!";
const LENGTH_MAX: &str = "{field} must not exceed {max} characters!";
const LENGTH_MIN: &str = "{field} must have at least {min} characters!";

const RANGE_BETWEEN: &str = "{field} must be between {min} and {max}!";
const RANGE_MIN: &str = "{field} must be at least {min}!";
const RANGE_MAX: &str = "{field} must be no greater than {max}!";

/// Compile a schema into an immutable [`CompiledSchema`].
///
/// Fails on the first misconfigured field; nothing is compiled in that case.
pub fn compile(schema: &Value) -> Result<CompiledSchema> {
    let fields = schema.as_object().ok_or(SchemaError::NotAnObject)?;

    let plans = fields
        .iter()
        .map(|(field, rules)| compile_field(field, rules))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(fields = plans.len(), "Compiled schema");
    Ok(CompiledSchema { plans })
}

/// Compile the plan for a single field
pub fn compile_field(field: &str, rules: &Value) -> Result<CheckPlan> {
    let rules = RuleSet::parse(field, rules)?;
    let mut checks = Vec::new();

    if rules.required {
        checks.push(Check::Required {
            message: MessageTemplate::or_default(rules.required_message.as_deref(), REQUIRED_DEFAULT),
        });
    }

    match rules.field_type {
        FieldType::String => {
            checks.extend(length_check(&rules));
        }
        FieldType::Number => {
            checks.push(Check::Integer);
            checks.extend(range_check(&rules));
        }
        FieldType::Email => {
            checks.extend(length_check(&rules));
            checks.push(Check::Email);
        }
        FieldType::DateTime => checks.push(Check::Temporal {
            format: TemporalFormat::DateTime,
        }),
        FieldType::Date => checks.push(Check::Temporal {
            format: TemporalFormat::Date,
        }),
        FieldType::Time => checks.push(Check::Temporal {
            format: TemporalFormat::Time,
        }),
        FieldType::Dictionary => checks.push(Check::Json {
            shape: JsonShape::Any,
        }),
        FieldType::Array => checks.push(Check::Json {
            shape: JsonShape::Array,
        }),
        FieldType::Boolean => checks.push(Check::Boolean),
    }

    Ok(CheckPlan {
        field: field.to_string(),
        field_type: rules.field_type,
        checks,
    })
}

fn length_check(rules: &RuleSet) -> Option<Check> {
    let (min, max) = (rules.min_length, rules.max_length);
    let default = bounded_default(min, max, LENGTH_BETWEEN, LENGTH_MIN, LENGTH_MAX)?;
    Some(Check::Length {
        min,
        max,
        message: MessageTemplate::or_default(rules.length_message.as_deref(), default),
    })
}

fn range_check(rules: &RuleSet) -> Option<Check> {
    let (min, max) = (rules.min, rules.max);
    let default = bounded_default(min, max, RANGE_BETWEEN, RANGE_MIN, RANGE_MAX)?;
    Some(Check::Range {
        min,
        max,
        message: MessageTemplate::or_default(rules.range_message.as_deref(), default),
    })
}

/// Pick the default message for whichever bounds are present; a combined
/// message wins when both are.
fn bounded_default(
    min: Option<Bound>,
    max: Option<Bound>,
    between: &'static str,
    min_only: &'static str,
    max_only: &'static str,
) -> Option<&'static str> {
    match (min, max) {
        (Some(_), Some(_)) => Some(between),
        (Some(_), None) => Some(min_only),
        (None, Some(_)) => Some(max_only),
        (None, None) => None,
    }
}
