//! Check definitions
//!
//! A [`Check`] is plain data: the kind of predicate plus its parameters and
//! message template. [`Check::apply`] is the single dispatch point that runs
//! any check against a raw payload value.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::formats;
use crate::rules::Bound;

/// Failure message with `{field}`, `{min}` and `{max}` placeholders.
///
/// Placeholders are filled in when the check fails, so a compiled check
/// never captures the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Use `custom` when the schema overrides the message, `default` otherwise
    pub fn or_default(custom: Option<&str>, default: &str) -> Self {
        Self::new(custom.unwrap_or(default))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, field: &str, min: Option<Bound>, max: Option<Bound>) -> String {
        let mut text = self.0.replace("{field}", field);
        if let Some(min) = min {
            text = text.replace("{min}", &min.to_string());
        }
        if let Some(max) = max {
            text = text.replace("{max}", &max.to_string());
        }
        text
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar/clock formats accepted by temporal checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalFormat {
    /// `YYYY-MM-DD HH:MM`
    DateTime,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM`
    Time,
}

impl TemporalFormat {
    /// Human-readable layout used in failure messages
    pub fn layout(&self) -> &'static str {
        match self {
            TemporalFormat::DateTime => "YYYY-MM-DD HH:MM",
            TemporalFormat::Date => "YYYY-MM-DD",
            TemporalFormat::Time => "HH:MM",
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            TemporalFormat::DateTime => formats::is_datetime(text),
            TemporalFormat::Date => formats::is_date(text),
            TemporalFormat::Time => formats::is_time(text),
        }
    }
}

/// Shape a JSON-text check requires after decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonShape {
    /// Any valid JSON document
    Any,
    /// A JSON array
    Array,
}

pub const INTEGER_MESSAGE: &str = "Not a valid integer value.";
pub const EMAIL_MESSAGE: &str = "Email must be a valid email!";

/// A single validation predicate with its failure message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Value must be present and non-empty.
    ///
    /// `false` and `0` are present values here, unlike a falsy-means-missing
    /// rule; only missing, null, whitespace-only, `[]` and `{}` fail.
    Required { message: MessageTemplate },
    /// Character count of the stringified value must lie within the bounds
    Length {
        min: Option<Bound>,
        max: Option<Bound>,
        message: MessageTemplate,
    },
    /// Value must coerce to an integer
    Integer,
    /// Coerced integer must lie within the bounds
    Range {
        min: Option<Bound>,
        max: Option<Bound>,
        message: MessageTemplate,
    },
    /// Stringified value must look like an email address
    Email,
    /// Stringified value must match a calendar/clock layout
    Temporal { format: TemporalFormat },
    /// Stringified value must decode as JSON of the given shape
    Json { shape: JsonShape },
    /// Value must be one of the accepted boolean literals
    Boolean,
}

/// Result of applying one check to one value
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Pass,
    /// Passed, and the working payload should carry this value instead
    Normalized(Value),
    Fail(String),
}

impl Check {
    pub fn is_required(&self) -> bool {
        matches!(self, Check::Required { .. })
    }

    /// Short identifier of the check kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Check::Required { .. } => "required",
            Check::Length { .. } => "length",
            Check::Integer => "integer",
            Check::Range { .. } => "range",
            Check::Email => "email",
            Check::Temporal { .. } => "temporal",
            Check::Json { .. } => "json",
            Check::Boolean => "boolean",
        }
    }

    /// Run this check against a present (non-blank) value
    pub fn apply(&self, field: &str, value: &Value) -> CheckOutcome {
        match self {
            Check::Required { message } => {
                if formats::is_blank(value) {
                    CheckOutcome::Fail(message.render(field, None, None))
                } else {
                    CheckOutcome::Pass
                }
            }
            Check::Length { min, max, message } => {
                let length = formats::as_text(value).chars().count() as f64;
                if out_of_bounds(length, *min, *max) {
                    CheckOutcome::Fail(message.render(field, *min, *max))
                } else {
                    CheckOutcome::Pass
                }
            }
            Check::Integer => match formats::coerce_integer(value) {
                Some(_) => CheckOutcome::Pass,
                None => CheckOutcome::Fail(INTEGER_MESSAGE.to_string()),
            },
            Check::Range { min, max, message } => match formats::coerce_integer(value) {
                Some(n) if !out_of_bounds(n as f64, *min, *max) => CheckOutcome::Pass,
                _ => CheckOutcome::Fail(message.render(field, *min, *max)),
            },
            Check::Email => {
                if formats::is_email(&formats::as_text(value)) {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Fail(EMAIL_MESSAGE.to_string())
                }
            }
            Check::Temporal { format } => {
                if format.matches(&formats::as_text(value)) {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Fail(format!(
                        "{} must be in the format {}.",
                        field,
                        format.layout()
                    ))
                }
            }
            Check::Json { shape } => {
                let decoded = formats::parse_json(&formats::as_text(value));
                match (shape, decoded) {
                    (JsonShape::Any, Some(_)) => CheckOutcome::Pass,
                    (JsonShape::Array, Some(Value::Array(_))) => CheckOutcome::Pass,
                    (JsonShape::Any, None) => {
                        CheckOutcome::Fail(format!("{} must be a valid JSON object.", field))
                    }
                    (JsonShape::Array, _) => {
                        CheckOutcome::Fail(format!("{} must be a valid JSON array.", field))
                    }
                }
            }
            Check::Boolean => match formats::normalize_boolean(value) {
                Some(b) => CheckOutcome::Normalized(Value::Bool(b)),
                None => CheckOutcome::Fail(format!(
                    "{} must be a valid boolean value (true/false).",
                    field
                )),
            },
        }
    }
}

fn out_of_bounds(value: f64, min: Option<Bound>, max: Option<Bound>) -> bool {
    min.is_some_and(|min| value < min.as_f64()) || max.is_some_and(|max| value > max.as_f64())
}
