//! Validation report types

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::rules::FieldType;

/// Error messages for one failing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub field_type: FieldType,
    pub messages: Vec<String>,
}

/// Per-field error lists, in schema field order.
///
/// Only failing fields are present. Serializes as a JSON object mapping each
/// field to its list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &str, field_type: FieldType, messages: Vec<String>) {
        self.entries.push(FieldError {
            field: field.to_string(),
            field_type,
            messages,
        });
    }

    /// Messages recorded for `field`, if it failed
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.messages.as_slice())
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages across all fields
    pub fn message_count(&self) -> usize {
        self.entries.iter().map(|e| e.messages.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Field-to-messages mapping as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|e| {
                    let messages = e.messages.iter().cloned().map(Value::String).collect();
                    (e.field.clone(), Value::Array(messages))
                })
                .collect(),
        )
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.field, &entry.messages)?;
        }
        map.end()
    }
}

/// Outcome of evaluating a payload against a compiled schema
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationReport {
    /// True iff no field produced an error
    pub valid: bool,
    pub errors: FieldErrors,
    /// Working copy of the payload with boolean fields normalized
    pub normalized: Map<String, Value>,
}

impl ValidationReport {
    pub fn new(errors: FieldErrors, normalized: Map<String, Value>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            normalized,
        }
    }
}
