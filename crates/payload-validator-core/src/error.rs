//! Error types for the payload validator engine
//!
//! Only schema-level misconfiguration is an error. Problems with the payload
//! itself are never raised; they end up as messages in the
//! [`ValidationReport`](crate::ValidationReport).

use thiserror::Error;

use crate::rules::FieldType;

/// Schema misconfiguration detected while compiling a schema.
///
/// Any of these aborts the whole compilation: a schema that fails to compile
/// produces no partial plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema is not a mapping of field names to rule sets
    #[error("Schema must be a JSON object mapping field names to rule sets.")]
    NotAnObject,

    /// A field's rule set is not a mapping
    #[error("Rules for field '{field}' must be a JSON object.")]
    InvalidRuleSet { field: String },

    /// A field declares no `type`
    #[error("Missing field type in field '{field}'. Allowed types are: {}", FieldType::allowed_list())]
    MissingType { field: String },

    /// A field declares a `type` outside the supported set
    #[error("Unsupported field type: {found} in field '{field}'. Allowed types are: {}", FieldType::allowed_list())]
    UnsupportedType { field: String, found: String },

    /// A numeric bound could not be coerced to a number
    #[error("Invalid numeric value '{value}' for '{parameter}' in field '{field}'.")]
    InvalidBound {
        field: String,
        parameter: String,
        value: String,
    },

    /// A message override is not a string
    #[error("Invalid message for '{parameter}' in field '{field}': expected a string.")]
    InvalidMessage { field: String, parameter: String },
}

impl SchemaError {
    /// Name of the field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::NotAnObject => None,
            SchemaError::InvalidRuleSet { field }
            | SchemaError::MissingType { field }
            | SchemaError::UnsupportedType { field, .. }
            | SchemaError::InvalidBound { field, .. }
            | SchemaError::InvalidMessage { field, .. } => Some(field),
        }
    }
}

/// Result type alias for compilation
pub type Result<T> = std::result::Result<T, SchemaError>;
