//! HTTP handler for the validation service
//!
//! The handler is transport glue only: it decodes the request, hands the
//! schema and payload to the engine, and turns the report into a response
//! body. It holds no validation logic of its own.
//!
//! - `routes`: route definitions and the error-to-response mapping
//! - `middleware`: request ids and request logging

pub mod middleware;
pub mod routes;

pub use middleware::{request_id_middleware, request_logging_middleware, REQUEST_ID_HEADER};
pub use routes::{
    create_router, health_check, metrics_text, schema_validation, ApiError, HandlerState,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use payload_validator_core::rules::is_truthy;

pub const VALID_MESSAGE: &str = "Data is valid!";
pub const INVALID_MESSAGE: &str = "Validations errors";
pub const MALFORMED_BODY_MESSAGE: &str = "Request body must be a valid JSON object.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later!";
pub const INVALID_QUERY_MESSAGE: &str = "Query parameter 'normalized' must be true or false.";

/// Response body of the validation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub success: bool,
    pub message: String,
    /// Per-field error messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    /// Normalized payload, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ValidationResponse {
    pub fn valid() -> Self {
        Self {
            success: true,
            message: VALID_MESSAGE.to_string(),
            errors: None,
            data: None,
        }
    }

    pub fn invalid(errors: Value) -> Self {
        Self {
            success: false,
            message: INVALID_MESSAGE.to_string(),
            errors: Some(errors),
            data: None,
        }
    }

    /// Failure carrying only a top-level message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Check that `schema` and `data` are both present and usable.
///
/// Falsy values (absent, null, empty) count as missing and all missing inputs
/// are reported together, `schema` first. A present `data` must be an object.
/// On failure the field -> messages map is returned.
pub fn required_inputs<'a>(
    schema: Option<&'a Value>,
    data: Option<&'a Value>,
) -> Result<(&'a Value, &'a Map<String, Value>), Value> {
    let schema = schema.filter(|v| is_truthy(v));
    let data = data.filter(|v| is_truthy(v));

    match (schema, data) {
        (Some(schema), Some(data)) => match data.as_object() {
            Some(data) => Ok((schema, data)),
            None => {
                let mut errors = Map::new();
                errors.insert("data".to_string(), Value::from(vec!["data must be a JSON object!"]));
                Err(Value::Object(errors))
            }
        },
        (schema, data) => {
            let mut missing = Map::new();
            if schema.is_none() {
                missing.insert("schema".to_string(), Value::from(vec!["schema is a required field!"]));
            }
            if data.is_none() {
                missing.insert("data".to_string(), Value::from(vec!["data is a required field!"]));
            }
            Err(Value::Object(missing))
        }
    }
}

/// Query options for the validation endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationQuery {
    /// Echo the normalized payload back in the response
    #[serde(default)]
    pub normalized: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_response_shape() {
        let body = serde_json::to_value(ValidationResponse::valid()).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Data is valid!"}));
    }

    #[test]
    fn test_invalid_response_key_order() {
        let response = ValidationResponse::invalid(json!({"age": ["age must be at least 1!"]}));
        let text = serde_json::to_string(&response).unwrap();
        assert_eq!(
            text,
            r#"{"success":false,"message":"Validations errors","errors":{"age":["age must be at least 1!"]}}"#
        );
    }

    #[test]
    fn test_required_inputs() {
        let schema = json!({"a": {"type": "string"}});
        let data = json!({"a": "x"});
        let (s, d) = required_inputs(Some(&schema), Some(&data)).unwrap();
        assert_eq!(s, &schema);
        assert_eq!(d.len(), 1);

        assert_eq!(
            required_inputs(Some(&json!({})), Some(&json!({}))).unwrap_err(),
            json!({
                "schema": ["schema is a required field!"],
                "data": ["data is a required field!"]
            })
        );
        assert_eq!(
            required_inputs(Some(&schema), Some(&json!(false))).unwrap_err(),
            json!({"data": ["data is a required field!"]})
        );
        assert_eq!(
            required_inputs(Some(&schema), Some(&json!([1]))).unwrap_err(),
            json!({"data": ["data must be a JSON object!"]})
        );
    }

    #[test]
    fn test_failure_response() {
        let body = serde_json::to_value(ValidationResponse::failure("boom")).unwrap();
        assert_eq!(body, json!({"success": false, "message": "boom"}));
    }
}
