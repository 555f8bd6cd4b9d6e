//! Route definitions for the validation service
//!
//! - POST /api/schema_validation - Validate a payload against a request-supplied schema
//! - GET /health - Health check endpoint
//! - GET /metrics - Prometheus metrics
//!
//! All validation responses are JSON with the `success`/`message`/`errors`
//! shape described on [`ValidationResponse`].

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, DefaultBodyLimit, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use payload_validator_core::{SchemaCache, SchemaError};

use super::{
    request_id_middleware, request_logging_middleware, required_inputs, HealthResponse,
    ValidationQuery, ValidationResponse, INVALID_QUERY_MESSAGE, MALFORMED_BODY_MESSAGE,
    UNEXPECTED_MESSAGE,
};
use crate::config::ServiceConfig;
use crate::telemetry::{Outcome, ValidationMetrics};

/// Handler state shared across all routes
#[derive(Clone)]
pub struct HandlerState {
    pub cache: Arc<SchemaCache>,
    pub metrics: Arc<ValidationMetrics>,
}

impl HandlerState {
    pub fn new(cache: SchemaCache, metrics: ValidationMetrics) -> Self {
        Self {
            cache: Arc::new(cache),
            metrics: Arc::new(metrics),
        }
    }

    /// Build state from service configuration
    pub fn from_config(config: &ServiceConfig) -> crate::telemetry::Result<Self> {
        Ok(Self::new(
            SchemaCache::new(config.cache_capacity),
            ValidationMetrics::new()?,
        ))
    }
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Body is not a JSON object
    MalformedBody,
    /// Query string could not be decoded
    InvalidQuery,
    /// `schema` and/or `data` missing or unusable
    MissingInputs(Value),
    /// One or more fields failed validation
    ValidationFailed {
        errors: Value,
        data: Option<Map<String, Value>>,
    },
    /// Schema misconfiguration
    Schema(SchemaError),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody
            | ApiError::InvalidQuery
            | ApiError::MissingInputs(_)
            | ApiError::ValidationFailed { .. }
            | ApiError::Schema(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ApiError::MalformedBody | ApiError::InvalidQuery | ApiError::MissingInputs(_) => {
                Outcome::BadRequest
            }
            ApiError::ValidationFailed { .. } => Outcome::Invalid,
            ApiError::Schema(_) => Outcome::SchemaError,
            ApiError::InternalError(_) => Outcome::InternalError,
        }
    }

    fn into_body(self) -> ValidationResponse {
        match self {
            ApiError::MalformedBody => ValidationResponse::failure(MALFORMED_BODY_MESSAGE),
            ApiError::InvalidQuery => ValidationResponse::failure(INVALID_QUERY_MESSAGE),
            ApiError::MissingInputs(errors) => ValidationResponse::invalid(errors),
            ApiError::ValidationFailed { errors, data } => {
                let response = ValidationResponse::invalid(errors);
                match data {
                    Some(data) => response.with_data(data),
                    None => response,
                }
            }
            ApiError::Schema(err) => ValidationResponse::failure(err.to_string()),
            ApiError::InternalError(_) => ValidationResponse::failure(UNEXPECTED_MESSAGE),
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::Schema(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.into_body())).into_response()
    }
}

/// Create the router with all routes
pub fn create_router(state: HandlerState, max_body_size: usize) -> Router {
    let routes = Router::new()
        .route("/api/schema_validation", post(schema_validation))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text));

    with_service_layers(routes, state, max_body_size)
}

/// Body limit, panic mapping, tracing, request logging and request ids
fn with_service_layers(
    routes: Router<HandlerState>,
    state: HandlerState,
    max_body_size: usize,
) -> Router {
    let panic_metrics = Arc::clone(&state.metrics);

    routes
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_metrics.record_request(Outcome::InternalError);
            handle_panic(panic)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// POST /api/schema_validation
///
/// Body: `{"schema": {...}, "data": {...}}`. With `?normalized=true` the
/// response also carries the payload after boolean normalization.
pub async fn schema_validation(
    State(state): State<HandlerState>,
    query: Result<Query<ValidationQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let result = match query {
        Ok(Query(query)) => validate_body(&state, &body, query.normalized),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "schema_validation error: invalid query string");
            Err(ApiError::InvalidQuery)
        }
    };
    state.metrics.observe_duration(start.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            tracing::info!("schema_validation response: Data is valid!");
            state.metrics.record_request(Outcome::Valid);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            state.metrics.record_request(err.outcome());
            err.into_response()
        }
    }
}

fn validate_body(
    state: &HandlerState,
    body: &[u8],
    include_normalized: bool,
) -> Result<ValidationResponse, ApiError> {
    let request: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "schema_validation error: malformed request body");
        ApiError::MalformedBody
    })?;
    let request = request.as_object().ok_or_else(|| {
        tracing::warn!("schema_validation error: request body is not an object");
        ApiError::MalformedBody
    })?;

    let (schema, data) = extract_inputs(request)?;
    tracing::info!(
        schema_fields = schema.as_object().map_or(0, Map::len),
        payload_fields = data.len(),
        "schema_validation request received"
    );

    let compiled = state.cache.get_or_compile(schema).map_err(|e| {
        tracing::warn!(error = %e, "schema_validation error: invalid schema");
        ApiError::from(e)
    })?;
    state.metrics.set_cache_entries(state.cache.len());

    let report = compiled.evaluate(data);
    let normalized = include_normalized.then_some(report.normalized);

    if report.valid {
        let response = ValidationResponse::valid();
        return Ok(match normalized {
            Some(data) => response.with_data(data),
            None => response,
        });
    }

    state.metrics.record_field_errors(&report.errors);
    let errors = report.errors.to_json();
    tracing::warn!(
        failed_fields = report.errors.len(),
        errors = %errors,
        "Validations errors"
    );
    Err(ApiError::ValidationFailed {
        errors,
        data: normalized,
    })
}

/// Pull `schema` and `data` out of the request body; see [`required_inputs`]
fn extract_inputs(request: &Map<String, Value>) -> Result<(&Value, &Map<String, Value>), ApiError> {
    required_inputs(request.get("schema"), request.get("data")).map_err(|errors| {
        tracing::error!(errors = %errors, "schema_validation error: required inputs missing");
        ApiError::MissingInputs(errors)
    })
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(error = %detail, "error occurred on schema_validation api");
    ApiError::InternalError(detail).into_response()
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_text(State(state): State<HandlerState>) -> Result<Response, ApiError> {
    let text = state.metrics.encode_text().map_err(|e| {
        tracing::error!(error = %e, "Failed to encode metrics");
        ApiError::InternalError(e.to_string())
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> HandlerState {
        HandlerState::new(SchemaCache::new(4), ValidationMetrics::new().unwrap())
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::MalformedBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Schema(SchemaError::NotAnObject).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InternalError("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn explode() -> StatusCode {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn test_panic_maps_to_internal_error_response() {
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        let state = state();
        let metrics = Arc::clone(&state.metrics);
        let routes = Router::new().route("/explode", get(explode));
        let app = with_service_layers(routes, state, 1024);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/explode")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-request-id"));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": UNEXPECTED_MESSAGE})
        );
        assert!(metrics
            .encode_text()
            .unwrap()
            .contains("schema_validation_requests_total{outcome=\"internal_error\"} 1"));
    }

    #[test]
    fn test_internal_error_body_hides_detail() {
        let body = ApiError::InternalError("db exploded".to_string()).into_body();
        assert!(!body.success);
        assert_eq!(body.message, UNEXPECTED_MESSAGE);
    }

    #[test]
    fn test_extract_inputs_reports_all_missing() {
        let request = json!({"schema": {}, "data": null});
        let err = extract_inputs(request.as_object().unwrap()).unwrap_err();
        match err {
            ApiError::MissingInputs(errors) => {
                assert_eq!(
                    errors,
                    json!({
                        "schema": ["schema is a required field!"],
                        "data": ["data is a required field!"]
                    })
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_inputs_rejects_non_object_data() {
        let request = json!({"schema": {"a": {"type": "string"}}, "data": [1, 2]});
        assert!(matches!(
            extract_inputs(request.as_object().unwrap()),
            Err(ApiError::MissingInputs(_))
        ));
    }

    #[test]
    fn test_validate_body_valid_with_normalized_data() {
        let body = json!({
            "schema": {"active": {"type": "boolean", "required": true}},
            "data": {"active": "true"}
        })
        .to_string();

        let response = validate_body(&state(), body.as_bytes(), true).unwrap();
        assert!(response.success);
        assert_eq!(response.data.unwrap()["active"], json!(true));
    }

    #[test]
    fn test_validate_body_schema_error() {
        let body = json!({"schema": {"a": {"type": "uuid"}}, "data": {"a": 1}}).to_string();
        assert!(matches!(
            validate_body(&state(), body.as_bytes(), false),
            Err(ApiError::Schema(SchemaError::UnsupportedType { .. }))
        ));
    }

    #[test]
    fn test_validate_body_malformed() {
        assert!(matches!(
            validate_body(&state(), b"{not json", false),
            Err(ApiError::MalformedBody)
        ));
        assert!(matches!(
            validate_body(&state(), b"[1,2]", false),
            Err(ApiError::MalformedBody)
        ));
    }
}
