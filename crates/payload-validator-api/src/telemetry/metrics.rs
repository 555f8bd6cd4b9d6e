//! Prometheus metrics for the validation service
//!
//! - `schema_validation_requests_total` (counter) - Requests by outcome
//! - `schema_validation_duration_seconds` (histogram) - Compile + evaluate time
//! - `schema_validation_field_errors_total` (counter) - Failing fields by type
//! - `schema_cache_entries` (gauge) - Compiled schemas held in the cache

use prometheus::{CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry};

use super::{Result, TelemetryError};
use payload_validator_core::FieldErrors;

/// How a validation request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
    BadRequest,
    SchemaError,
    InternalError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Valid => "valid",
            Outcome::Invalid => "invalid",
            Outcome::BadRequest => "bad_request",
            Outcome::SchemaError => "schema_error",
            Outcome::InternalError => "internal_error",
        }
    }
}

/// Validation metrics backed by a dedicated registry
pub struct ValidationMetrics {
    registry: Registry,
    requests_total: CounterVec,
    duration_seconds: Histogram,
    field_errors_total: CounterVec,
    cache_entries: Gauge,
}

impl ValidationMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new(
                "schema_validation_requests_total",
                "Total number of schema validation requests by outcome",
            ),
            &["outcome"],
        )?;

        let duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "schema_validation_duration_seconds",
                "Time spent compiling and evaluating a schema, in seconds",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;

        let field_errors_total = CounterVec::new(
            Opts::new(
                "schema_validation_field_errors_total",
                "Total number of failing fields by declared type",
            ),
            &["field_type"],
        )?;

        let cache_entries = Gauge::new(
            "schema_cache_entries",
            "Number of compiled schemas held in the cache",
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;
        registry.register(Box::new(field_errors_total.clone()))?;
        registry.register(Box::new(cache_entries.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            duration_seconds,
            field_errors_total,
            cache_entries,
        })
    }

    pub fn record_request(&self, outcome: Outcome) {
        self.requests_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn observe_duration(&self, duration_secs: f64) {
        self.duration_seconds.observe(duration_secs);
    }

    pub fn record_field_errors(&self, errors: &FieldErrors) {
        for error in errors.iter() {
            self.field_errors_total
                .with_label_values(&[error.field_type.as_str()])
                .inc();
        }
    }

    pub fn set_cache_entries(&self, entries: usize) {
        self.cache_entries.set(entries as f64);
    }

    /// Encode all metrics in the Prometheus text format
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::EncodingError(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payload_validator_core::FieldType;

    #[test]
    fn test_record_and_encode() {
        let metrics = ValidationMetrics::new().unwrap();

        metrics.record_request(Outcome::Valid);
        metrics.record_request(Outcome::Invalid);
        metrics.record_request(Outcome::Invalid);
        metrics.observe_duration(0.002);
        metrics.set_cache_entries(3);

        let mut errors = FieldErrors::default();
        errors.push("age", FieldType::Number, vec!["too small".to_string()]);
        metrics.record_field_errors(&errors);

        let text = metrics.encode_text().unwrap();
        assert!(text.contains("schema_validation_requests_total{outcome=\"invalid\"} 2"));
        assert!(text.contains("schema_validation_field_errors_total{field_type=\"number\"} 1"));
        assert!(text.contains("schema_cache_entries 3"));
        assert!(text.contains("schema_validation_duration_seconds_count 1"));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::SchemaError.as_str(), "schema_error");
        assert_eq!(Outcome::InternalError.as_str(), "internal_error");
    }
}
