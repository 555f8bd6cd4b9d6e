//! Telemetry for the validation service
//!
//! - `metrics` - Prometheus metrics for validation requests
//! - [`init_tracing`] - tracing subscriber setup

pub mod metrics;

pub use metrics::{Outcome, ValidationMetrics};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Metrics encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Install the global tracing subscriber, writing to stderr.
///
/// Honors `RUST_LOG`, falling back to `default_directive`. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_tracing(format: LogFormat, default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(format = ?format, "Tracing initialized");
    }
}
