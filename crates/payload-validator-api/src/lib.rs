//! Payload Validator API
//!
//! HTTP service and command-line front end for `payload-validator-core`.
//!
//! ## Endpoints
//!
//! - `POST /api/schema_validation` - validate `data` against `schema`
//! - `GET /health` - liveness probe
//! - `GET /metrics` - Prometheus text exposition
//!
//! ## Response Shapes
//!
//! ```json
//! {"success": true, "message": "Data is valid!"}
//! {"success": false, "message": "Validations errors", "errors": {"age": ["age must be at least 18!"]}}
//! {"success": false, "message": "Unsupported field type: uuid in field 'id'. ..."}
//! ```
//!
//! ## Architecture
//!
//! 1. **Handler** (`handler/`): axum routes, middleware and the mapping from
//!    engine results to response bodies.
//!
//! 2. **Config** (`config`): `ServiceConfig`, loaded from TOML and overridden
//!    by flags and `PAYLOAD_VALIDATOR_*` environment variables.
//!
//! 3. **Telemetry** (`telemetry/`): tracing setup and Prometheus metrics.
//!
//! 4. **CLI** (`cli/`): `serve` and offline `validate` commands.
//!
//! ## CLI Usage
//!
//! ```bash
//! payload-validator serve --config validator.toml --port 8080
//! payload-validator validate --schema schema.json --data payload.json --format pretty
//! ```

pub mod cli;
pub mod config;
pub mod handler;
pub mod telemetry;

pub use cli::{run_cli, Cli, ExitCode};
pub use config::{ConfigError, LogFormat, ServiceConfig};
pub use handler::{create_router, ApiError, HandlerState, ValidationResponse};
pub use telemetry::{init_tracing, Outcome, ValidationMetrics};
