//! CLI command definitions for the payload validator
//!
//! Provides Clap-based commands for running the HTTP service and for
//! validating a payload file against a schema file offline.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use payload_validator_core::SchemaError;

use super::output::{self, OutputFormat};
use super::ExitCode;
use crate::config::{ConfigError, LogFormat, ServiceConfig};
use crate::handler::{create_router, required_inputs, HandlerState, ValidationResponse};
use crate::telemetry::{init_tracing, TelemetryError};

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File error: {0}")]
    FileError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl CliError {
    /// Exit code matching this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::FileError(_) | CliError::Config(_) => ExitCode::FileError,
            _ => ExitCode::InternalError,
        }
    }
}

/// Payload validator CLI
///
/// Serve the schema validation API, or validate a payload against a schema
/// from the command line.
#[derive(Parser, Debug)]
#[command(name = "payload-validator")]
#[command(about = "Schema-driven payload validation service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP validation service
    Serve {
        /// Path to a TOML configuration file
        #[arg(short, long, env = "PAYLOAD_VALIDATOR_CONFIG")]
        config: Option<PathBuf>,

        /// Interface to bind
        #[arg(long, env = "PAYLOAD_VALIDATOR_HOST")]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long, env = "PAYLOAD_VALIDATOR_PORT")]
        port: Option<u16>,

        /// Log output format
        #[arg(long, value_enum, env = "PAYLOAD_VALIDATOR_LOG_FORMAT")]
        log_format: Option<LogFormat>,

        /// Maximum request body size in bytes
        #[arg(long, env = "PAYLOAD_VALIDATOR_MAX_BODY_SIZE")]
        max_body_size: Option<usize>,

        /// Number of compiled schemas to keep in memory
        #[arg(long, env = "PAYLOAD_VALIDATOR_CACHE_CAPACITY")]
        cache_capacity: Option<usize>,
    },

    /// Validate a JSON payload file against a JSON schema file
    ///
    /// Prints the same body the HTTP endpoint would return.
    Validate {
        /// Path to the schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to the payload file
        #[arg(short, long)]
        data: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Include the normalized payload in the output
        #[arg(long)]
        normalized: bool,
    },
}

/// Flag values for `serve` that override the configuration file
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_format: Option<LogFormat>,
    pub max_body_size: Option<usize>,
    pub cache_capacity: Option<usize>,
}

/// Resolve the service configuration: file first, then flag/env overrides
pub fn resolve_config(
    config: Option<&Path>,
    overrides: ServeOverrides,
) -> Result<ServiceConfig, CliError> {
    let mut resolved = match config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(host) = overrides.host {
        resolved.host = host;
    }
    if let Some(port) = overrides.port {
        resolved.port = port;
    }
    if let Some(log_format) = overrides.log_format {
        resolved.log_format = log_format;
    }
    if let Some(max_body_size) = overrides.max_body_size {
        resolved.max_body_size = max_body_size;
    }
    if let Some(cache_capacity) = overrides.cache_capacity {
        resolved.cache_capacity = cache_capacity;
    }

    Ok(resolved)
}

/// Execute the serve command
pub fn execute_serve(
    config: Option<PathBuf>,
    overrides: ServeOverrides,
) -> Result<ExitCode, CliError> {
    let config = resolve_config(config.as_deref(), overrides)?;
    init_tracing(config.log_format, "info");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config))?;

    Ok(ExitCode::Success)
}

async fn serve(config: ServiceConfig) -> Result<(), CliError> {
    let addr = config.listen_addr()?;
    let state = HandlerState::from_config(&config)?;
    let router = create_router(state, config.max_body_size);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %addr,
        max_body_size = config.max_body_size,
        cache_capacity = config.cache_capacity,
        "Payload validator listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Payload validator stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Execute the validate command
pub fn execute_validate(
    schema: PathBuf,
    data: PathBuf,
    format: OutputFormat,
    normalized: bool,
) -> Result<ExitCode, CliError> {
    init_tracing(LogFormat::Pretty, "warn");

    let schema_value = read_json(&schema, "schema")?;
    let data_value = read_json(&data, "data")?;

    let (response, code) = validate_documents(&schema_value, &data_value, normalized);
    println!("{}", output::render(&response, format)?);

    Ok(code)
}

/// Validate already-parsed documents, returning the response body and exit code
pub fn validate_documents(
    schema: &Value,
    data: &Value,
    include_normalized: bool,
) -> (ValidationResponse, ExitCode) {
    let (schema, payload) = match required_inputs(Some(schema), Some(data)) {
        Ok(inputs) => inputs,
        Err(errors) => {
            tracing::warn!(errors = %errors, "Required inputs missing");
            return (ValidationResponse::invalid(errors), ExitCode::ValidationError);
        }
    };

    match payload_validator_core::validate(schema, payload) {
        Ok(report) => {
            let code = if report.valid {
                ExitCode::Success
            } else {
                ExitCode::ValidationError
            };
            let response = if report.valid {
                ValidationResponse::valid()
            } else {
                ValidationResponse::invalid(report.errors.to_json())
            };
            let response = if include_normalized {
                response.with_data(report.normalized)
            } else {
                response
            };
            (response, code)
        }
        Err(e) => schema_failure(e),
    }
}

fn schema_failure(error: SchemaError) -> (ValidationResponse, ExitCode) {
    tracing::warn!(error = %error, "Schema rejected");
    (
        ValidationResponse::failure(error.to_string()),
        ExitCode::SchemaError,
    )
}

fn read_json(path: &Path, what: &str) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::FileError(format!(
            "Failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CliError::FileError(format!(
            "Failed to parse {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}
